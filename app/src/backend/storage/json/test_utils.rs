//! Shared test helpers for the JSON storage layer

use super::connection::JsonConnection;
use tempfile::TempDir;

/// Create a connection rooted in a fresh temporary directory.
///
/// The `TempDir` is returned alongside the connection and must be kept alive
/// for the duration of the test, or the directory disappears underneath it.
pub fn temp_connection() -> (TempDir, JsonConnection) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let connection = JsonConnection::new(dir.path()).expect("failed to create connection");
    (dir, connection)
}
