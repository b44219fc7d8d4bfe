use log::{error, info};

use homebuild_tracker::app::AppShell;

fn main() {
    // Initialize logging for debugging
    env_logger::init();
    info!("Starting Homebuild Tracker");

    match AppShell::new() {
        Ok(shell) => {
            print!("{}", shell.render());
        }
        Err(e) => {
            error!("Failed to initialize app: {}", e);
            std::process::exit(1);
        }
    }
}
