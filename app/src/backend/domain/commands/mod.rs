//! Command and result types for the domain services.
//!
//! Each operation takes a command struct and returns a result struct, keeping
//! service signatures stable as fields grow.

pub mod attachments;
pub mod budget;
pub mod categories;
pub mod document;
pub mod events;
pub mod tasks;
