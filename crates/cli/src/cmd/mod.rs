//! CLI command implementations

pub mod config;
pub mod get;
pub mod log;
pub mod ls;
pub mod put;
pub mod recover;
pub mod verify;
