//! Subcommand handlers.

pub mod classify;
pub mod ports;
pub mod route;
