//! Freightlane CLI library.
//!
//! Command handlers and output formatting shared by the `freightlane-cli`
//! binary. Handlers return rendered text so they can be exercised without a
//! terminal.

pub mod commands;
pub mod output;
