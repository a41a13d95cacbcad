//! User input channels for Steward.
//!
//! Every channel implements `steward_core::Channel`.

pub mod cli;

pub use cli::CliChannel;
