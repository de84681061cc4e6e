//! CLI module
//!
//! Command-line interface for dumping conversations.
//!
//! # Commands
//!
//! - `dump` - Save conversations as JSON
//! - `parse` - Render saved conversations as text
//! - `peers` - List the peers that would be dumped

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
