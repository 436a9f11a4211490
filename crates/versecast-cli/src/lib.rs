//! VerseCast CLI Library
//!
//! Headless front end over `versecast-core`: argument parsing, the shared
//! service state and one function per subcommand.

pub mod cli;
pub mod commands;
pub mod state;

// Re-exports
pub use cli::{CliArgs, Command};
pub use state::AppState;
