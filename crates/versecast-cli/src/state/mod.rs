//! Application state management
//!
//! Services shared by the CLI commands.

mod app_state;

pub use app_state::*;
