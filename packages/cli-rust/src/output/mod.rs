//! Output utilities for CLI commands
//!
//! Centralized formatting for host pipeline errors, adding a hint for the
//! failures users can fix themselves.

mod errors;

pub use errors::host_error;
