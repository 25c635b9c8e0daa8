//! Utility Functions
//!
//! User-friendly error formatting for the command-line front end.
//!
//! ```rust
//! use lamco_aim_assist::utils::format_user_error;
//!
//! let err = anyhow::anyhow!("Malformed trace event on line 3");
//! eprintln!("{}", format_user_error(&err));
//! // Shows:
//! // - Formatted error with box drawing
//! // - Context-specific troubleshooting steps
//! // - Technical details
//! ```
//!
//! Error categories with context-aware help:
//! - Curve errors → Breakpoint ordering, slope values
//! - Config errors → File access, TOML syntax, parameter ranges
//! - Trace errors → Event format, timestamp ordering

pub mod errors;

pub use errors::format_user_error;
