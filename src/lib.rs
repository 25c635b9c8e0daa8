//! # lamco-aim-assist
//!
//! Real-time pointer correction: pulls the reported cursor toward a target
//! and gradually repays the correction error left behind when the target
//! moves.
//!
//! # Architecture
//!
//! ```text
//! lamco-aim-assist
//!   ├─> Assist Core (easing curves, attractor, debt controller)
//!   ├─> Configuration (TOML, validated at startup)
//!   └─> Replay (drives the controller from recorded input traces)
//! ```
//!
//! # Data Flow
//!
//! **Tick Path:** Input poll → DebtController → corrected position → OS pointer
//!
//! **Retarget Path:** Target source → DebtController::set_target → debt snapshot

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Pointer correction core
///
/// This module holds everything with state or numeric invariants:
///
/// - **EasingCurve**: Monotone cubic (PCHIP) shaping of progress ratios
/// - **PotentialAttractor**: Gaussian pull toward the target with a hard radius
/// - **DebtController**: Per-tick state machine combining the two
pub mod assist;

/// Configuration loading and validation
pub mod config;

/// Trace replay
///
/// Feeds a recorded JSON-lines stream of resets, retargets and pointer
/// deltas through a controller on a manual clock, producing the corrected
/// positions an input loop would have written.
pub mod replay;

/// Utility functions
pub mod utils;
