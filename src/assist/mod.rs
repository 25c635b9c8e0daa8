//! Pointer Correction Core
//!
//! Nudges the reported pointer position toward a target with a bounded
//! Gaussian field, while repaying the error ("debt") left over whenever the
//! target changes.
//!
//! # Architecture
//!
//! ```text
//! Raw pointer delta
//!   └─> DebtController
//!       ├─> PotentialAttractor   (pull toward target, zero beyond radius)
//!       ├─> EasingCurve x3       (distance, time, speed ratios)
//!       └─> corrected position   (caller writes it to the OS pointer)
//! ```
//!
//! # Usage Example
//!
//! ```rust
//! use lamco_aim_assist::assist::{AssistConfig, DebtController, Vector2};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = DebtController::new(AssistConfig::default(), Vector2::new(960.0, 540.0))?;
//!
//! controller.set_target(1000.0, 560.0, false)?;
//!
//! if let Some(corrected) = controller.apply_delta(4.0, 1.0)? {
//!     println!("move pointer to {}", corrected);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The controller is single-writer: every call is O(1) and completes without
//! blocking, so it can be driven at the input device's polling rate.

mod attractor;
mod controller;
mod easing;
mod error;
mod geometry;
mod source;

pub use attractor::{Attraction, FieldConfig, PotentialAttractor};
pub use controller::{
    AssistConfig, AssistMode, AssistPhase, AssistStats, DebtController, DebtState, TargetSample,
    NEGLIGIBLE_DEBT,
};
pub use easing::{CurveConfig, EasingCurve};
pub use error::{classify_error, AssistError, ErrorType, Result};
pub use geometry::Vector2;
pub use source::{Clock, ManualClock, PositionSource, SystemClock};
