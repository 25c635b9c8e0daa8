//! Debt Controller
//!
//! Stateful core of the assist. Tracks where the pointer would be without
//! correction (the real position), where it was last reported (the last
//! position), and the error outstanding at the moment the target last
//! changed (the debt).
//!
//! # Tick
//!
//! ```text
//! apply_delta(dx, dy)
//!   ├─> damp delta (continuous mode)
//!   ├─> real_position += delta
//!   ├─> corrected = attract(real_position, target)
//!   ├─> repayment = ratio * debt
//!   └─> last_position = corrected + repayment
//! ```
//!
//! # Repayment ratio
//!
//! Discrete targets repay by `distance_ratio * time_ratio * debt_paying_speed`,
//! continuous (slider) targets by `speed_ratio * debt_paying_speed`, where each
//! ratio comes from a monotone easing curve fed with its driving value
//! linearly rescaled onto the curve's input span.
//!
//! Debt is replaced on every retarget and never decremented by repayment.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::attractor::{FieldConfig, PotentialAttractor};
use super::easing::{CurveConfig, EasingCurve};
use super::error::{AssistError, Result};
use super::geometry::Vector2;
use super::source::{Clock, PositionSource, SystemClock};

/// Debt below this magnitude (pixels) is left unpaid
pub const NEGLIGIBLE_DEBT: f64 = 1.0;

/// Target tracking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    /// Target jumps between discrete positions
    #[default]
    Discrete,

    /// Target moves continuously (slider)
    Continuous,
}

impl AssistMode {
    /// Mode for a retarget event
    pub fn from_continuous(continuous: bool) -> Self {
        if continuous {
            Self::Continuous
        } else {
            Self::Discrete
        }
    }
}

impl std::fmt::Display for AssistMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discrete => write!(f, "Discrete"),
            Self::Continuous => write!(f, "Continuous"),
        }
    }
}

impl std::str::FromStr for AssistMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discrete" | "normal" | "jump" => Ok(Self::Discrete),
            "continuous" | "slider" | "tracking" => Ok(Self::Continuous),
            _ => Err(format!("Unknown assist mode: {}", s)),
        }
    }
}

/// Controller lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistPhase {
    /// No target set since the last reset
    Idle,
    /// Pursuing a target
    Active(AssistMode),
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistConfig {
    /// Attraction field
    #[serde(default)]
    pub field: FieldConfig,

    /// Curve driven by the distance between consecutive targets
    #[serde(default = "CurveConfig::distance")]
    pub distance_curve: CurveConfig,

    /// Curve driven by the age of the current debt
    #[serde(default = "CurveConfig::time")]
    pub time_curve: CurveConfig,

    /// Curve driven by continuous target speed
    #[serde(default = "CurveConfig::speed")]
    pub speed_curve: CurveConfig,

    /// Distance cap (pixels)
    #[serde(default = "default_distance_limit")]
    pub distance_limit: f64,

    /// Debt age cap (seconds)
    #[serde(default = "default_time_limit")]
    pub time_limit: f64,

    /// Target speed cap (pixels per polling frame)
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f64,

    /// Input device polling rate (Hz), converts target speed to pixels per frame
    #[serde(default = "default_polling_rate")]
    pub polling_rate_hz: f64,

    /// Fraction of the shaped debt repaid per tick
    #[serde(default = "default_debt_paying_speed")]
    pub debt_paying_speed: f64,

    /// Delta multiplier while tracking a continuous target
    #[serde(default = "default_continuous_damping")]
    pub continuous_damping: f64,
}

fn default_distance_limit() -> f64 {
    2000.0
}
fn default_time_limit() -> f64 {
    2.0
}
fn default_speed_limit() -> f64 {
    20.0
}
fn default_polling_rate() -> f64 {
    2000.0
}
fn default_debt_paying_speed() -> f64 {
    0.02
}
fn default_continuous_damping() -> f64 {
    0.7
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            distance_curve: CurveConfig::distance(),
            time_curve: CurveConfig::time(),
            speed_curve: CurveConfig::speed(),
            distance_limit: default_distance_limit(),
            time_limit: default_time_limit(),
            speed_limit: default_speed_limit(),
            polling_rate_hz: default_polling_rate(),
            debt_paying_speed: default_debt_paying_speed(),
            continuous_damping: default_continuous_damping(),
        }
    }
}

impl AssistConfig {
    /// Validate limits, field and curves
    pub fn validate(&self) -> Result<()> {
        self.field.validate()?;

        for (name, curve) in [
            ("distance", &self.distance_curve),
            ("time", &self.time_curve),
            ("speed", &self.speed_curve),
        ] {
            curve.build()?;
            if !curve.input_scale.is_finite() || curve.input_scale < 0.0 {
                return Err(AssistError::InvalidConfig(format!(
                    "{} curve input_scale must be finite and non-negative, got {}",
                    name, curve.input_scale
                )));
            }
        }

        for (name, value) in [
            ("distance_limit", self.distance_limit),
            ("time_limit", self.time_limit),
            ("speed_limit", self.speed_limit),
            ("polling_rate_hz", self.polling_rate_hz),
            ("debt_paying_speed", self.debt_paying_speed),
            ("continuous_damping", self.continuous_damping),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AssistError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Target position with the time it was set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSample {
    /// Target position
    pub position: Vector2,
    /// Clock time of the retarget
    pub at: Duration,
}

/// Mutable controller state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebtState {
    /// Pointer position with no correction applied
    pub real_position: Vector2,

    /// Last corrected position reported
    pub last_position: Vector2,

    /// Error captured at the last retarget
    pub debt: Vector2,

    /// How long the current debt has been outstanding
    pub debt_uptime: Duration,

    /// Clock time the debt age was last advanced
    pub debt_last_update: Duration,

    /// Target being pursued
    pub current_target: Option<TargetSample>,

    /// Target before the current one
    pub previous_target: Option<TargetSample>,

    /// Tracking mode of the current target
    pub mode: AssistMode,
}

impl DebtState {
    fn at(position: Vector2, now: Duration) -> Self {
        Self {
            real_position: position,
            last_position: position,
            debt: Vector2::ZERO,
            debt_uptime: Duration::ZERO,
            debt_last_update: now,
            current_target: None,
            previous_target: None,
            mode: AssistMode::Discrete,
        }
    }
}

/// Controller counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssistStats {
    /// `apply_delta` calls with finite input
    pub ticks: u64,
    /// Ticks that produced a corrected position
    pub corrected_ticks: u64,
    /// Retarget events applied
    pub retargets: u64,
    /// Duplicate retargets ignored
    pub ignored_retargets: u64,
    /// Calls rejected for non-finite input
    pub rejected_inputs: u64,
}

/// Debt-aware pointer correction controller
pub struct DebtController<C: Clock = SystemClock> {
    config: AssistConfig,
    attractor: PotentialAttractor,
    distance_curve: EasingCurve,
    time_curve: EasingCurve,
    speed_curve: EasingCurve,
    clock: C,
    state: DebtState,
    stats: AssistStats,
}

impl DebtController<SystemClock> {
    /// Create a controller driven by the wall clock
    pub fn new(config: AssistConfig, origin: Vector2) -> Result<Self> {
        Self::with_clock(config, SystemClock::new(), origin)
    }
}

impl<C: Clock> DebtController<C> {
    /// Create a controller with an injected clock, idle at `origin`
    pub fn with_clock(config: AssistConfig, clock: C, origin: Vector2) -> Result<Self> {
        config.validate()?;
        if !origin.is_finite() {
            return Err(AssistError::InvalidPosition(origin.x, origin.y));
        }

        let attractor = PotentialAttractor::new(config.field.clone())?;
        let distance_curve = config.distance_curve.build()?;
        let time_curve = config.time_curve.build()?;
        let speed_curve = config.speed_curve.build()?;
        let state = DebtState::at(origin, clock.now());

        Ok(Self {
            config,
            attractor,
            distance_curve,
            time_curve,
            speed_curve,
            clock,
            state,
            stats: AssistStats::default(),
        })
    }

    /// Return to idle with real and last position at `position`
    pub fn reset(&mut self, position: Vector2) -> Result<()> {
        if !position.is_finite() {
            self.stats.rejected_inputs += 1;
            warn!("Rejected reset to non-finite position {}", position);
            return Err(AssistError::InvalidPosition(position.x, position.y));
        }

        self.state = DebtState::at(position, self.clock.now());
        debug!("Assist reset at {}", position);
        Ok(())
    }

    /// Return to idle at the position reported by `source`
    pub fn reset_from<S: PositionSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        self.reset(source.read())
    }

    /// Set a new target
    ///
    /// Captures the current error as debt and restarts the debt clock.
    /// Re-setting the current target without the clock advancing is a no-op.
    pub fn set_target(&mut self, x: f64, y: f64, continuous: bool) -> Result<()> {
        let position = Vector2::new(x, y);
        if !position.is_finite() {
            self.stats.rejected_inputs += 1;
            warn!("Rejected non-finite target {}", position);
            return Err(AssistError::InvalidPosition(x, y));
        }

        let now = self.clock.now();
        if let Some(current) = self.state.current_target {
            if current.position == position && current.at == now {
                self.stats.ignored_retargets += 1;
                trace!("Ignoring duplicate retarget to {}", position);
                return Ok(());
            }
        }

        let mode = AssistMode::from_continuous(continuous);
        let state = &mut self.state;

        state.debt = state.real_position - state.last_position;
        state.debt_uptime = Duration::ZERO;
        state.debt_last_update = now;

        state.previous_target = state.current_target;
        state.current_target = Some(TargetSample { position, at: now });

        if state.mode != mode {
            debug!("Assist mode changed: {} -> {}", state.mode, mode);
        }
        state.mode = mode;
        self.stats.retargets += 1;

        debug!(
            "Retarget to {} ({}), debt={}",
            position, mode, self.state.debt
        );
        Ok(())
    }

    /// Advance by a raw pointer delta and return the corrected position
    ///
    /// Returns `Ok(None)` when idle or when the delta is zero; the pointer
    /// should then be left where it is.
    pub fn apply_delta(&mut self, dx: f64, dy: f64) -> Result<Option<Vector2>> {
        let mut delta = Vector2::new(dx, dy);
        if !delta.is_finite() {
            self.stats.rejected_inputs += 1;
            warn!("Rejected non-finite delta {}", delta);
            return Err(AssistError::InvalidPosition(dx, dy));
        }

        self.stats.ticks += 1;

        let Some(target) = self.state.current_target else {
            return Ok(None);
        };
        if delta.is_zero() {
            return Ok(None);
        }

        let snapshot = self.state;

        if self.state.mode == AssistMode::Continuous {
            delta = delta * self.config.continuous_damping;
        }
        self.state.real_position += delta;

        let attraction = match self.attractor.attract(self.state.real_position, target.position) {
            Ok(attraction) => attraction,
            Err(e) => {
                self.state = snapshot;
                self.stats.rejected_inputs += 1;
                warn!("Rejected delta {}: {}", delta, e);
                return Err(e);
            }
        };

        let repayment = self.mitigate_error();
        let corrected = attraction.position + repayment;
        if !corrected.is_finite() {
            self.state = snapshot;
            self.stats.rejected_inputs += 1;
            warn!("Rejected delta {}: corrected position {} not finite", delta, corrected);
            return Err(AssistError::InvalidPosition(corrected.x, corrected.y));
        }

        self.state.last_position = corrected;
        self.stats.corrected_ticks += 1;

        trace!(
            "Tick: delta={}, real={}, pull={}, repay={}, out={}",
            delta,
            self.state.real_position,
            attraction.delta,
            repayment,
            corrected
        );

        Ok(Some(corrected))
    }

    /// Feed the movement since the last reported position
    ///
    /// Reads `source` and applies the difference to [`Self::last_position`]
    /// as a delta. Returns `Ok(None)` when the pointer has not moved.
    pub fn poll<S: PositionSource + ?Sized>(&mut self, source: &S) -> Result<Option<Vector2>> {
        let position = source.read();
        if !position.is_finite() {
            self.stats.rejected_inputs += 1;
            warn!("Rejected non-finite pointer read {}", position);
            return Err(AssistError::InvalidPosition(position.x, position.y));
        }
        if self.state.current_target.is_none() || position == self.state.last_position {
            return Ok(None);
        }

        let delta = position - self.state.last_position;
        self.apply_delta(delta.x, delta.y)
    }

    /// Repayment for this tick
    ///
    /// Zero until two targets have been seen, and while the debt is below
    /// [`NEGLIGIBLE_DEBT`]. Otherwise ages the debt clock and returns the
    /// debt scaled by the mode's shaped ratio.
    pub fn mitigate_error(&mut self) -> Vector2 {
        let (Some(current), Some(previous)) =
            (self.state.current_target, self.state.previous_target)
        else {
            return Vector2::ZERO;
        };
        if self.state.debt.length() < NEGLIGIBLE_DEBT {
            return Vector2::ZERO;
        }

        let now = self.clock.now();
        self.state.debt_uptime += now.saturating_sub(self.state.debt_last_update);
        self.state.debt_last_update = now;

        let ratio = match self.state.mode {
            AssistMode::Continuous => self.speed_ratio(current, previous),
            AssistMode::Discrete => self.distance_ratio(current, previous) * self.time_ratio(),
        } * self.config.debt_paying_speed;

        self.state.debt * ratio
    }

    fn speed_ratio(&self, current: TargetSample, previous: TargetSample) -> f64 {
        let elapsed = current.at.saturating_sub(previous.at).as_secs_f64();
        let frames = elapsed * self.config.polling_rate_hz;
        let speed = if frames > 0.0 {
            (current.position.distance(previous.position) / frames).min(self.config.speed_limit)
        } else {
            0.0
        };

        let input = normalized(speed, self.config.speed_limit) * self.config.speed_curve.input_scale;
        self.speed_curve.evaluate_as_ratio(input)
    }

    fn distance_ratio(&self, current: TargetSample, previous: TargetSample) -> f64 {
        let distance = current
            .position
            .distance(previous.position)
            .min(self.config.distance_limit);

        let input =
            normalized(distance, self.config.distance_limit) * self.config.distance_curve.input_scale;
        self.distance_curve.evaluate_as_ratio(input)
    }

    fn time_ratio(&self) -> f64 {
        let time = self
            .state
            .debt_uptime
            .as_secs_f64()
            .min(self.config.time_limit);

        let input = normalized(time, self.config.time_limit) * self.config.time_curve.input_scale;
        self.time_curve.evaluate_as_ratio(input)
    }

    /// Lifecycle phase
    pub fn phase(&self) -> AssistPhase {
        match self.state.current_target {
            None => AssistPhase::Idle,
            Some(_) => AssistPhase::Active(self.state.mode),
        }
    }

    /// Full controller state
    pub fn state(&self) -> &DebtState {
        &self.state
    }

    /// Uncorrected pointer position
    pub fn real_position(&self) -> Vector2 {
        self.state.real_position
    }

    /// Last corrected position
    pub fn last_position(&self) -> Vector2 {
        self.state.last_position
    }

    /// Outstanding debt
    pub fn debt(&self) -> Vector2 {
        self.state.debt
    }

    /// Age of the outstanding debt
    pub fn debt_uptime(&self) -> Duration {
        self.state.debt_uptime
    }

    /// Current tracking mode
    pub fn mode(&self) -> AssistMode {
        self.state.mode
    }

    /// Target being pursued
    pub fn current_target(&self) -> Option<TargetSample> {
        self.state.current_target
    }

    /// Target before the current one
    pub fn previous_target(&self) -> Option<TargetSample> {
        self.state.previous_target
    }

    /// Controller counters
    pub fn stats(&self) -> AssistStats {
        self.stats
    }

    /// Configuration in use
    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Injected clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

/// `value / limit`, zero when the limit is zero
fn normalized(value: f64, limit: f64) -> f64 {
    if limit > 0.0 {
        value / limit
    } else {
        0.0
    }
}
