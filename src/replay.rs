//! Trace Replay
//!
//! Drives a [`DebtController`] from a recorded input trace, standing in for
//! the live polling loop.
//!
//! # Trace Format
//!
//! JSON lines, one event per line, blank lines ignored. `t` is seconds since
//! the start of the trace and must not decrease.
//!
//! ```text
//! {"event":"reset","t":0.0,"x":960.0,"y":540.0}
//! {"event":"target","t":0.0,"x":1000.0,"y":560.0,"continuous":false}
//! {"event":"delta","t":0.0005,"dx":4.0,"dy":1.0}
//! ```
//!
//! Each delta that produces a correction emits `{"t":..,"x":..,"y":..}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::assist::{
    classify_error, AssistConfig, AssistStats, Clock, DebtController, ErrorType, ManualClock,
    Vector2,
};

/// One recorded input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Pointer re-synchronized at an absolute position
    Reset {
        /// Seconds since trace start
        t: f64,
        /// Pointer X
        x: f64,
        /// Pointer Y
        y: f64,
    },

    /// Target changed
    Target {
        /// Seconds since trace start
        t: f64,
        /// Target X
        x: f64,
        /// Target Y
        y: f64,
        /// Target moves continuously (slider)
        #[serde(default)]
        continuous: bool,
    },

    /// Raw relative pointer movement
    Delta {
        /// Seconds since trace start
        t: f64,
        /// X delta
        dx: f64,
        /// Y delta
        dy: f64,
    },
}

impl TraceEvent {
    /// Event timestamp (seconds)
    pub fn time(&self) -> f64 {
        match self {
            Self::Reset { t, .. } | Self::Target { t, .. } | Self::Delta { t, .. } => *t,
        }
    }
}

/// Corrected position emitted for a delta
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceOutput {
    /// Seconds since trace start
    pub t: f64,
    /// Corrected X
    pub x: f64,
    /// Corrected Y
    pub y: f64,
}

/// Totals for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Events read
    pub events: u64,
    /// Corrected positions written
    pub outputs: u64,
    /// Controller counters at the end of the run
    pub stats: AssistStats,
}

/// Replays trace events through a controller on a manual clock
pub struct Replayer {
    controller: DebtController<ManualClock>,
    clock: ManualClock,
    last_t: f64,
}

impl Replayer {
    /// Create a replayer with the pointer idle at the origin
    pub fn new(config: AssistConfig) -> Result<Self> {
        let clock = ManualClock::new();
        let controller = DebtController::with_clock(config, clock.clone(), Vector2::ZERO)
            .context("Failed to create assist controller")?;

        Ok(Self {
            controller,
            clock,
            last_t: 0.0,
        })
    }

    /// Apply one event
    ///
    /// Controller input rejections are logged and skipped; malformed
    /// timestamps are errors.
    pub fn step(&mut self, event: &TraceEvent) -> Result<Option<TraceOutput>> {
        let t = event.time();
        if !t.is_finite() || t < self.last_t {
            anyhow::bail!(
                "Event time {} is not finite or precedes previous event at {}",
                t,
                self.last_t
            );
        }
        let at = Duration::try_from_secs_f64(t)
            .with_context(|| format!("Event time {} out of range", t))?;
        self.clock.set(at);
        self.last_t = t;

        let result = match *event {
            TraceEvent::Reset { x, y, .. } => self.controller.reset(Vector2::new(x, y)).map(|_| None),
            TraceEvent::Target {
                x, y, continuous, ..
            } => self.controller.set_target(x, y, continuous).map(|_| None),
            TraceEvent::Delta { dx, dy, .. } => self.controller.apply_delta(dx, dy),
        };

        match result {
            Ok(position) => Ok(position.map(|p| TraceOutput { t, x: p.x, y: p.y })),
            Err(e) if classify_error(&e) == ErrorType::Input => {
                warn!("Skipping event at t={}: {}", t, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replay a whole trace, writing one JSON line per corrected position
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.with_context(|| format!("Failed to read trace line {}", line_no))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event: TraceEvent = serde_json::from_str(line)
                .with_context(|| format!("Malformed trace event on line {}", line_no))?;
            summary.events += 1;

            let output = self
                .step(&event)
                .with_context(|| format!("Trace line {}", line_no))?;

            if let Some(output) = output {
                serde_json::to_writer(&mut writer, &output)?;
                writeln!(writer)?;
                summary.outputs += 1;
            }
        }

        writer.flush()?;
        summary.stats = self.controller.stats();

        info!(
            "Replay complete: {} events, {} corrected positions, {} rejected",
            summary.events, summary.outputs, summary.stats.rejected_inputs
        );
        debug!("Replay ended at t={:?}", self.clock.now());
        Ok(summary)
    }

    /// Controller being driven
    pub fn controller(&self) -> &DebtController<ManualClock> {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parsing() {
        let event: TraceEvent =
            serde_json::from_str(r#"{"event":"target","t":0.5,"x":10.0,"y":20.0}"#).unwrap();
        assert_eq!(
            event,
            TraceEvent::Target {
                t: 0.5,
                x: 10.0,
                y: 20.0,
                continuous: false
            }
        );
        assert_eq!(event.time(), 0.5);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result = serde_json::from_str::<TraceEvent>(r#"{"event":"click","t":0.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_step_advances_clock() {
        let mut replayer = Replayer::new(AssistConfig::default()).unwrap();
        replayer
            .step(&TraceEvent::Target {
                t: 0.25,
                x: 50.0,
                y: 0.0,
                continuous: false,
            })
            .unwrap();

        let target = replayer.controller().current_target().unwrap();
        assert_eq!(target.at, Duration::from_millis(250));
    }

    #[test]
    fn test_step_rejects_time_going_backwards() {
        let mut replayer = Replayer::new(AssistConfig::default()).unwrap();
        replayer
            .step(&TraceEvent::Delta {
                t: 1.0,
                dx: 1.0,
                dy: 0.0,
            })
            .unwrap();
        assert!(replayer
            .step(&TraceEvent::Delta {
                t: 0.5,
                dx: 1.0,
                dy: 0.0,
            })
            .is_err());
    }

    #[test]
    fn test_step_skips_rejected_input() {
        let mut replayer = Replayer::new(AssistConfig::default()).unwrap();
        let output = replayer
            .step(&TraceEvent::Target {
                t: 0.0,
                x: f64::NAN,
                y: 0.0,
                continuous: false,
            })
            .unwrap();
        assert_eq!(output, None);
        assert_eq!(replayer.controller().stats().rejected_inputs, 1);
    }
}
