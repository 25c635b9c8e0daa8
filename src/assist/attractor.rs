//! Gaussian Potential Attractor
//!
//! Bounded force field pulling a point toward a target.
//!
//! ```text
//! D = |target - pos|
//! G = exp(-D² / (2σ²))
//! delta = (target - pos) * strength * G      if D <= radius
//! delta = 0                                  otherwise
//! ```
//!
//! The pull is strongest near the target and fades toward the edge of the
//! field. The hard cutoff at `radius` bounds the per-tick displacement to
//! `radius * strength`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::{AssistError, Result};
use super::geometry::Vector2;

/// Force field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field support radius (pixels)
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Gaussian standard deviation (pixels), roughly a third of the radius
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Pull strength (0.0-1.0, fraction of the remaining gap closed at the target)
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_radius() -> f64 {
    160.0
}
fn default_sigma() -> f64 {
    51.9
}
fn default_strength() -> f64 {
    0.5
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            sigma: default_sigma(),
            strength: default_strength(),
        }
    }
}

impl FieldConfig {
    /// Validate field parameters
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(AssistError::InvalidConfig(format!(
                "field radius must be finite and non-negative, got {}",
                self.radius
            )));
        }
        // 2σ² is the Gaussian denominator; it must not underflow or overflow
        if self.sigma <= 0.0 || !(2.0 * self.sigma * self.sigma).is_normal() {
            return Err(AssistError::InvalidConfig(format!(
                "field sigma must be positive with finite, non-zero 2*sigma^2, got {}",
                self.sigma
            )));
        }
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(AssistError::InvalidConfig(format!(
                "field strength must be finite and positive, got {}",
                self.strength
            )));
        }
        Ok(())
    }
}

/// Result of one attraction step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attraction {
    /// Position after attraction
    pub position: Vector2,
    /// Displacement applied
    pub delta: Vector2,
}

/// Stateless Gaussian attractor
#[derive(Debug, Clone)]
pub struct PotentialAttractor {
    config: FieldConfig,
    /// Precomputed `2σ²`
    two_sigma_sq: f64,
}

impl PotentialAttractor {
    /// Create an attractor from a validated field configuration
    pub fn new(config: FieldConfig) -> Result<Self> {
        config.validate()?;
        let two_sigma_sq = 2.0 * config.sigma * config.sigma;
        Ok(Self {
            config,
            two_sigma_sq,
        })
    }

    /// Field configuration
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Pull `pos` toward `target`
    pub fn attract(&self, pos: Vector2, target: Vector2) -> Result<Attraction> {
        if !pos.is_finite() {
            return Err(AssistError::InvalidPosition(pos.x, pos.y));
        }
        if !target.is_finite() {
            return Err(AssistError::InvalidPosition(target.x, target.y));
        }

        let offset = target - pos;
        let distance_sq = offset.length_squared();

        if distance_sq.sqrt() > self.config.radius {
            return Ok(Attraction {
                position: pos,
                delta: Vector2::ZERO,
            });
        }

        let weight = (-distance_sq / self.two_sigma_sq).exp();
        let delta = offset * (self.config.strength * weight);

        trace!(
            "Attract: pos={}, target={}, weight={:.4}, delta={}",
            pos,
            target,
            weight,
            delta
        );

        Ok(Attraction {
            position: pos + delta,
            delta,
        })
    }
}

impl Default for PotentialAttractor {
    fn default() -> Self {
        let config = FieldConfig::default();
        Self {
            two_sigma_sq: 2.0 * config.sigma * config.sigma,
            config,
        }
    }
}
