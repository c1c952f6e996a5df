//! Run-level simulation configuration.

use crate::{GlamError, GlamResult};

// ── StallPolicy ───────────────────────────────────────────────────────────────

/// What the trial simulator does when the race branch exhausts
/// [`SimConfig::max_retries`] without a valid first-passage time.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StallPolicy {
    /// Abort with a stall error naming the parameters and item count.
    #[default]
    Fail,
    /// Emit the trial with a missing choice and missing rt.
    EmitMissing,
}

// ── ErrorRange ────────────────────────────────────────────────────────────────

/// Response-time interval `[min, max]` of the uniform error component.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorRange {
    pub min: f64,
    pub max: f64,
}

impl ErrorRange {
    /// Validated constructor: both bounds finite and `min <= max`.
    pub fn new(min: f64, max: f64) -> GlamResult<Self> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> GlamResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GlamError::Config(format!(
                "error range ({}, {}) must be finite",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(GlamError::Config(format!(
                "error range min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, rt: f64) -> bool {
        rt >= self.min && rt <= self.max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for ErrorRange {
    /// `(0, 5000)` ms.
    fn default() -> Self {
        Self { min: 0.0, max: 5_000.0 }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Settings shared by every trial of a simulation or prediction run.
///
/// Typically built in code or loaded from a TOML/JSON file by the
/// application crate (enable the `serde` feature).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Decision boundary every accumulator races towards.  Default: 1.
    pub boundary: f64,

    /// Probability that a trial is drawn from the uniform error component
    /// instead of the race.  Default: 0.05.
    pub error_weight: f64,

    /// Maximum number of race resamples per trial before the stall policy
    /// applies.  Default: 10,000.
    pub max_retries: u32,

    /// Behavior when `max_retries` is exhausted.
    pub stall_policy: StallPolicy,

    /// Master RNG seed.  The same seed always produces identical results;
    /// `None` draws a fresh seed for every run.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Check that boundary, error weight and retry bound are usable.
    pub fn validate(&self) -> GlamResult<()> {
        if !self.boundary.is_finite() || self.boundary <= 0.0 {
            return Err(GlamError::Config(format!(
                "boundary must be finite and positive, got {}",
                self.boundary
            )));
        }
        if !(0.0..=1.0).contains(&self.error_weight) {
            return Err(GlamError::Config(format!(
                "error_weight must lie in [0, 1], got {}",
                self.error_weight
            )));
        }
        if self.max_retries == 0 {
            return Err(GlamError::Config("max_retries must be at least 1".into()));
        }
        Ok(())
    }

    /// The seed for this run: the configured one, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_error_weight(mut self, error_weight: f64) -> Self {
        self.error_weight = error_weight;
        self
    }

    pub fn with_boundary(mut self, boundary: f64) -> Self {
        self.boundary = boundary;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            boundary:     1.0,
            error_weight: 0.05,
            max_retries:  10_000,
            stall_policy: StallPolicy::Fail,
            seed:         None,
        }
    }
}
