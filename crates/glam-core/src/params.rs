//! The GLAM parameter vector.

use std::fmt;
use std::str::FromStr;

use crate::{GlamError, GlamResult};

// ── ParamName ─────────────────────────────────────────────────────────────────

/// Names of the five GLAM parameters, in canonical order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParamName {
    V,
    Gamma,
    S,
    Tau,
    T0,
}

impl ParamName {
    /// All parameters in canonical `(v, gamma, s, tau, t0)` order.
    pub const ALL: [ParamName; 5] = [
        ParamName::V,
        ParamName::Gamma,
        ParamName::S,
        ParamName::Tau,
        ParamName::T0,
    ];

    /// Column name used in estimate tables.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::V     => "v",
            ParamName::Gamma => "gamma",
            ParamName::S     => "s",
            ParamName::Tau   => "tau",
            ParamName::T0    => "t0",
        }
    }

    /// Position in the canonical 5-tuple.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = GlamError;

    fn from_str(s: &str) -> Result<Self, GlamError> {
        match s.trim() {
            "v"     => Ok(ParamName::V),
            "gamma" => Ok(ParamName::Gamma),
            "s"     => Ok(ParamName::S),
            "tau"   => Ok(ParamName::Tau),
            "t0"    => Ok(ParamName::T0),
            other   => Err(GlamError::UnknownParameter(other.to_owned())),
        }
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

/// A fully resolved GLAM parameter vector.
///
/// | Field   | Meaning                                                     |
/// |---------|-------------------------------------------------------------|
/// | `v`     | base accumulation gain                                      |
/// | `gamma` | gaze discount on unattended items (0 = full, 1 = none)      |
/// | `s`     | accumulation noise scale                                    |
/// | `tau`   | logistic steepness of the relative-evidence transform       |
/// | `t0`    | non-decision time added to every race rt (ms)               |
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    pub v:     f64,
    pub gamma: f64,
    pub s:     f64,
    pub tau:   f64,
    pub t0:    f64,
}

impl Parameters {
    pub fn new(v: f64, gamma: f64, s: f64, tau: f64, t0: f64) -> Self {
        Self { v, gamma, s, tau, t0 }
    }

    /// Build from a `(v, gamma, s, tau, t0)` array.
    pub fn from_array([v, gamma, s, tau, t0]: [f64; 5]) -> Self {
        Self { v, gamma, s, tau, t0 }
    }

    pub fn to_array(self) -> [f64; 5] {
        [self.v, self.gamma, self.s, self.tau, self.t0]
    }

    #[inline]
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::V     => self.v,
            ParamName::Gamma => self.gamma,
            ParamName::S     => self.s,
            ParamName::Tau   => self.tau,
            ParamName::T0    => self.t0,
        }
    }

    #[inline]
    pub fn set(&mut self, name: ParamName, value: f64) {
        match name {
            ParamName::V     => self.v = value,
            ParamName::Gamma => self.gamma = value,
            ParamName::S     => self.s = value,
            ParamName::Tau   => self.tau = value,
            ParamName::T0    => self.t0 = value,
        }
    }

    /// Check that every entry is finite and `t0` is non-negative.
    ///
    /// Gains, noise and steepness may still be degenerate (e.g. `v <= 0`);
    /// those surface as stalled races rather than here.
    pub fn validate(&self) -> GlamResult<()> {
        for name in ParamName::ALL {
            let value = self.get(name);
            if !value.is_finite() || (name == ParamName::T0 && value < 0.0) {
                return Err(GlamError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(v={}, gamma={}, s={}, tau={}, t0={})",
            self.v, self.gamma, self.s, self.tau, self.t0
        )
    }
}
