//! First-passage time sampling.
//!
//! An accumulator with drift `R` and diffusion `s` hits the boundary `b` at
//! an inverse-Gaussian distributed time with mean `b / R` and shape
//! `(b / s)^2`.  Draws come from a unit-shape inverse Gaussian with mean
//! `mean / shape`, scaled by `shape`.

use rand::Rng;
use rand::distributions::Distribution;
use rand_distr::InverseGaussian;

/// Inverse-Gaussian first-passage distribution for one accumulator.
///
/// Degenerate inputs (zero or negative rate, zero noise) are not rejected:
/// sampling returns `NaN` and the trial simulator resamples.
#[derive(Copy, Clone, Debug)]
pub struct FirstPassage {
    mean:  f64,
    shape: f64,
    /// Unit-shape draw; `None` when the arguments admit no distribution.
    unit:  Option<InverseGaussian<f64>>,
}

impl FirstPassage {
    pub fn new(boundary: f64, rate: f64, noise: f64) -> Self {
        let mean = boundary / rate;
        let shape = (boundary / noise).powi(2);
        let ratio = mean / shape;
        let unit = if ratio.is_finite() && shape.is_finite() {
            InverseGaussian::new(ratio, 1.0).ok()
        } else {
            None
        };
        Self { mean, shape, unit }
    }

    /// Expected hitting time `b / R`.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Shape `(b / s)^2`.
    #[inline]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// `false` when every draw is `NaN`.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.unit.is_some()
    }
}

impl Distribution<f64> for FirstPassage {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.unit {
            Some(unit) => self.shape * unit.sample(rng),
            None => f64::NAN,
        }
    }
}
