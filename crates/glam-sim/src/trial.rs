//! Single-trial simulation: the error mixture and the accumulator race.
//!
//! ```text
//! u ~ U(0, 1)
//! u < error_weight  → choice ~ U{0..n},  rt ~ U(error_range)
//! otherwise         → repeat { t_i ~ FirstPassage(b, R_i, s) }
//!                     until min t_i is finite and ≥ 0 (at most max_retries)
//!                     choice = argmin t_i,  rt = min t_i + t0
//! ```

use glam_core::{ErrorRange, Parameters, SimConfig, StallPolicy};
use rand::Rng;
use rand::distributions::Distribution;
use tracing::{trace, warn};

use crate::{FirstPassage, SimError, SimResult, evidence_rates};

// ── TrialOutcome ──────────────────────────────────────────────────────────────

/// Which branch of the trial state machine produced an outcome.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutcomeSource {
    Race,
    Error,
    /// The race exhausted its retry budget under `StallPolicy::EmitMissing`.
    Stalled,
}

/// One simulated response.
///
/// `choice` and `rt` are `None` only for stalled trials.  Emitted rts are
/// always finite.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TrialOutcome {
    pub choice: Option<usize>,
    pub rt:     Option<f64>,
    pub source: OutcomeSource,
}

impl TrialOutcome {
    fn race(choice: usize, rt: f64) -> Self {
        Self { choice: Some(choice), rt: Some(rt), source: OutcomeSource::Race }
    }

    fn error(choice: usize, rt: f64) -> Self {
        Self { choice: Some(choice), rt: Some(rt), source: OutcomeSource::Error }
    }

    fn missing() -> Self {
        Self { choice: None, rt: None, source: OutcomeSource::Stalled }
    }
}

// ── TrialSimulator ────────────────────────────────────────────────────────────

/// Simulates trials under one validated [`SimConfig`].
///
/// Holds no per-trial state; share one instance across threads.
#[derive(Clone, Debug)]
pub struct TrialSimulator {
    config: SimConfig,
}

impl TrialSimulator {
    /// Validate `config` once for all trials of a run.
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config: config.clone() })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulate one trial.
    ///
    /// Fails on mismatched `values`/`gaze` lengths, fewer than two items, a
    /// non-finite parameter or negative `t0`, an invalid `error_range`, or
    /// (under `StallPolicy::Fail`) a stalled race.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        params:      &Parameters,
        values:      &[f64],
        gaze:        &[f64],
        error_range: ErrorRange,
        rng:         &mut R,
    ) -> SimResult<TrialOutcome> {
        check_items(values, gaze)?;
        params.validate()?;
        error_range.validate()?;
        self.simulate_checked(params, values, gaze, error_range, rng)
    }

    /// Simulate `n_repeats` independent draws of the same trial.
    pub fn simulate_repeated<R: Rng + ?Sized>(
        &self,
        params:      &Parameters,
        values:      &[f64],
        gaze:        &[f64],
        error_range: ErrorRange,
        n_repeats:   u32,
        rng:         &mut R,
    ) -> SimResult<Vec<TrialOutcome>> {
        check_items(values, gaze)?;
        params.validate()?;
        error_range.validate()?;
        (0..n_repeats)
            .map(|_| self.simulate_checked(params, values, gaze, error_range, rng))
            .collect()
    }

    fn simulate_checked<R: Rng + ?Sized>(
        &self,
        params:      &Parameters,
        values:      &[f64],
        gaze:        &[f64],
        error_range: ErrorRange,
        rng:         &mut R,
    ) -> SimResult<TrialOutcome> {
        let u: f64 = rng.r#gen();
        if u < self.config.error_weight {
            let rt = error_range.min + error_range.width() * rng.r#gen::<f64>();
            let choice = rng.gen_range(0..values.len());
            return Ok(TrialOutcome::error(choice, rt));
        }
        self.race(params, values, gaze, rng)
    }

    fn race<R: Rng + ?Sized>(
        &self,
        params: &Parameters,
        values: &[f64],
        gaze:   &[f64],
        rng:    &mut R,
    ) -> SimResult<TrialOutcome> {
        // Rates are a pure function of the inputs, so one evaluation serves
        // every resample.
        let passages: Vec<FirstPassage> = evidence_rates(params, values, gaze)
            .into_iter()
            .map(|rate| FirstPassage::new(self.config.boundary, rate, params.s))
            .collect();

        for attempt in 0..self.config.max_retries {
            match draw_race(&passages, rng) {
                Some((choice, rt)) => return Ok(TrialOutcome::race(choice, rt + params.t0)),
                None => trace!(attempt, "rejected race draw"),
            }
        }

        warn!(
            retries = self.config.max_retries,
            n_items = values.len(),
            %params,
            "race produced no valid first-passage time",
        );
        match self.config.stall_policy {
            StallPolicy::Fail => Err(SimError::Stalled {
                retries:    self.config.max_retries,
                n_items:    values.len(),
                parameters: *params,
            }),
            StallPolicy::EmitMissing => Ok(TrialOutcome::missing()),
        }
    }
}

/// Simulate one trial with a one-off [`TrialSimulator`].
pub fn simulate_trial<R: Rng + ?Sized>(
    params:      &Parameters,
    values:      &[f64],
    gaze:        &[f64],
    error_range: ErrorRange,
    config:      &SimConfig,
    rng:         &mut R,
) -> SimResult<TrialOutcome> {
    TrialSimulator::new(config)?.simulate(params, values, gaze, error_range, rng)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One race: the earliest first-passage time and its item.
///
/// Every item is sampled even after a `NaN`, so the number of draws per race
/// is fixed.  Returns `None` if any draw is `NaN` or the winner is negative
/// or infinite.  Ties go to the lower index.
fn draw_race<R: Rng + ?Sized>(passages: &[FirstPassage], rng: &mut R) -> Option<(usize, f64)> {
    let mut winner: Option<(usize, f64)> = None;
    let mut any_nan = false;
    for (i, passage) in passages.iter().enumerate() {
        let t = passage.sample(rng);
        if t.is_nan() {
            any_nan = true;
        } else if winner.is_none_or(|(_, best)| t < best) {
            winner = Some((i, t));
        }
    }

    let (choice, rt) = winner?;
    if any_nan || rt < 0.0 || !rt.is_finite() {
        return None;
    }
    Some((choice, rt))
}

fn check_items(values: &[f64], gaze: &[f64]) -> SimResult<()> {
    if gaze.len() != values.len() {
        return Err(SimError::ShapeMismatch {
            expected: values.len(),
            got:      gaze.len(),
            what:     "gaze vector",
        });
    }
    if values.len() < 2 {
        return Err(SimError::TooFewItems(values.len()));
    }
    Ok(())
}
