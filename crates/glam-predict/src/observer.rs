//! Progress reporting for prediction runs.

use tracing::info;

/// Callbacks invoked by [`Predictor::run`][crate::Predictor::run].
///
/// All methods have default no-op implementations.  Callbacks never affect
/// the simulated output.
pub trait PredictObserver {
    /// Called once before the first trial is simulated.
    fn on_start(&mut self, _n_trials: usize, _n_repeats: u32) {}

    /// Called after each observed trial's rows are written.  `done` counts
    /// trials written so far, `total` is the number of observed trials.
    fn on_trial_end(&mut self, _done: usize, _total: usize) {}

    /// Called once with the final row count.
    fn on_end(&mut self, _rows: usize) {}
}

/// A [`PredictObserver`] that does nothing.
pub struct NoopObserver;

impl PredictObserver for NoopObserver {}

/// Emits `tracing` events at start, every `every` trials, and at the end.
pub struct ProgressLogger {
    every: usize,
}

impl ProgressLogger {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self::new(1_000)
    }
}

impl PredictObserver for ProgressLogger {
    fn on_start(&mut self, n_trials: usize, n_repeats: u32) {
        info!(n_trials, n_repeats, "generating predictions for {n_trials} trials ({n_repeats} repeats each)");
    }

    fn on_trial_end(&mut self, done: usize, total: usize) {
        if done.is_multiple_of(self.every) || done == total {
            info!(done, total, "prediction progress");
        }
    }

    fn on_end(&mut self, rows: usize) {
        info!(rows, "predictions complete");
    }
}
