//! Posterior-predictive data generation.
//!
//! # Run phases
//!
//! ```text
//! ① Resolve — parameters and error range for every observed trial
//!             (sequential; the first missing estimate aborts the run).
//! ② Simulate — n_repeats draws per trial, in chunks of CHUNK_TRIALS
//!              (parallel with the `parallel` feature).
//! ③ Write   — append each chunk to the preallocated table in input order
//!             and notify the observer.
//! ```

use glam_core::{ErrorRange, Parameters, SimConfig, SubjectId, TrialRng};
use glam_sim::{SimResult, SimTable, TrialKey, TrialOutcome, TrialSimulator};
use tracing::info;

use crate::resolve::{ParameterResolver, SubjectMap, subject_error_ranges};
use crate::{FittedModel, NoopObserver, PredictError, PredictObserver, PredictResult, ProgressLogger};

/// Trials simulated between two observer updates.
const CHUNK_TRIALS: usize = 1_024;

// ── PredictionSet ─────────────────────────────────────────────────────────────

/// Predictions from one fitted model or from several.
#[derive(Clone, Debug, PartialEq)]
pub enum PredictionSet {
    Single(SimTable),
    Multiple(Vec<SimTable>),
}

impl PredictionSet {
    pub fn tables(&self) -> impl Iterator<Item = &SimTable> + '_ {
        let tables: &[SimTable] = match self {
            PredictionSet::Single(table) => std::slice::from_ref(table),
            PredictionSet::Multiple(tables) => tables,
        };
        tables.iter()
    }

    pub fn len(&self) -> usize {
        match self {
            PredictionSet::Single(_) => 1,
            PredictionSet::Multiple(tables) => tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<SimTable> {
        match self {
            PredictionSet::Single(table) => vec![table],
            PredictionSet::Multiple(tables) => tables,
        }
    }
}

// ── Predictor ─────────────────────────────────────────────────────────────────

/// Resolved view of a fitted model, ready to generate predictions.
pub struct Predictor<'m> {
    model:        &'m FittedModel,
    resolver:     ParameterResolver<'m>,
    error_ranges: SubjectMap<ErrorRange>,
}

/// Per-trial inputs fixed by the resolve phase.
struct TrialPlan {
    params:      Parameters,
    error_range: ErrorRange,
}

impl<'m> Predictor<'m> {
    pub fn new(model: &'m FittedModel) -> PredictResult<Self> {
        Ok(Self {
            model,
            resolver: ParameterResolver::new(model)?,
            error_ranges: subject_error_ranges(&model.data)?,
        })
    }

    /// Parameters for observed trial `row` (position in the data table).
    pub fn trial_parameters(&self, row: usize) -> PredictResult<Parameters> {
        let trials = self.model.data.trials();
        let trial = trials
            .get(row)
            .ok_or(PredictError::RowOutOfRange { row, len: trials.len() })?;
        self.resolver.resolve(trial)
    }

    /// Error-component rt range of `subject`, from its own observed rts.
    pub fn error_range(&self, subject: SubjectId) -> Option<ErrorRange> {
        self.error_ranges.get(&subject).copied()
    }

    /// Simulate `n_repeats` responses for every observed trial.
    ///
    /// Rows come out in data order, repeats innermost.  Each output row
    /// copies the observed trial's subject, trial, values, gaze and
    /// covariates and carries a freshly simulated choice and rt.
    pub fn run<O: PredictObserver>(
        &self,
        n_repeats: u32,
        config:    &SimConfig,
        observer:  &mut O,
    ) -> PredictResult<SimTable> {
        let sim = TrialSimulator::new(config)?;
        let trials = self.model.data.trials();
        let plans = self.plan()?;
        let seed = config.resolve_seed();

        let mut table = SimTable::with_capacity(
            self.model.n_items(),
            self.model.data.covariate_names().to_vec(),
            trials.len() * n_repeats as usize,
        );

        info!(trials = trials.len(), n_repeats, seed, "prediction run started");
        observer.on_start(trials.len(), n_repeats);

        let simulate_one = |row: usize| -> SimResult<Vec<TrialOutcome>> {
            let trial = &trials[row];
            let plan = &plans[row];
            let mut rng = TrialRng::new(seed, trial.subject.0 as u64, row as u64);
            sim.simulate_repeated(
                &plan.params,
                &trial.values,
                &trial.gaze,
                plan.error_range,
                n_repeats,
                rng.inner(),
            )
        };

        let mut start = 0;
        while start < trials.len() {
            let end = (start + CHUNK_TRIALS).min(trials.len());

            #[cfg(not(feature = "parallel"))]
            let outcomes: Vec<Vec<TrialOutcome>> =
                (start..end).map(simulate_one).collect::<SimResult<_>>()?;

            #[cfg(feature = "parallel")]
            let outcomes: Vec<Vec<TrialOutcome>> = {
                use rayon::prelude::*;
                (start..end).into_par_iter().map(simulate_one).collect::<SimResult<_>>()?
            };

            for (row, trial_outcomes) in (start..end).zip(&outcomes) {
                let trial = &trials[row];
                let key = TrialKey {
                    subject:    trial.subject,
                    trial:      trial.trial,
                    values:     &trial.values,
                    gaze:       &trial.gaze,
                    covariates: &trial.covariates,
                };
                table.push_trial(&key, trial_outcomes);
                observer.on_trial_end(row + 1, trials.len());
            }
            start = end;
        }

        observer.on_end(table.len());
        info!(rows = table.len(), "prediction run finished");
        Ok(table)
    }

    fn plan(&self) -> PredictResult<Vec<TrialPlan>> {
        self.model
            .data
            .trials()
            .iter()
            .map(|trial| -> PredictResult<TrialPlan> {
                let params = self.resolver.resolve(trial)?;
                let error_range = self
                    .error_range(trial.subject)
                    .ok_or(PredictError::NoObservedRt(trial.subject))?;
                Ok(TrialPlan { params, error_range })
            })
            .collect()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Generate a posterior-predictive table for `model`.
///
/// `config` supplies the boundary, error weight, retry bound and seed.
/// `verbose` only switches progress logging on; the output is unaffected.
pub fn predict(
    model:     &FittedModel,
    n_repeats: u32,
    config:    &SimConfig,
    verbose:   bool,
) -> PredictResult<SimTable> {
    let predictor = Predictor::new(model)?;
    if verbose {
        predictor.run(n_repeats, config, &mut ProgressLogger::default())
    } else {
        predictor.run(n_repeats, config, &mut NoopObserver)
    }
}

/// [`predict`] for each model in turn.
///
/// One model gives `PredictionSet::Single`, any other count `Multiple`.
/// A seeded `config` gives every model a distinct stream derived from the
/// seed and the model's position.
pub fn predict_many(
    models:    &[FittedModel],
    n_repeats: u32,
    config:    &SimConfig,
    verbose:   bool,
) -> PredictResult<PredictionSet> {
    let tables = models
        .iter()
        .enumerate()
        .map(|(i, model)| {
            let config = match config.seed {
                Some(seed) => config.clone().with_seed(seed.wrapping_add(i as u64)),
                None => config.clone(),
            };
            predict(model, n_repeats, &config, verbose)
        })
        .collect::<PredictResult<Vec<_>>>()?;

    Ok(match <[SimTable; 1]>::try_from(tables) {
        Ok([table]) => PredictionSet::Single(table),
        Err(tables) => PredictionSet::Multiple(tables),
    })
}
