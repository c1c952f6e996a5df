//! Whole-subject simulation over a trials × items design.

use glam_core::{ErrorRange, Parameters, SimConfig, SubjectId, TrialId, TrialRng};
use rand::Rng;

use crate::{SimError, SimResult, SimTable, TrialKey, TrialOutcome, TrialSimulator};

// ── ItemMatrix ────────────────────────────────────────────────────────────────

/// Dense row-major `n_trials × n_items` matrix of item values or gaze.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemMatrix {
    n_items:  usize,
    n_trials: usize,
    data:     Vec<f64>,
}

impl ItemMatrix {
    /// Build from equally long rows.  Rows of length zero are kept, so the
    /// trial count always equals `rows.len()`.
    pub fn from_rows<T: AsRef<[f64]>>(rows: &[T]) -> SimResult<Self> {
        let n_items = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * n_items);
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_items {
                return Err(SimError::ShapeMismatch {
                    expected: n_items,
                    got:      row.len(),
                    what:     "matrix row",
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n_items, n_trials: rows.len(), data })
    }

    /// Wrap row-major `data` with `n_items` columns.
    pub fn from_flat(n_items: usize, data: Vec<f64>) -> SimResult<Self> {
        if n_items == 0 || data.len() % n_items != 0 {
            return Err(SimError::ShapeMismatch {
                expected: n_items,
                got:      data.len(),
                what:     "flat matrix data",
            });
        }
        Ok(Self { n_items, n_trials: data.len() / n_items, data })
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    #[inline]
    pub fn row(&self, trial: usize) -> &[f64] {
        &self.data[trial * self.n_items..(trial + 1) * self.n_items]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_trials).map(move |t| self.row(t))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Simulate `n_repeats` draws of every trial for one subject.
///
/// Every trial owns a [`TrialRng`] derived from the run seed, the subject
/// and the trial index, so the table is identical with or without the
/// `parallel` feature.
pub fn simulate_subject(
    params:      &Parameters,
    values:      &ItemMatrix,
    gaze:        &ItemMatrix,
    n_repeats:   u32,
    subject:     SubjectId,
    error_range: ErrorRange,
    config:      &SimConfig,
) -> SimResult<SimTable> {
    check_design(values, gaze)?;
    let sim = TrialSimulator::new(config)?;
    let seed = config.resolve_seed();

    let simulate_one = |t: usize| -> SimResult<Vec<TrialOutcome>> {
        let mut rng = TrialRng::new(seed, subject.0 as u64, t as u64);
        sim.simulate_repeated(params, values.row(t), gaze.row(t), error_range, n_repeats, rng.inner())
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Vec<TrialOutcome>> = (0..values.n_trials())
        .map(simulate_one)
        .collect::<SimResult<_>>()?;

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Vec<TrialOutcome>> = {
        use rayon::prelude::*;
        (0..values.n_trials())
            .into_par_iter()
            .map(simulate_one)
            .collect::<SimResult<_>>()?
    };

    Ok(assemble(values, gaze, n_repeats, subject, &outcomes))
}

/// Like [`simulate_subject`] but draws everything sequentially from `rng`.
///
/// Use this to inject a specific random source; `config.seed` is ignored.
#[allow(clippy::too_many_arguments)]
pub fn simulate_subject_with_rng<R: Rng + ?Sized>(
    params:      &Parameters,
    values:      &ItemMatrix,
    gaze:        &ItemMatrix,
    n_repeats:   u32,
    subject:     SubjectId,
    error_range: ErrorRange,
    config:      &SimConfig,
    rng:         &mut R,
) -> SimResult<SimTable> {
    check_design(values, gaze)?;
    let sim = TrialSimulator::new(config)?;
    let outcomes: Vec<Vec<TrialOutcome>> = values
        .rows()
        .zip(gaze.rows())
        .map(|(v, g)| sim.simulate_repeated(params, v, g, error_range, n_repeats, rng))
        .collect::<SimResult<_>>()?;
    Ok(assemble(values, gaze, n_repeats, subject, &outcomes))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_design(values: &ItemMatrix, gaze: &ItemMatrix) -> SimResult<()> {
    if gaze.n_items() != values.n_items() {
        return Err(SimError::ShapeMismatch {
            expected: values.n_items(),
            got:      gaze.n_items(),
            what:     "gaze matrix columns",
        });
    }
    if gaze.n_trials() != values.n_trials() {
        return Err(SimError::ShapeMismatch {
            expected: values.n_trials(),
            got:      gaze.n_trials(),
            what:     "gaze matrix rows",
        });
    }
    if values.n_trials() > 0 && values.n_items() < 2 {
        return Err(SimError::TooFewItems(values.n_items()));
    }
    Ok(())
}

fn assemble(
    values:    &ItemMatrix,
    gaze:      &ItemMatrix,
    n_repeats: u32,
    subject:   SubjectId,
    outcomes:  &[Vec<TrialOutcome>],
) -> SimTable {
    let mut table = SimTable::with_capacity(
        values.n_items(),
        Vec::new(),
        values.n_trials() * n_repeats as usize,
    );
    for (t, trial_outcomes) in outcomes.iter().enumerate() {
        let key = TrialKey {
            subject,
            trial: TrialId(t as u32),
            values: values.row(t),
            gaze: gaze.row(t),
            covariates: &[],
        };
        table.push_trial(&key, trial_outcomes);
    }
    table
}
