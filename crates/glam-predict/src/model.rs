//! The fitted-model object consumed by the prediction generator.
//!
//! Produced by an external fitting step (or loaded with [`crate::loader`]):
//!
//! - [`ObservedData`] — the observed trials, with every non-core column kept
//!   as a string covariate,
//! - [`Estimates`] — per-subject (and per-condition) parameter estimates,
//! - [`DependencyMap`] — which condition column each parameter varies by.

use std::collections::BTreeMap;
use std::fmt;

use glam_core::{ParamName, Parameters, SubjectId, TrialId};

use crate::{PredictError, PredictResult};

// ── Level ─────────────────────────────────────────────────────────────────────

/// A normalised condition level.
///
/// Numeric levels compare by value (`"1"`, `"1.0"` and `" 1 "` are equal);
/// anything else compares as trimmed text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Level(String);

impl Level {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(x) if x.is_finite() => {
                let x = if x == 0.0 { 0.0 } else { x };
                Level(format!("{x}"))
            }
            _ => Level(trimmed.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Observed data ─────────────────────────────────────────────────────────────

/// One observed trial.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservedTrial {
    pub subject:    SubjectId,
    pub trial:      TrialId,
    /// Observed response time; `NaN` when missing.
    pub rt:         f64,
    pub choice:     Option<usize>,
    pub values:     Vec<f64>,
    pub gaze:       Vec<f64>,
    /// Raw covariate cells in [`ObservedData::covariate_names`] order.
    pub covariates: Vec<String>,
}

/// The observed-trials table.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservedData {
    n_items:         usize,
    covariate_names: Vec<String>,
    trials:          Vec<ObservedTrial>,
}

impl ObservedData {
    /// Validate that every trial has `n_items` values and gaze entries and
    /// one cell per covariate column.
    pub fn new(
        n_items:         usize,
        covariate_names: Vec<String>,
        trials:          Vec<ObservedTrial>,
    ) -> PredictResult<Self> {
        for trial in &trials {
            for (what, got) in [("item values", trial.values.len()), ("gaze", trial.gaze.len())] {
                if got != n_items {
                    return Err(PredictError::ShapeMismatch { expected: n_items, got, what });
                }
            }
            if trial.covariates.len() != covariate_names.len() {
                return Err(PredictError::ShapeMismatch {
                    expected: covariate_names.len(),
                    got:      trial.covariates.len(),
                    what:     "covariates",
                });
            }
        }
        Ok(Self { n_items, covariate_names, trials })
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    pub fn covariate_index(&self, name: &str) -> Option<usize> {
        self.covariate_names.iter().position(|n| n == name)
    }

    pub fn trials(&self) -> &[ObservedTrial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

// ── Estimates ─────────────────────────────────────────────────────────────────

/// One row of the estimates table.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimateRow {
    pub subject: SubjectId,
    /// Levels in [`Estimates::condition_names`] order.
    pub levels:  Vec<Level>,
    pub params:  Parameters,
}

/// The estimates table: `subject`, condition columns, `v, gamma, s, tau, t0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimates {
    condition_names: Vec<String>,
    rows:            Vec<EstimateRow>,
}

impl Estimates {
    pub fn new(condition_names: Vec<String>, rows: Vec<EstimateRow>) -> PredictResult<Self> {
        if let Some(row) = rows.iter().find(|r| r.levels.len() != condition_names.len()) {
            return Err(PredictError::ShapeMismatch {
                expected: condition_names.len(),
                got:      row.levels.len(),
                what:     "estimate condition levels",
            });
        }
        Ok(Self { condition_names, rows })
    }

    pub fn condition_names(&self) -> &[String] {
        &self.condition_names
    }

    pub fn condition_index(&self, name: &str) -> Option<usize> {
        self.condition_names.iter().position(|n| n == name)
    }

    pub fn rows(&self) -> &[EstimateRow] {
        &self.rows
    }
}

// ── DependencyMap ─────────────────────────────────────────────────────────────

/// Per-parameter condition dependencies.  Parameters absent from the map
/// take one value per subject.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DependencyMap(BTreeMap<ParamName, String>);

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `param` varies by the condition column `column`.
    pub fn depends(mut self, param: ParamName, column: impl Into<String>) -> Self {
        self.0.insert(param, column.into());
        self
    }

    pub fn get(&self, param: ParamName) -> Option<&str> {
        self.0.get(&param).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamName, &str)> + '_ {
        self.0.iter().map(|(&p, c)| (p, c.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ParamName, String)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (ParamName, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── FittedModel ───────────────────────────────────────────────────────────────

/// Everything the prediction generator needs from a fit.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedModel {
    pub data:       ObservedData,
    pub estimates:  Estimates,
    pub depends_on: DependencyMap,
}

impl FittedModel {
    /// Bundle the tables, checking that every dependency column exists in
    /// both the data and the estimates.
    pub fn new(
        data:       ObservedData,
        estimates:  Estimates,
        depends_on: DependencyMap,
    ) -> PredictResult<Self> {
        for (_, column) in depends_on.iter() {
            if data.covariate_index(column).is_none() {
                return Err(PredictError::MissingColumn { table: "data", column: column.to_owned() });
            }
            if estimates.condition_index(column).is_none() {
                return Err(PredictError::MissingColumn {
                    table:  "estimates",
                    column: column.to_owned(),
                });
            }
        }
        Ok(Self { data, estimates, depends_on })
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.data.n_items()
    }
}
