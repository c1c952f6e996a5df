//! Columnar result table for simulated and predicted trials.
//!
//! One row per `(trial, repeat)`.  Rows are written into preallocated
//! column arrays in input order and never reordered:
//!
//! | Column           | Type            |
//! |------------------|-----------------|
//! | `subject`        | `SubjectId`     |
//! | `trial`          | `TrialId`       |
//! | `repeat`         | `u32`           |
//! | `choice`         | `Option<usize>` |
//! | `rt`             | `Option<f64>`   |
//! | `item_value_{i}` | `f64`           |
//! | `gaze_{i}`       | `f64`           |
//! | covariates       | `String`        |
//!
//! Item values and gaze are stored row-major (`row * n_items + item`).

use glam_core::{SubjectId, TrialId};

use crate::TrialOutcome;

/// Per-trial inputs shared by all repeats of that trial.
#[derive(Copy, Clone, Debug)]
pub struct TrialKey<'a> {
    pub subject:    SubjectId,
    pub trial:      TrialId,
    pub values:     &'a [f64],
    pub gaze:       &'a [f64],
    /// One entry per covariate column, in [`SimTable::covariate_names`] order.
    pub covariates: &'a [String],
}

/// Simulated dataset: struct-of-arrays, one entry per row.
#[derive(Clone, Debug, PartialEq)]
pub struct SimTable {
    n_items:         usize,
    pub subject:     Vec<SubjectId>,
    pub trial:       Vec<TrialId>,
    pub repeat:      Vec<u32>,
    pub choice:      Vec<Option<usize>>,
    pub rt:          Vec<Option<f64>>,
    values:          Vec<f64>,
    gaze:            Vec<f64>,
    covariate_names: Vec<String>,
    /// Column-major: `covariates[column][row]`.
    covariates:      Vec<Vec<String>>,
}

impl SimTable {
    /// Empty table with room for `capacity` rows.
    pub fn with_capacity(n_items: usize, covariate_names: Vec<String>, capacity: usize) -> Self {
        let covariates = covariate_names
            .iter()
            .map(|_| Vec::with_capacity(capacity))
            .collect();
        Self {
            n_items,
            subject: Vec::with_capacity(capacity),
            trial: Vec::with_capacity(capacity),
            repeat: Vec::with_capacity(capacity),
            choice: Vec::with_capacity(capacity),
            rt: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity * n_items),
            gaze: Vec::with_capacity(capacity * n_items),
            covariate_names,
            covariates,
        }
    }

    /// Append one row per outcome; the outcome's position is its repeat index.
    ///
    /// # Panics
    /// Panics if the key's item or covariate counts disagree with the table.
    pub fn push_trial(&mut self, key: &TrialKey<'_>, outcomes: &[TrialOutcome]) {
        assert_eq!(key.values.len(), self.n_items, "value vector length");
        assert_eq!(key.gaze.len(), self.n_items, "gaze vector length");
        assert_eq!(key.covariates.len(), self.covariate_names.len(), "covariate count");

        for (repeat, outcome) in outcomes.iter().enumerate() {
            self.subject.push(key.subject);
            self.trial.push(key.trial);
            self.repeat.push(repeat as u32);
            self.choice.push(outcome.choice);
            self.rt.push(outcome.rt);
            self.values.extend_from_slice(key.values);
            self.gaze.extend_from_slice(key.gaze);
            for (column, value) in self.covariates.iter_mut().zip(key.covariates) {
                column.push(value.clone());
            }
        }
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self) -> usize {
        self.subject.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
    }

    #[inline]
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    pub fn covariate_names(&self) -> &[String] {
        &self.covariate_names
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ["subject", "trial", "repeat", "choice", "rt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for i in 0..self.n_items {
            names.push(format!("item_value_{i}"));
            names.push(format!("gaze_{i}"));
        }
        names.extend(self.covariate_names.iter().cloned());
        names
    }

    // ── Column access ─────────────────────────────────────────────────────

    pub fn values_row(&self, row: usize) -> &[f64] {
        &self.values[row * self.n_items..(row + 1) * self.n_items]
    }

    pub fn gaze_row(&self, row: usize) -> &[f64] {
        &self.gaze[row * self.n_items..(row + 1) * self.n_items]
    }

    /// The `item_value_{item}` column.
    pub fn item_value_column(&self, item: usize) -> Vec<f64> {
        self.values.iter().skip(item).step_by(self.n_items.max(1)).copied().collect()
    }

    /// The `gaze_{item}` column.
    pub fn gaze_column(&self, item: usize) -> Vec<f64> {
        self.gaze.iter().skip(item).step_by(self.n_items.max(1)).copied().collect()
    }

    pub fn covariate(&self, name: &str) -> Option<&[String]> {
        self.covariate_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.covariates[i].as_slice())
    }

    pub fn row(&self, row: usize) -> RowView<'_> {
        RowView { table: self, row }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        (0..self.len()).map(move |row| RowView { table: self, row })
    }

    // ── Summaries ─────────────────────────────────────────────────────────

    /// Number of rows choosing each item.  Rows without a choice are skipped.
    pub fn choice_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_items];
        for &choice in self.choice.iter().flatten() {
            counts[choice] += 1;
        }
        counts
    }

    /// Mean over non-missing rts; `None` if every rt is missing.
    pub fn mean_rt(&self) -> Option<f64> {
        let (sum, n) = self
            .rt
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, n), &rt| (sum + rt, n + 1));
        (n > 0).then(|| sum / n as f64)
    }

    /// Rows whose choice and rt are missing.
    pub fn missing_count(&self) -> usize {
        self.rt.iter().filter(|rt| rt.is_none()).count()
    }
}

// ── RowView ───────────────────────────────────────────────────────────────────

/// Borrowed view of one table row.
#[derive(Copy, Clone)]
pub struct RowView<'a> {
    table: &'a SimTable,
    row:   usize,
}

impl<'a> RowView<'a> {
    pub fn subject(&self) -> SubjectId {
        self.table.subject[self.row]
    }

    pub fn trial(&self) -> TrialId {
        self.table.trial[self.row]
    }

    pub fn repeat(&self) -> u32 {
        self.table.repeat[self.row]
    }

    pub fn choice(&self) -> Option<usize> {
        self.table.choice[self.row]
    }

    pub fn rt(&self) -> Option<f64> {
        self.table.rt[self.row]
    }

    pub fn values(&self) -> &'a [f64] {
        self.table.values_row(self.row)
    }

    pub fn gaze(&self) -> &'a [f64] {
        self.table.gaze_row(self.row)
    }

    pub fn covariate(&self, name: &str) -> Option<&'a str> {
        self.table.covariate(name).map(|column| column[self.row].as_str())
    }
}
