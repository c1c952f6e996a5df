//! Per-trial parameter resolution.
//!
//! The dependency map is compiled once into one [`Resolution`] per
//! parameter, with both tables' column indices already looked up.  Resolving
//! a trial is then a scan over that subject's (few) estimate rows.

use glam_core::{ErrorRange, ParamName, Parameters, SubjectId};

use crate::{Estimates, FittedModel, Level, ObservedData, ObservedTrial, PredictError, PredictResult};

/// Subject-keyed map; FxHash with the `fx-hash` feature.
#[cfg(feature = "fx-hash")]
pub type SubjectMap<V> = rustc_hash::FxHashMap<SubjectId, V>;
#[cfg(not(feature = "fx-hash"))]
pub type SubjectMap<V> = std::collections::HashMap<SubjectId, V>;

/// How one parameter gets its value for a trial.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    /// The subject's single estimate (first row for the subject).
    #[default]
    Constant,
    /// The estimate row whose level in `column` matches the trial's.
    ByCondition {
        column:          String,
        data_column:     usize,
        estimate_column: usize,
    },
}

/// Compiled dependency map plus a subject → estimate-rows index.
pub struct ParameterResolver<'m> {
    estimates:   &'m Estimates,
    resolutions: [Resolution; 5],
    by_subject:  SubjectMap<Vec<usize>>,
}

impl<'m> ParameterResolver<'m> {
    pub fn new(model: &'m FittedModel) -> PredictResult<Self> {
        let data = &model.data;
        let estimates = &model.estimates;

        let mut resolutions: [Resolution; 5] = Default::default();
        for param in ParamName::ALL {
            if let Some(column) = model.depends_on.get(param) {
                let data_column = data.covariate_index(column).ok_or_else(|| {
                    PredictError::MissingColumn { table: "data", column: column.to_owned() }
                })?;
                let estimate_column = estimates.condition_index(column).ok_or_else(|| {
                    PredictError::MissingColumn { table: "estimates", column: column.to_owned() }
                })?;
                resolutions[param.index()] = Resolution::ByCondition {
                    column: column.to_owned(),
                    data_column,
                    estimate_column,
                };
            }
        }

        let mut by_subject: SubjectMap<Vec<usize>> = SubjectMap::default();
        for (i, row) in estimates.rows().iter().enumerate() {
            by_subject.entry(row.subject).or_default().push(i);
        }

        Ok(Self { estimates, resolutions, by_subject })
    }

    pub fn resolution(&self, param: ParamName) -> &Resolution {
        &self.resolutions[param.index()]
    }

    /// The full parameter vector for one observed trial.
    ///
    /// Fails with [`PredictError::MissingEstimate`] naming the first
    /// parameter that has no matching estimate row, or with
    /// [`GlamError::InvalidParameter`](glam_core::GlamError) when the
    /// resolved vector holds a non-finite entry or a negative `t0`.
    pub fn resolve(&self, trial: &ObservedTrial) -> PredictResult<Parameters> {
        let rows = self
            .by_subject
            .get(&trial.subject)
            .ok_or(PredictError::MissingEstimate {
                subject:   trial.subject,
                parameter: ParamName::V,
                condition: None,
            })?;

        let mut params = Parameters::from_array([f64::NAN; 5]);
        for param in ParamName::ALL {
            let row = match &self.resolutions[param.index()] {
                // `by_subject` never holds an empty list.
                Resolution::Constant => &self.estimates.rows()[rows[0]],
                Resolution::ByCondition { column, data_column, estimate_column } => {
                    let level = Level::new(&trial.covariates[*data_column]);
                    rows.iter()
                        .map(|&i| &self.estimates.rows()[i])
                        .find(|row| row.levels[*estimate_column] == level)
                        .ok_or_else(|| PredictError::MissingEstimate {
                            subject:   trial.subject,
                            parameter: param,
                            condition: Some(format!("{column} = {level}")),
                        })?
                }
            };
            params.set(param, row.params.get(param));
        }
        params.validate()?;
        Ok(params)
    }
}

/// Per-subject `(min rt, max rt)` over that subject's observed trials.
///
/// Non-finite rts are skipped.  A subject with no finite rt at all is an
/// error, since the error component would have no support.
pub fn subject_error_ranges(data: &ObservedData) -> PredictResult<SubjectMap<ErrorRange>> {
    let mut bounds: SubjectMap<Option<(f64, f64)>> = SubjectMap::default();
    for trial in data.trials() {
        let entry = bounds.entry(trial.subject).or_insert(None);
        if trial.rt.is_finite() {
            *entry = Some(match *entry {
                None => (trial.rt, trial.rt),
                Some((lo, hi)) => (lo.min(trial.rt), hi.max(trial.rt)),
            });
        }
    }

    bounds
        .into_iter()
        .map(|(subject, b)| -> PredictResult<(SubjectId, ErrorRange)> {
            let (min, max) = b.ok_or(PredictError::NoObservedRt(subject))?;
            Ok((subject, ErrorRange::new(min, max)?))
        })
        .collect()
}
