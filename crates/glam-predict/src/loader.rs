//! CSV loaders for the fitted model's tables.
//!
//! # Observed trials
//!
//! ```csv
//! subject,trial,rt,choice,item_value_0,item_value_1,gaze_0,gaze_1,speed
//! 0,0,1210,0,5,3,0.8,0.2,fast
//! 0,1,1875,1,4,4,0.5,0.5,slow
//! ```
//!
//! `subject`, `trial`, `rt`, `choice`, `item_value_{i}` and `gaze_{i}` are
//! required.  Every other column is kept verbatim as a covariate and copied
//! into predictions.  Empty `rt` cells load as `NaN`, empty `choice` cells
//! as "no choice".
//!
//! # Estimates
//!
//! ```csv
//! subject,speed,v,gamma,s,tau,t0
//! 0,fast,0.00009,0.3,0.008,1.1,120
//! 0,slow,0.00006,0.3,0.008,1.1,120
//! ```
//!
//! `subject` and the five parameter columns are required; every other
//! column is a condition column.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use glam_core::ids::parse_integral;
use glam_core::{ParamName, Parameters, SubjectId, TrialId};

use crate::{
    DependencyMap, EstimateRow, Estimates, FittedModel, Level, ObservedData, ObservedTrial,
    PredictError, PredictResult,
};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the observed-trials table from a CSV file.
pub fn load_data_csv(path: &Path, n_items: usize) -> PredictResult<ObservedData> {
    let file = std::fs::File::open(path)?;
    load_data_reader(file, n_items)
}

/// Like [`load_data_csv`] but accepts any `Read` source.
pub fn load_data_reader<R: Read>(reader: R, n_items: usize) -> PredictResult<ObservedData> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = DataColumns::locate(&headers, n_items)?;

    let mut trials = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let at = |column: &str| format!("data row {}, column {column:?}", line + 1);

        let values = columns
            .values
            .iter()
            .enumerate()
            .map(|(i, &idx)| parse_f64(cell(idx), || at(&format!("item_value_{i}"))))
            .collect::<PredictResult<Vec<f64>>>()?;
        let gaze = columns
            .gaze
            .iter()
            .enumerate()
            .map(|(i, &idx)| parse_f64(cell(idx), || at(&format!("gaze_{i}"))))
            .collect::<PredictResult<Vec<f64>>>()?;

        let rt = match cell(columns.rt).trim() {
            "" => f64::NAN,
            raw => parse_f64(raw, || at("rt"))?,
        };
        let choice = match cell(columns.choice).trim() {
            "" => None,
            raw => Some(parse_index(raw, || at("choice"))?),
        };

        trials.push(ObservedTrial {
            subject: cell(columns.subject).parse::<SubjectId>()?,
            trial: cell(columns.trial).parse::<TrialId>()?,
            rt,
            choice,
            values,
            gaze,
            covariates: columns.covariates.iter().map(|&idx| cell(idx).to_owned()).collect(),
        });
    }

    let covariate_names = columns.covariates.iter().map(|&idx| headers[idx].to_owned()).collect();
    ObservedData::new(n_items, covariate_names, trials)
}

/// Load the estimates table from a CSV file.
pub fn load_estimates_csv(path: &Path) -> PredictResult<Estimates> {
    let file = std::fs::File::open(path)?;
    load_estimates_reader(file)
}

/// Like [`load_estimates_csv`] but accepts any `Read` source.
pub fn load_estimates_reader<R: Read>(reader: R) -> PredictResult<Estimates> {
    let mut csv_reader = csv_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let subject = require(&headers, "estimates", "subject")?;
    let params = ParamName::ALL
        .iter()
        .map(|p| require(&headers, "estimates", p.as_str()))
        .collect::<PredictResult<Vec<usize>>>()?;
    let conditions: Vec<usize> = (0..headers.len())
        .filter(|idx| *idx != subject && !params.contains(idx))
        .collect();

    let mut rows = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let mut values = [0.0; 5];
        for (slot, (&idx, name)) in values.iter_mut().zip(params.iter().zip(ParamName::ALL)) {
            *slot = parse_f64(cell(idx), || format!("estimates row {}, column {:?}", line + 1, name.as_str()))?;
        }

        rows.push(EstimateRow {
            subject: cell(subject).parse::<SubjectId>()?,
            levels:  conditions.iter().map(|&idx| Level::new(cell(idx))).collect(),
            params:  Parameters::from_array(values),
        });
    }

    let condition_names = conditions.iter().map(|&idx| headers[idx].to_owned()).collect();
    Estimates::new(condition_names, rows)
}

/// Load both tables and bundle them into a validated [`FittedModel`].
pub fn load_model_csv(
    data_path:      &Path,
    estimates_path: &Path,
    depends_on:     DependencyMap,
    n_items:        usize,
) -> PredictResult<FittedModel> {
    let data = load_data_csv(data_path, n_items)?;
    let estimates = load_estimates_csv(estimates_path)?;
    FittedModel::new(data, estimates, depends_on)
}

// ── Column layout ─────────────────────────────────────────────────────────────

struct DataColumns {
    subject:    usize,
    trial:      usize,
    rt:         usize,
    choice:     usize,
    values:     Vec<usize>,
    gaze:       Vec<usize>,
    covariates: Vec<usize>,
}

impl DataColumns {
    fn locate(headers: &StringRecord, n_items: usize) -> PredictResult<Self> {
        let subject = require(headers, "data", "subject")?;
        let trial = require(headers, "data", "trial")?;
        let rt = require(headers, "data", "rt")?;
        let choice = require(headers, "data", "choice")?;
        let values = (0..n_items)
            .map(|i| require(headers, "data", &format!("item_value_{i}")))
            .collect::<PredictResult<Vec<_>>>()?;
        let gaze = (0..n_items)
            .map(|i| require(headers, "data", &format!("gaze_{i}")))
            .collect::<PredictResult<Vec<_>>>()?;

        let core: Vec<usize> = [subject, trial, rt, choice]
            .into_iter()
            .chain(values.iter().copied())
            .chain(gaze.iter().copied())
            .collect();
        let covariates = (0..headers.len()).filter(|idx| !core.contains(idx)).collect();

        Ok(Self { subject, trial, rt, choice, values, gaze, covariates })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader)
}

fn require(headers: &StringRecord, table: &'static str, column: &str) -> PredictResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| PredictError::MissingColumn { table, column: column.to_owned() })
}

fn parse_f64(raw: &str, at: impl FnOnce() -> String) -> PredictResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| PredictError::Parse(format!("{}: invalid number {raw:?}", at())))
}

fn parse_index(raw: &str, at: impl FnOnce() -> String) -> PredictResult<usize> {
    parse_integral(raw)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| PredictError::Parse(format!("{}: invalid item index {raw:?}", at())))
}
