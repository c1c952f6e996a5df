//! `glam-sim` — trial-level GLAM simulation.
//!
//! # Data flow
//!
//! ```text
//! parameters + values + gaze
//!   ① rate     — attention-weighted values → relative evidence → logistic rates
//!   ② passage  — one inverse-Gaussian first-passage time per item
//!   ③ trial    — error mixture, race winner, bounded resampling, + t0
//!   ④ subject  — every (trial, repeat) of a value/gaze matrix → SimTable
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Simulates trials on Rayon's thread pool.               |
//! | `serde`    | Forwards to `glam-core/serde`.                         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use glam_core::{ErrorRange, Parameters, SimConfig, SubjectId};
//! use glam_sim::{ItemMatrix, simulate_subject};
//!
//! let values = ItemMatrix::from_rows(&[vec![5.0, 3.0], vec![4.0, 4.0]])?;
//! let gaze   = ItemMatrix::from_rows(&[vec![0.8, 0.2], vec![0.5, 0.5]])?;
//! let params = Parameters::new(1.0, 0.2, 0.2, 0.5, 300.0);
//! let config = SimConfig::default().with_seed(42);
//! let table  = simulate_subject(&params, &values, &gaze, 10, SubjectId(0), ErrorRange::default(), &config)?;
//! ```

pub mod error;
pub mod passage;
pub mod rate;
pub mod subject;
pub mod table;
pub mod trial;

#[cfg(test)]
mod tests;

pub use error::{SimError, SimResult};
pub use passage::FirstPassage;
pub use rate::{attention_weighted, evidence_rates, relative_evidence};
pub use subject::{ItemMatrix, simulate_subject, simulate_subject_with_rng};
pub use table::{RowView, SimTable, TrialKey};
pub use trial::{OutcomeSource, TrialOutcome, TrialSimulator, simulate_trial};
