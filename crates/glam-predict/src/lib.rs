//! `glam-predict` — posterior-predictive datasets from a fitted GLAM model.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`model`]    | `FittedModel`, `ObservedData`, `Estimates`, `DependencyMap`, `Level` |
//! | [`loader`]   | `load_data_csv`, `load_estimates_csv`, `load_model_csv` (+ reader variants) |
//! | [`resolve`]  | `ParameterResolver`, `Resolution`, `subject_error_ranges`     |
//! | [`predict`]  | `Predictor`, `predict`, `predict_many`, `PredictionSet`       |
//! | [`observer`] | `PredictObserver`, `NoopObserver`, `ProgressLogger`           |
//! | [`error`]    | `PredictError`, `PredictResult<T>`                            |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Simulates observed trials on Rayon's thread pool.      |
//! | `fx-hash`  | FxHash for the per-subject lookup maps.                |
//!
//! # Usage
//!
//! ```rust,ignore
//! use glam_core::{ParamName, SimConfig};
//! use glam_predict::{DependencyMap, load_model_csv, predict};
//!
//! let deps = DependencyMap::new().depends(ParamName::V, "speed");
//! let model = load_model_csv(Path::new("data.csv"), Path::new("estimates.csv"), deps, 2)?;
//! let config = SimConfig::default().with_seed(1);
//! let prediction = predict(&model, 50, &config, true)?;
//! ```

pub mod error;
pub mod loader;
pub mod model;
pub mod observer;
pub mod predict;
pub mod resolve;


pub use error::{PredictError, PredictResult};
pub use loader::{
    load_data_csv, load_data_reader, load_estimates_csv, load_estimates_reader, load_model_csv,
};
pub use model::{DependencyMap, EstimateRow, Estimates, FittedModel, Level, ObservedData, ObservedTrial};
pub use observer::{NoopObserver, PredictObserver, ProgressLogger};
pub use predict::{PredictionSet, Predictor, predict, predict_many};
pub use resolve::{ParameterResolver, Resolution, SubjectMap, subject_error_ranges};
