use glam_core::{GlamError, Parameters};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] GlamError),

    #[error("{what} length {got} does not match expected {expected}")]
    ShapeMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("a trial needs at least two items, got {0}")]
    TooFewItems(usize),

    #[error("race stalled after {retries} resamples with {n_items} items and parameters {parameters}")]
    Stalled {
        retries:    u32,
        n_items:    usize,
        parameters: Parameters,
    },
}

pub type SimResult<T> = Result<T, SimError>;
