//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `GlamError` where a
//! core validation failure can reach them.

use thiserror::Error;

use crate::ParamName;

/// The error type for `glam-core` validation and parsing.
#[derive(Debug, Error)]
pub enum GlamError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown parameter {0:?}: expected one of v, gamma, s, tau, t0")]
    UnknownParameter(String),

    #[error("parameter {name} = {value} is out of range")]
    InvalidParameter { name: ParamName, value: f64 },
}

/// Shorthand result type for `glam-core`.
pub type GlamResult<T> = Result<T, GlamError>;
