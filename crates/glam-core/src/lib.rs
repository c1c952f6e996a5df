//! `glam-core` — foundational types for the GLAM choice simulator.
//!
//! This crate is a dependency of every other `glam-*` crate.  It has no
//! `glam-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `SubjectId`, `TrialId`                                    |
//! | [`params`]   | `Parameters` (`v, gamma, s, tau, t0`), `ParamName`        |
//! | [`config`]   | `SimConfig`, `ErrorRange`, `StallPolicy`                  |
//! | [`rng`]      | `TrialRng` (per-trial), `SimRng` (run-level)              |
//! | [`error`]    | `GlamError`, `GlamResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod params;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ErrorRange, SimConfig, StallPolicy};
pub use error::{GlamError, GlamResult};
pub use ids::{SubjectId, TrialId};
pub use params::{ParamName, Parameters};
pub use rng::{SimRng, TrialRng};
