//! Evidence accumulation rates.
//!
//! ```text
//! A_i  = gaze_i * value_i + (1 - gaze_i) * gamma * value_i
//! R*_i = A_i - max_{j != i} A_j
//! R_i  = v / (1 + exp(-tau * R*_i))
//! ```
//!
//! Each item is compared against the best of the *others*, not the global
//! maximum, which only differs from `A_i - max A` when there are more than
//! two items.

use glam_core::Parameters;

/// Gaze-discounted value of every item.
pub fn attention_weighted(values: &[f64], gaze: &[f64], gamma: f64) -> Vec<f64> {
    debug_assert_eq!(values.len(), gaze.len());
    values
        .iter()
        .zip(gaze)
        .map(|(&value, &g)| g * value + (1.0 - g) * gamma * value)
        .collect()
}

/// Difference between each item and the best other item.
///
/// Tracks the two largest entries so the whole vector costs one pass.  With
/// a single item there is no competitor and its evidence is `+inf`.
pub fn relative_evidence(weighted: &[f64]) -> Vec<f64> {
    let mut best = f64::NEG_INFINITY;
    let mut best_idx = usize::MAX;
    let mut second = f64::NEG_INFINITY;
    for (i, &a) in weighted.iter().enumerate() {
        if a > best || best_idx == usize::MAX {
            second = best;
            best = a;
            best_idx = i;
        } else if a > second {
            second = a;
        }
    }

    weighted
        .iter()
        .enumerate()
        .map(|(i, &a)| if i == best_idx { a - second } else { a - best })
        .collect()
}

/// Instantaneous accumulation rate of every item.
pub fn evidence_rates(params: &Parameters, values: &[f64], gaze: &[f64]) -> Vec<f64> {
    let weighted = attention_weighted(values, gaze, params.gamma);
    relative_evidence(&weighted)
        .into_iter()
        .map(|r_star| params.v / (1.0 + (-params.tau * r_star).exp()))
        .collect()
}
