//! Strongly typed identifier wrappers.
//!
//! Subjects and trials are both plain integers in the source tables; the
//! wrappers keep them from being swapped at call sites.  Table loaders
//! accept integral floats (`"3.0"`) because upstream tools often export
//! integer columns that way.

use std::fmt;
use std::str::FromStr;

use crate::GlamError;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }

        impl FromStr for $name {
            type Err = GlamError;

            fn from_str(s: &str) -> Result<$name, GlamError> {
                parse_integral(s)
                    .and_then(|n| <$inner>::try_from(n).ok())
                    .map($name)
                    .ok_or_else(|| {
                        GlamError::Parse(format!(
                            "invalid {} {s:?}: expected a non-negative integer",
                            stringify!($name),
                        ))
                    })
            }
        }
    };
}

typed_id! {
    /// Subject (participant) identifier.
    pub struct SubjectId(u32);
}

typed_id! {
    /// Trial index within a subject's data.
    pub struct TrialId(u32);
}

/// Parse `"7"` or `"7.0"` as 7.  Rejects negatives, fractions and NaN.
pub fn parse_integral(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let x: f64 = s.parse().ok()?;
    if x.is_finite() && x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 {
        Some(x as u64)
    } else {
        None
    }
}
