use std::fmt;
use std::str::FromStr;

use crate::config::PileConfig;
use crate::error::PileError;

/// Number of items in a pile: a non-negative integer or positive infinity.
///
/// Arithmetic on the unbounded case is special-cased rather than computed:
/// `x + ∞ = ∞`, `∞ - x = ∞` for finite `x`, and no operation ever multiplies
/// zero by infinity.
///
/// Variant order makes every finite count compare below [`Count::Infinite`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Count {
    Finite(u64),
    Infinite,
}

impl Count {
    pub const ZERO: Self = Self::Finite(0);
    pub const ONE: Self = Self::Finite(1);
    pub const MAX_PILE: Self = Self::Finite(PileConfig::MAX_PILE_SIZE);

    #[inline]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Finite(0))
    }

    /// Returns the finite value, or `None` for an infinite count.
    #[inline]
    pub const fn finite(self) -> Option<u64> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Infinite => None,
        }
    }

    /// Sum that absorbs into infinity and saturates at `u64::MAX`.
    pub fn saturating_add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.saturating_add(b)),
            _ => Self::Infinite,
        }
    }

    /// Difference clamped at zero; an infinite minuend stays infinite.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Infinite, _) => Self::Infinite,
            (Self::Finite(_), Self::Infinite) => Self::ZERO,
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.saturating_sub(b)),
        }
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::Finite(PileConfig::DEFAULT_COUNT)
    }
}

impl From<u64> for Count {
    fn from(value: u64) -> Self {
        Self::Finite(value)
    }
}

impl From<u32> for Count {
    fn from(value: u32) -> Self {
        Self::Finite(u64::from(value))
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str(PileConfig::INFINITY_TOKEN),
        }
    }
}

impl FromStr for Count {
    type Err = PileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PileConfig::INFINITY_TOKEN {
            return Ok(Self::Infinite);
        }
        // u64 parsing alone would accept a leading '+'.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PileError::InvalidCount {
                token: s.to_string(),
            });
        }
        s.parse::<u64>()
            .map(Self::Finite)
            .map_err(|_| PileError::InvalidCount {
                token: s.to_string(),
            })
    }
}

// JSON has no infinity literal, so the unbounded count travels as the same
// token the textual form uses.
#[cfg(feature = "serde")]
impl serde::Serialize for Count {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Finite(n) => serializer.serialize_u64(*n),
            Self::Infinite => serializer.serialize_str(PileConfig::INFINITY_TOKEN),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Count {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Token(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(Self::Finite(n)),
            Repr::Token(token) => token.parse().map_err(serde::de::Error::custom),
        }
    }
}
