use crate::count::Count;
use crate::error::PileError;

/// How much of a pile a split should move into the new pile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitAmount {
    /// Take exactly this many items. Zero, or more than the pile holds, is rejected.
    Take(Count),
    /// Take everything except this many items.
    AllBut(u64),
    /// Take `ceil(count * fraction)` items; only `0 < fraction < 1` is accepted.
    Fraction(f64),
}

impl From<Count> for SplitAmount {
    fn from(count: Count) -> Self {
        Self::Take(count)
    }
}

impl From<u64> for SplitAmount {
    fn from(n: u64) -> Self {
        Self::Take(Count::Finite(n))
    }
}

impl From<u32> for SplitAmount {
    fn from(n: u32) -> Self {
        Self::Take(Count::from(n))
    }
}

/// Negative values mean "all but `|n|`".
impl From<i64> for SplitAmount {
    fn from(n: i64) -> Self {
        if n < 0 {
            Self::AllBut(n.unsigned_abs())
        } else {
            Self::Take(Count::Finite(n.unsigned_abs()))
        }
    }
}

impl From<i32> for SplitAmount {
    fn from(n: i32) -> Self {
        Self::from(i64::from(n))
    }
}

/// Classifies a raw number the way a scripting caller would pass it:
/// integers ≥ 0 (and `+∞`) take, negative integers take all but, and values
/// strictly between 0 and 1 are fractions.
impl TryFrom<f64> for SplitAmount {
    type Error = PileError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        let invalid = || PileError::InvalidSplitAmount { amount };

        if amount.is_nan() {
            return Err(invalid());
        }
        if amount == f64::INFINITY {
            return Ok(Self::Take(Count::Infinite));
        }
        if amount > 0.0 && amount < 1.0 {
            return Ok(Self::Fraction(amount));
        }
        if !amount.is_finite() || amount.fract() != 0.0 || amount.abs() >= u64::MAX as f64 {
            return Err(invalid());
        }

        let magnitude = amount.abs() as u64;
        if amount < 0.0 {
            Ok(Self::AllBut(magnitude))
        } else {
            Ok(Self::Take(Count::Finite(magnitude)))
        }
    }
}
