//! The item pile value object.
//!
//! A pile is `(item, count, tags)`: a quantity of one fungible item type plus
//! the opaque attributes that distinguish it from other piles of the same type.
//!
//! # Invariants
//!
//! - `count` is never negative; a zero count is a valid, exhausted pile
//! - a finite `count` left behind by `increase`/`merge_pile` never exceeds
//!   [`PileConfig::MAX_PILE_SIZE`], unless the excess itself would overflow `u64`
//! - `increase`/`merge_pile` conserve the total: nothing is dropped as overflow
//! - `tags` are owned per pile: [`Clone`] and [`ItemPile::split_pile`] deep-copy them
//!
//! Piles are plain values. Nothing here locks; callers sharing a pile across
//! threads serialise access themselves.

use crate::config::PileConfig;
use crate::count::Count;
use crate::split::SplitAmount;
use crate::tags::{self, Tags};

/// A stack of one item type with a count and optional tags.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPile {
    /// Item identifier; never absent, possibly empty.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_default"))]
    pub item: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_default"))]
    pub count: Count,
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "null_as_default",
            skip_serializing_if = "serde_json::Map::is_empty"
        )
    )]
    pub tags: Tags,
}

/// Reads `null` as the field default, matching the array form.
#[cfg(feature = "serde")]
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ItemPile {
    /// Creates a pile with no tags.
    pub fn new(item: impl Into<String>, count: impl Into<Count>) -> Self {
        Self {
            item: item.into(),
            count: count.into(),
            tags: Tags::new(),
        }
    }

    /// Creates a pile holding the default count of one.
    pub fn single(item: impl Into<String>) -> Self {
        Self::new(item, Count::default())
    }

    /// Attaches tags (builder pattern).
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Defaulting constructor: a missing item becomes `""`, a missing count
    /// becomes one and missing tags become empty.
    pub fn from_parts<S: Into<String>>(
        item: Option<S>,
        count: Option<Count>,
        tags: Option<Tags>,
    ) -> Self {
        Self {
            item: Self::item_from_string(item),
            count: count.unwrap_or_default(),
            tags: tags.unwrap_or_default(),
        }
    }

    /// Normalises an incoming item identifier; `None` becomes `""`.
    pub fn item_from_string<S: Into<String>>(item: Option<S>) -> String {
        item.map(Into::into).unwrap_or_default()
    }

    /// Normalises an outgoing item identifier; `None` becomes `""`.
    pub fn item_to_string(item: Option<&str>) -> String {
        item.unwrap_or_default().to_string()
    }

    // ===== state queries =====

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count.is_zero()
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.count.is_infinite()
    }

    /// Returns true if the tag mapping has at least one key.
    #[inline]
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    // ===== quantity arithmetic =====

    /// Previews `increase` without mutating: returns `(new_count, excess)`.
    ///
    /// An infinite amount or an infinite pile yields an infinite count and no
    /// excess; otherwise the sum is capped at the maximum pile size and the
    /// overflow is reported as excess. `new_count + excess` always equals
    /// `count + amount`: when the excess alone would not fit in a `u64`, it
    /// saturates and the remainder stays in the pile above the maximum.
    pub fn try_adding(&self, amount: impl Into<Count>) -> (Count, u64) {
        match (self.count, amount.into()) {
            (Count::Infinite, _) | (_, Count::Infinite) => (Count::Infinite, 0),
            (Count::Finite(current), Count::Finite(amount)) => {
                let total = u128::from(current) + u128::from(amount);
                let max = u128::from(PileConfig::MAX_PILE_SIZE);
                if total <= max {
                    return (Count::Finite(current + amount), 0);
                }
                match u64::try_from(total - max) {
                    Ok(excess) => (Count::MAX_PILE, excess),
                    // Excess saturates at u64::MAX; the pile keeps what it cannot carry.
                    Err(_) => {
                        let kept = u64::try_from(total - u128::from(u64::MAX)).unwrap_or(u64::MAX);
                        (Count::Finite(kept), u64::MAX)
                    }
                }
            }
        }
    }

    /// Adds `amount` to the pile and returns the excess that did not fit.
    pub fn increase(&mut self, amount: impl Into<Count>) -> u64 {
        let amount = amount.into();
        let (count, excess) = self.try_adding(amount);
        if excess > 0 {
            tracing::trace!(item = %self.item, %amount, excess, "pile overflow");
        }
        self.count = count;
        excess
    }

    /// Previews `decrease` without mutating: returns `(removed, remaining)`.
    ///
    /// The remaining count clamps at zero. An infinite pile gives up whatever
    /// is asked and stays infinite.
    pub fn try_subtracting(&self, amount: impl Into<Count>) -> (Count, Count) {
        let amount = amount.into();
        match self.count {
            Count::Infinite => (amount, Count::Infinite),
            current if amount > current => (current, Count::ZERO),
            current => (amount, current.saturating_sub(amount)),
        }
    }

    /// Removes up to `amount` from the pile and returns how much was removed.
    pub fn decrease(&mut self, amount: impl Into<Count>) -> Count {
        let (removed, remaining) = self.try_subtracting(amount);
        self.count = remaining;
        removed
    }

    // ===== merge & split =====

    /// Moves as much of `other` into `self` as fits and returns the excess,
    /// which is what remains in `other`.
    ///
    /// Total quantity is conserved. No type or tag check is made here; guard
    /// with [`matches_type`](Self::matches_type) or
    /// [`can_pile_with`](Self::can_pile_with) first.
    pub fn merge_pile(&mut self, other: &mut ItemPile) -> u64 {
        let excess = self.increase(other.count);
        other.count = Count::Finite(excess);
        excess
    }

    /// Removes part of this pile and returns it as a new pile with its own
    /// copy of the tags.
    ///
    /// Returns `None` when the split is rejected (a zero amount, or more than
    /// the pile holds); `self` is then left unchanged. A `Some` pile with a
    /// zero count is a successful split of nothing.
    pub fn split_pile(&mut self, amount: impl Into<SplitAmount>) -> Option<ItemPile> {
        let amount = amount.into();
        let Some(taken) = self.split_size(amount) else {
            tracing::debug!(item = %self.item, count = %self.count, ?amount, "split rejected");
            return None;
        };

        self.count = self.count.saturating_sub(taken);
        Some(Self {
            item: self.item.clone(),
            count: taken,
            tags: tags::deep_copy(&self.tags),
        })
    }

    /// Number of items a split would move, or `None` if it is rejected.
    fn split_size(&self, amount: SplitAmount) -> Option<Count> {
        let taken = match amount {
            // Also keeps 0 * ∞ from ever being computed.
            SplitAmount::Take(n) if n.is_zero() => return None,
            SplitAmount::Take(n) => n,
            SplitAmount::AllBut(keep) => match self.count {
                Count::Infinite => Count::Infinite,
                Count::Finite(current) => Count::Finite(current.checked_sub(keep)?),
            },
            SplitAmount::Fraction(fraction) => {
                if !(fraction > 0.0 && fraction < 1.0) {
                    return None;
                }
                match self.count {
                    Count::Infinite => Count::Infinite,
                    // Rounding up leaves the smaller half of an odd pile in place.
                    Count::Finite(current) => {
                        Count::Finite(((current as f64 * fraction).ceil() as u64).min(current))
                    }
                }
            }
        };

        (taken <= self.count).then_some(taken)
    }

    // ===== comparison =====

    /// Same item identifier (exact, case-sensitive).
    pub fn matches_type(&self, other: &ItemPile) -> bool {
        self.item == other.item
    }

    pub fn matches_type_and_count(&self, other: &ItemPile) -> bool {
        self.matches_type(other) && self.count == other.count
    }

    /// Same item and structurally equal tags; counts are ignored.
    pub fn matches_type_and_tags(&self, other: &ItemPile) -> bool {
        self.matches_type(other) && tags::deep_equal(&self.tags, &other.tags)
    }

    pub fn matches_all(&self, other: &ItemPile) -> bool {
        self.matches_type_and_count(other) && tags::deep_equal(&self.tags, &other.tags)
    }

    /// Returns true if `other` may be merged into this pile.
    ///
    /// Same item is always required. Tags must match unless either pile is
    /// empty (placeholder slots) or this pile is infinite.
    pub fn can_pile_with(&self, other: &ItemPile) -> bool {
        if !self.matches_type(other) {
            return false;
        }
        if other.is_empty() || self.is_empty() || self.is_infinite() {
            return true;
        }
        tags::deep_equal(&self.tags, &other.tags)
    }
}

impl Clone for ItemPile {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            count: self.count,
            tags: tags::deep_copy(&self.tags),
        }
    }
}

impl PartialEq for ItemPile {
    fn eq(&self, other: &Self) -> bool {
        self.matches_all(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags(value: serde_json::Value) -> Tags {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test tags must be an object"),
        }
    }

    #[test]
    fn create_defaults() {
        let pile = ItemPile::single("dirt");
        assert_eq!(pile.item, "dirt");
        assert_eq!(pile.count, Count::ONE);
        assert!(pile.tags.is_empty());

        let pile = ItemPile::new("dirt", 1u64);
        assert!(!pile.has_tags());
    }

    #[test]
    fn from_parts_fills_defaults() {
        let pile = ItemPile::from_parts(None::<String>, None, None);
        assert_eq!(pile.item, "");
        assert_eq!(pile.count, Count::ONE);
        assert!(!pile.has_tags());
    }

    #[test]
    fn clone_is_independent() {
        let a = ItemPile::single("tool").with_tags(tags(json!({"damage": 0})));
        let mut b = a.clone();
        assert!(a.matches_all(&b));

        b.tags.insert("damage".into(), json!(1));
        b.decrease(1u64);

        assert_eq!(a.tags, tags(json!({"damage": 0})));
        assert_eq!(b.tags, tags(json!({"damage": 1})));
        assert_eq!(a.count, Count::ONE);
        assert_eq!(b.count, Count::ZERO);
    }

    #[test]
    fn increase_reports_excess() {
        let mut pile = ItemPile::new("dirt", 1u64);
        assert_eq!(pile.increase(10u64), 0);
        assert_eq!(pile.count, Count::Finite(11));

        assert_eq!(pile.increase(100u64), 47);
        assert_eq!(pile.count, Count::MAX_PILE);
    }

    #[test]
    fn increase_by_infinity() {
        let mut pile = ItemPile::new("money", 1u64);
        assert_eq!(pile.increase(Count::Infinite), 0);
        assert!(pile.is_infinite());
    }

    #[test]
    fn infinite_pile_ignores_arithmetic() {
        let mut pile = ItemPile::new("magic", Count::Infinite);
        pile.decrease(1u64);
        assert!(pile.is_infinite());
        pile.decrease(1_000_000u64);
        assert!(pile.is_infinite());
        assert_eq!(pile.decrease(Count::Infinite), Count::Infinite);
        assert!(pile.is_infinite());
        assert_eq!(pile.increase(1_000_000_000u64), 0);
        assert!(pile.is_infinite());
    }

    #[test]
    fn decrease_clamps_at_zero() {
        let mut pile = ItemPile::new("junk", 10u64);
        assert_eq!(pile.decrease(4u64), Count::Finite(4));
        assert_eq!(pile.count, Count::Finite(6));

        assert_eq!(pile.decrease(100u64), Count::Finite(6));
        assert_eq!(pile.count, Count::ZERO);

        let mut pile = ItemPile::new("junk", 3u64);
        assert_eq!(pile.decrease(Count::Infinite), Count::Finite(3));
        assert!(pile.is_empty());
    }

    #[test]
    fn previews_do_not_mutate() {
        let pile = ItemPile::new("dirt", 60u64);
        assert_eq!(pile.try_adding(10u64), (Count::MAX_PILE, 6));
        assert_eq!(pile.try_subtracting(70u64), (Count::Finite(60), Count::ZERO));
        assert_eq!(pile.count, Count::Finite(60));
    }

    #[test]
    fn increase_clamps_oversized_pile() {
        let mut pile = ItemPile::new("dirt", 1000u64);
        assert_eq!(pile.increase(0u64), 936);
        assert_eq!(pile.count, Count::MAX_PILE);
    }

    #[test]
    fn merge_conserves_counts_near_u64_max() {
        let mut huge = ItemPile::from_string("18446744073709551615:dirt").unwrap();
        let mut small = ItemPile::new("dirt", 10u64);

        let excess = huge.merge_pile(&mut small);
        assert_eq!(huge.count, Count::MAX_PILE);
        assert_eq!(small.count, Count::Finite(excess));
        assert_eq!(excess, u64::MAX - 54);

        let mut small = ItemPile::new("dirt", 10u64);
        let mut huge = ItemPile::new("dirt", u64::MAX);
        let excess = small.merge_pile(&mut huge);
        assert_eq!(small.count, Count::MAX_PILE);
        assert_eq!(excess, u64::MAX - 54);
    }

    #[test]
    fn increase_keeps_unrepresentable_excess_in_pile() {
        let mut a = ItemPile::new("dirt", u64::MAX);
        let mut b = ItemPile::new("dirt", u64::MAX);

        let excess = a.merge_pile(&mut b);

        assert_eq!(excess, u64::MAX);
        assert_eq!(b.count, Count::Finite(u64::MAX));
        assert_eq!(a.count, Count::Finite(u64::MAX));
        let total = u128::from(a.count.finite().unwrap()) + u128::from(excess);
        assert_eq!(total, 2 * u128::from(u64::MAX));
    }

    #[test]
    fn merge_simple() {
        let mut a = ItemPile::new("dirt", 10u64);
        let mut b = ItemPile::new("dirt", 20u64);

        assert_eq!(a.merge_pile(&mut b), 0);
        assert_eq!(a.count, Count::Finite(30));
        assert_eq!(b.count, Count::ZERO);
    }

    #[test]
    fn merge_big() {
        let mut a = ItemPile::new("dirt", 1u64);
        let mut b = ItemPile::new("dirt", 80u64);

        let excess = a.merge_pile(&mut b);
        assert_eq!(a.count, Count::MAX_PILE);
        assert_eq!(b.count, Count::Finite(17));
        assert_eq!(excess, 17);
    }

    #[test]
    fn merge_conserves_when_receiver_starts_at_ten() {
        let mut a = ItemPile::new("dirt", 10u64);
        let mut b = ItemPile::new("dirt", 80u64);

        let excess = a.merge_pile(&mut b);
        assert_eq!(a.count, Count::MAX_PILE);
        assert_eq!(b.count, Count::Finite(excess));
        assert_eq!(excess, 26);
    }

    #[test]
    fn merge_into_empty_pile() {
        let mut a = ItemPile::new("pick", 0u64);
        let mut b = ItemPile::single("pick").with_tags(tags(json!({"damage": 0})));

        assert_eq!(a.merge_pile(&mut b), 0);
        assert_eq!(a.count, Count::ONE);
        assert!(b.is_empty());
    }

    #[test]
    fn merge_infinite_source_drains_it() {
        let mut a = ItemPile::new("gold", 5u64);
        let mut b = ItemPile::new("gold", Count::Infinite);

        assert_eq!(a.merge_pile(&mut b), 0);
        assert!(a.is_infinite());
        assert!(b.is_empty());
    }

    #[test]
    fn split_exact() {
        let mut a = ItemPile::new("dirt", 64u64);
        let b = a.split_pile(16u64).unwrap();

        assert_eq!(a.count, Count::Finite(48));
        assert_eq!(b.count, Count::Finite(16));
        assert!(a.matches_type_and_tags(&b));
    }

    #[test]
    fn split_whole_pile_leaves_empty_source() {
        let mut a = ItemPile::new("dirt", 5u64);
        let b = a.split_pile(5u64).unwrap();
        assert!(a.is_empty());
        assert_eq!(b.count, Count::Finite(5));
    }

    #[test]
    fn split_deep_copies_tags() {
        let mut a = ItemPile::new("tool", 3u64).with_tags(tags(json!({"damage": 0})));
        let mut b = a.split_pile(1u64).unwrap();
        assert_eq!(b.item, "tool");
        assert_eq!(b.count, Count::ONE);
        assert_eq!(a.count, Count::Finite(2));

        b.tags.insert("damage".into(), json!(1));
        assert_eq!(a.tags, tags(json!({"damage": 0})));
        assert_eq!(b.tags, tags(json!({"damage": 1})));
    }

    #[test]
    fn split_too_large_is_rejected() {
        let mut a = ItemPile::new("dirt", 10u64);
        assert!(a.split_pile(1000u64).is_none());
        assert_eq!(a.count, Count::Finite(10));
    }

    #[test]
    fn split_negative_keeps_remainder() {
        let mut a = ItemPile::new("dirt", 10u64);
        let b = a.split_pile(-1i64).unwrap();
        assert_eq!(a.count, Count::ONE);
        assert_eq!(b.count, Count::Finite(9));

        let mut a = ItemPile::new("dirt", 10u64);
        assert!(a.split_pile(-11i64).is_none());
        assert_eq!(a.count, Count::Finite(10));
    }

    #[test]
    fn split_fraction_rounds_towards_new_pile() {
        let mut a = ItemPile::new("gold", 10u64);
        let b = a.split_pile(SplitAmount::Fraction(0.5)).unwrap();
        assert_eq!(a.count, Count::Finite(5));
        assert_eq!(b.count, Count::Finite(5));

        let mut a = ItemPile::new("gold", 11u64);
        let b = a.split_pile(SplitAmount::Fraction(0.5)).unwrap();
        assert_eq!(a.count, Count::Finite(5));
        assert_eq!(b.count, Count::Finite(6));
    }

    #[test]
    fn split_fraction_of_empty_pile_is_empty_not_rejected() {
        let mut a = ItemPile::new("gold", 0u64);
        let b = a.split_pile(SplitAmount::Fraction(0.5)).unwrap();
        assert!(b.is_empty());
        assert!(a.is_empty());
    }

    #[test]
    fn split_fraction_out_of_range_is_rejected() {
        let mut a = ItemPile::new("gold", 10u64);
        assert!(a.split_pile(SplitAmount::Fraction(1.5)).is_none());
        assert!(a.split_pile(SplitAmount::Fraction(f64::NAN)).is_none());
        assert_eq!(a.count, Count::Finite(10));
    }

    #[test]
    fn split_zero_is_rejected() {
        let mut a = ItemPile::new("diamond", 20u64);
        assert!(a.split_pile(0u64).is_none());
        assert_eq!(a.count, Count::Finite(20));
    }

    #[test]
    fn split_infinite_pile() {
        let mut a = ItemPile::new("diamond", Count::Infinite);

        assert_eq!(a.split_pile(1u64).unwrap().count, Count::ONE);
        assert!(a.is_infinite());

        assert_eq!(a.split_pile(10u64).unwrap().count, Count::Finite(10));
        assert!(a.is_infinite());

        assert!(a.split_pile(-7i64).unwrap().is_infinite());
        assert!(a.is_infinite());

        assert!(a.split_pile(SplitAmount::Fraction(0.5)).unwrap().is_infinite());
        assert!(a.is_infinite());

        assert!(a.split_pile(Count::Infinite).unwrap().is_infinite());
        assert!(a.is_infinite());

        assert!(a.split_pile(0u64).is_none());
        assert!(a.is_infinite());
    }

    #[test]
    fn split_infinity_from_finite_pile_is_rejected() {
        let mut a = ItemPile::new("diamond", 20u64);
        assert!(a.split_pile(Count::Infinite).is_none());
        assert_eq!(a.count, Count::Finite(20));
    }

    #[test]
    fn matches() {
        let a = ItemPile::new("dirt", 3u64);
        let b = ItemPile::new("dirt", 4u64);
        assert!(a.matches_type(&b));
        assert!(!a.matches_type_and_count(&b));
        assert!(!a.matches_all(&b));

        let c = ItemPile::new("dirt", 4u64);
        assert!(b.matches_type(&c) && c.matches_type(&b));
        assert!(b.matches_type_and_count(&c) && c.matches_type_and_count(&b));
        assert!(b.matches_all(&c) && c.matches_all(&b));

        let d = ItemPile::single("magic").with_tags(tags(json!({"foo": -7})));
        let e = ItemPile::single("magic").with_tags(tags(json!({"foo": 54})));
        let f = ItemPile::single("magic").with_tags(tags(json!({"foo": -7})));
        let g = ItemPile::new("magic", 2u64).with_tags(tags(json!({"foo": -7})));
        assert!(d.matches_type(&d));
        assert!(d.matches_type_and_count(&e));
        assert!(!d.matches_all(&e));
        assert!(d.matches_all(&f));
        assert!(g.matches_type_and_tags(&d));
        assert!(!g.matches_all(&d));
    }

    #[test]
    fn item_comparison_is_case_sensitive() {
        assert!(!ItemPile::single("Dirt").matches_type(&ItemPile::single("dirt")));
    }

    #[test]
    fn empty_tags_only_equal_empty_tags() {
        let plain = ItemPile::single("magic");
        let tagged = ItemPile::single("magic").with_tags(tags(json!({"foo": null})));
        assert!(!plain.matches_type_and_tags(&tagged));
        assert!(!tagged.matches_type_and_tags(&plain));
    }

    #[test]
    fn can_pile_with_relaxes_tags_for_empty_and_infinite() {
        let sword = ItemPile::single("sword").with_tags(tags(json!({"damage": 3})));
        let fresh = ItemPile::single("sword").with_tags(tags(json!({"damage": 0})));
        assert!(!sword.can_pile_with(&fresh));
        assert!(sword.can_pile_with(&sword.clone()));

        let placeholder = ItemPile::new("sword", 0u64);
        assert!(placeholder.can_pile_with(&sword));
        assert!(sword.can_pile_with(&placeholder));

        let infinite = ItemPile::new("sword", Count::Infinite);
        assert!(infinite.can_pile_with(&sword));

        assert!(!sword.can_pile_with(&ItemPile::new("shield", 0u64)));
    }

    #[test]
    fn item_normalisation() {
        assert_eq!(ItemPile::item_from_string(Some("foo")), "foo");
        assert_eq!(ItemPile::item_from_string(None::<&str>), "");
        assert_eq!(ItemPile::item_to_string(Some("bar")), "bar");
        let normalised = ItemPile::item_from_string(None::<String>);
        assert_eq!(ItemPile::item_to_string(Some(&normalised)), "");
        assert_eq!(ItemPile::item_to_string(None), "");
    }
}
