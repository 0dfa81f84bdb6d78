/// Class-wide pile constants.
///
/// These values are shared by every [`ItemPile`](crate::ItemPile); there is no
/// per-instance override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PileConfig;

impl PileConfig {
    // ===== stacking =====
    /// Largest finite count a pile holds after `increase`/`merge_pile`.
    pub const MAX_PILE_SIZE: u64 = 64;
    /// Count used when a constructor or array form omits it.
    pub const DEFAULT_COUNT: u64 = 1;

    // ===== textual form =====
    /// Separates `<count>` from `<item>`.
    pub const COUNT_SEPARATOR: char = ':';
    /// Separates `<item>` from the JSON-encoded tags.
    pub const TAGS_SEPARATOR: char = ' ';
    /// Token written for an infinite count.
    pub const INFINITY_TOKEN: &'static str = "Infinity";
}
