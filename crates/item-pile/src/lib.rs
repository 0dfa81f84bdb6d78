//! Stacks of game items: a quantity of one item type, optional tags, and a
//! class-wide maximum pile size.
//!
//! `item-pile` provides the arithmetic inventories are built on (increase and
//! decrease with overflow, merge, split) together with comparison predicates
//! and the compact textual and array forms used at save/load and network
//! boundaries. Inventory containers and persistence live with the callers.
//!
//! ```
//! use item_pile::{Count, ItemPile};
//!
//! let mut pile = ItemPile::new("dirt", 1u64);
//! assert_eq!(pile.increase(100u64), 47);
//! assert_eq!(pile.count, Count::Finite(64));
//!
//! let half = pile.split_pile(-32i64).unwrap();
//! assert_eq!(half.to_string(), "32:dirt");
//! ```
pub mod codec;
pub mod config;
pub mod count;
pub mod error;
pub mod pile;
pub mod split;
pub mod tags;

pub use codec::PileInput;
pub use config::PileConfig;
pub use count::Count;
pub use error::PileError;
pub use pile::ItemPile;
pub use split::SplitAmount;
pub use tags::Tags;
