//! # arules-miner
//!
//! Top-k non-redundant association rule mining over a vertical database.
//!
//! Instead of a minimum support, the caller asks for the `k` rules with the
//! highest support whose confidence reaches a threshold. The miner raises
//! its support threshold as the result fills up, and drops rules made
//! redundant by an equally supported, equally confident, more general rule.
//!
//! ## Components
//!
//! - **[`VerticalDatabase`]**: per-item transaction-id sets ([`TidSet`], a
//!   roaring bitmap) plus the per-transaction live item lists
//! - **[`RuleCandidate`]**: one directional rule with the tid sets it was
//!   derived from
//! - **[`OrderedRuleMultiset`]**: support-ordered multiset used for both the
//!   retained rules and the expansion frontier
//! - **[`RuleMiner`]**: the search itself
//!
//! ## Quick Start
//!
//! ```rust
//! use arules_miner::{RuleMiner, VerticalDatabase};
//!
//! let mut db = VerticalDatabase::parse("1 2 3\n1 2\n1 3\n2 3\n").unwrap();
//! let result = RuleMiner::new().run(2, 0.5, &mut db, 0).unwrap();
//!
//! for rule in result.sorted_rules() {
//!     println!("{rule}");
//! }
//! println!("{}", result.stats);
//! ```
//!
//! A run prunes the database's transaction lists in place. Clone the
//! database beforehand to mine it again with other parameters.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod candidate;
mod config;
mod database;
mod engine;
mod error;
mod multiset;
mod observer;
mod registry;
mod result;
mod statistics;
mod tidset;

pub use candidate::RuleCandidate;
pub use config::{MinerConfig, MinerConfigBuilder};
pub use database::{Transaction, VerticalDatabase, VerticalDatabaseBuilder};
pub use engine::RuleMiner;
pub use error::{MinerError, MinerResult};
pub use multiset::OrderedRuleMultiset;
pub use observer::{MiningObserver, NoopObserver, PeakUsage};
pub use registry::TransactionRegistry;
pub use result::MiningResult;
pub use statistics::MiningStats;
pub use tidset::TidSet;

pub use arules::{AssociationRule, Item, Tid, MAX_ITEM};
