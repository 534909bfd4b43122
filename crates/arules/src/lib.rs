//! # arules
//!
//! Shared vocabulary for association rule mining.
//!
//! This crate provides:
//! - **Items and itemsets**: integer item identifiers and helpers for
//!   sorted, duplicate-free itemsets
//! - **Association rules**: the rendered rule value returned by miners
//! - **Text formats**: parsers for transaction lines and rendered rule lines
//!
//! ## Text Formats
//!
//! | Format | Example |
//! |--------|---------|
//! | Transaction line | `1 2 3` |
//! | Rule line | `1 2 ==> 3 #SUP: 2 #CONF: 0.6666666666666666` |
//!
//! Blank lines and lines starting with `#`, `%` or `@` are ignored in
//! transaction input.
//!
//! ## Usage
//!
//! ```rust
//! use arules::{parse_rule, parse_transactions};
//!
//! let transactions = parse_transactions("1 2 3\n1 2\n# comment\n2 3").unwrap();
//! assert_eq!(transactions.len(), 3);
//!
//! let rule = parse_rule("1 ==> 2 #SUP: 2 #CONF: 0.5").unwrap();
//! assert_eq!(rule.antecedent, vec![1]);
//! assert_eq!(rule.support, 2);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod itemset;
mod parser;
mod rule;

pub use error::{FormatError, FormatResult};
pub use parser::{parse_rule, parse_rules, parse_transaction_line, parse_transactions};
pub use rule::AssociationRule;

/// Item identifier. Item `0` is reserved and never appears in an itemset.
pub type Item = u32;

/// Largest accepted item identifier.
///
/// Vertical databases index their tables densely by item, so the cap bounds
/// the table size any single input line can demand.
pub const MAX_ITEM: Item = (1 << 23) - 1;

/// Dense transaction identifier, the bit index used by transaction-id sets.
pub type Tid = u32;
