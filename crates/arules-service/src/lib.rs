//! # arules-service
//!
//! Storage and serving layers around the `arules-miner` crate.
//!
//! ## Features
//!
//! Each layer is independently feature-gated:
//!
//! - **`persistence`**: Save/load vertical database snapshots, rule files
//!   and JSON run manifests
//! - **`mining-service`**: Cached mining over a pristine database
//! - **`parallel`**: Batch requests run on the rayon pool
//! - **`full`**: Enable everything
//!
//! ## Quick Start
//!
//! ### Snapshots and rule files (feature: `persistence`)
//!
//! ```ignore
//! use arules_service::persistence::{load_database, save_database, RuleFile};
//!
//! let db = VerticalDatabase::parse(&std::fs::read_to_string("retail.txt")?)?;
//! save_database(&db, "retail.arvd")?;
//!
//! let mut db = load_database("retail.arvd")?;
//! let result = RuleMiner::new().run(100, 0.6, &mut db, 2)?;
//! RuleFile::from_result(&result).save("retail-rules.txt")?;
//! ```
//!
//! ### Cached mining (feature: `mining-service`)
//!
//! ```ignore
//! use arules_service::service::{MiningParams, RuleMiningService};
//!
//! let service = RuleMiningService::new(load_database("retail.arvd")?);
//! let result = service.mine(&MiningParams::new(100, 0.6, 2))?;
//! ```

#![warn(missing_docs)]

pub mod error;

#[cfg(feature = "persistence")]
pub mod persistence;

#[cfg(feature = "mining-service")]
pub mod service;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};

#[cfg(feature = "persistence")]
pub use persistence::{load_database, save_database, DatabaseFile, RuleFile, RunManifest};

#[cfg(feature = "mining-service")]
pub use service::{MiningParams, RuleMiningService};
