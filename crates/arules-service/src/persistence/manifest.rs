//! Manifest recording the mining runs made over one database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use arules::Item;
use arules_miner::{MinerConfig, MiningResult, VerticalDatabase};

use crate::error::{ServiceError, ServiceResult};

/// JSON manifest for the rule files mined from one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Name of the mined database (e.g. its snapshot filename).
    pub database: String,
    /// Number of transactions in the database.
    pub transaction_count: usize,
    /// Largest item identifier in the database.
    pub max_item: Item,
    /// Timestamp when the manifest was created.
    pub created_at: DateTime<Utc>,
    /// Version of the mining tooling.
    pub miner_version: String,
    /// One entry per run.
    pub runs: Vec<RunEntry>,
}

/// Parameters and outcome of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    /// Requested rule count.
    pub k: usize,
    /// Confidence threshold.
    pub min_confidence: f64,
    /// Search slack.
    pub delta: usize,
    /// Whether level-1 rules were grown.
    pub seed_frontier_with_pairs: bool,
    /// Number of rules written.
    pub rule_count: usize,
    /// Minimum support of the written rules.
    pub final_min_support: u32,
    /// Wall-clock mining time in milliseconds.
    pub duration_ms: u64,
    /// When the run finished.
    pub mined_at: DateTime<Utc>,
    /// Rule filename (relative to manifest).
    pub filename: String,
}

impl RunEntry {
    /// Describes a finished run written to `filename`.
    pub fn new(config: &MinerConfig, result: &MiningResult, filename: &str) -> Self {
        Self {
            k: config.k,
            min_confidence: config.min_confidence,
            delta: config.delta,
            seed_frontier_with_pairs: config.seed_frontier_with_pairs,
            rule_count: result.len(),
            final_min_support: result.stats.final_min_support,
            duration_ms: result.stats.duration.as_millis() as u64,
            mined_at: Utc::now(),
            filename: filename.to_string(),
        }
    }
}

impl RunManifest {
    /// Creates an empty manifest for `db`.
    pub fn new(database: &str, db: &VerticalDatabase) -> Self {
        Self {
            database: database.to_string(),
            transaction_count: db.transaction_count(),
            max_item: db.max_item(),
            created_at: Utc::now(),
            miner_version: env!("CARGO_PKG_VERSION").to_string(),
            runs: Vec::new(),
        }
    }

    /// Adds a run entry.
    pub fn add_entry(&mut self, entry: RunEntry) {
        self.runs.push(entry);
    }

    /// Returns the number of recorded runs.
    pub fn count(&self) -> usize {
        self.runs.len()
    }

    /// Returns the total number of rules across all runs.
    pub fn total_rules(&self) -> usize {
        self.runs.iter().map(|r| r.rule_count).sum()
    }

    /// Finds a run by rule filename.
    pub fn get_entry(&self, filename: &str) -> Option<&RunEntry> {
        self.runs.iter().find(|r| r.filename == filename)
    }

    /// Saves the manifest to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ServiceResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ServiceError::io_error(path, e))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Loads a manifest from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ServiceError::io_error(path, e))?;
        let reader = BufReader::new(file);
        let manifest: Self = serde_json::from_reader(reader)
            .map_err(|e| ServiceError::DeserializationError(e.to_string()))?;
        Ok(manifest)
    }
}

impl std::fmt::Display for RunManifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Run Manifest")?;
        writeln!(f, "  Database:        {}", self.database)?;
        writeln!(f, "  Transactions:    {}", self.transaction_count)?;
        writeln!(f, "  Max item:        {}", self.max_item)?;
        writeln!(f, "  Created:         {}", self.created_at)?;
        writeln!(f, "  Miner:           {}", self.miner_version)?;
        writeln!(f, "  Runs:            {}", self.count())?;
        writeln!(f, "  Total rules:     {}", self.total_rules())?;
        Ok(())
    }
}
