//! Save/load vertical databases, rule files and run manifests.
//!
//! Building a vertical database from raw transactions is the expensive part
//! of a mining pipeline, so the built tables can be snapshotted and loaded
//! back without rescanning the source data.
//!
//! # File Format
//!
//! The database snapshot format (`.arvd`) is a binary format:
//!
//! ```text
//! [4 bytes]  Magic: "ARVD"
//! [4 bytes]  Version (u32 LE)
//! [32 bytes] SHA-256 hash of the payload
//! [8 bytes]  Payload length (u64 LE)
//! [var]      Payload: bincode-encoded snapshot, tid sets in roaring format
//! ```
//!
//! # Example
//!
//! ```ignore
//! use arules_service::persistence::{load_database, save_database};
//!
//! save_database(&db, "retail.arvd")?;
//! let mut db = load_database("retail.arvd")?;
//! ```

mod manifest;
mod rules;

pub use manifest::{RunEntry, RunManifest};
pub use rules::RuleFile;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use arules::Item;
use arules_miner::{TidSet, Transaction, VerticalDatabase};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Magic bytes for database snapshot files.
const DATABASE_MAGIC: &[u8; 4] = b"ARVD";

/// Current snapshot format version.
const DATABASE_VERSION: u32 = 1;

/// Serialized form of a vertical database.
#[derive(Debug, Serialize, Deserialize)]
struct DatabaseSnapshot {
    max_item: Item,
    support: Vec<u32>,
    /// Roaring-serialized tid set per item.
    tids: Vec<Vec<u8>>,
    transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransactionRecord {
    label: String,
    items: Vec<Item>,
}

/// An encoded database snapshot with its checksum.
#[derive(Debug, Clone)]
pub struct DatabaseFile {
    /// SHA-256 hash of the payload.
    pub checksum: [u8; 32],
    payload: Vec<u8>,
}

impl DatabaseFile {
    /// Encodes a database.
    ///
    /// Transactions are stored with their current live items, so a
    /// database snapshotted after a run keeps its pruning.
    pub fn from_database(db: &VerticalDatabase) -> ServiceResult<Self> {
        let tids = db
            .tid_table()
            .iter()
            .map(TidSet::to_bytes)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        let snapshot = DatabaseSnapshot {
            max_item: db.max_item(),
            support: db.support_table().to_vec(),
            tids,
            transactions: db
                .transactions()
                .iter()
                .map(|t| TransactionRecord {
                    label: t.label().to_string(),
                    items: t.items().to_vec(),
                })
                .collect(),
        };

        let payload = bincode::serde::encode_to_vec(&snapshot, bincode::config::standard())
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        Ok(Self {
            checksum: Self::hash_payload(&payload),
            payload,
        })
    }

    /// Computes SHA-256 hash of a payload.
    fn hash_payload(payload: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        hasher.finalize().into()
    }

    /// Size of the encoded payload in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Returns the checksum as a hex string.
    pub fn checksum_hex(&self) -> String {
        hex::encode(&self.checksum)
    }

    /// Saves the snapshot to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ServiceResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ServiceError::io_error(path, e))?;
        let mut writer = BufWriter::new(file);

        let mut write = |bytes: &[u8]| {
            writer
                .write_all(bytes)
                .map_err(|e| ServiceError::io_error(path, e))
        };
        write(DATABASE_MAGIC)?;
        write(&DATABASE_VERSION.to_le_bytes())?;
        write(&self.checksum)?;
        write(&(self.payload.len() as u64).to_le_bytes())?;
        write(&self.payload)?;

        writer.flush().map_err(|e| ServiceError::io_error(path, e))?;
        debug!(path = %path.display(), bytes = self.payload.len(), "database snapshot saved");
        Ok(())
    }

    /// Loads a snapshot file, verifying magic, version and checksum.
    pub fn load<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ServiceError::io_error(path, e))?;
        let mut reader = BufReader::new(file);

        // Read and verify magic bytes
        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| ServiceError::io_error(path, e))?;
        if &magic != DATABASE_MAGIC {
            return Err(ServiceError::invalid_format("invalid magic bytes"));
        }

        // Read and verify version
        let mut version_bytes = [0u8; 4];
        reader
            .read_exact(&mut version_bytes)
            .map_err(|e| ServiceError::io_error(path, e))?;
        let version = u32::from_le_bytes(version_bytes);
        if version != DATABASE_VERSION {
            return Err(ServiceError::invalid_format(format!(
                "unsupported version: {} (expected {})",
                version, DATABASE_VERSION
            )));
        }

        let mut checksum = [0u8; 32];
        reader
            .read_exact(&mut checksum)
            .map_err(|e| ServiceError::io_error(path, e))?;

        let mut len_bytes = [0u8; 8];
        reader
            .read_exact(&mut len_bytes)
            .map_err(|e| ServiceError::io_error(path, e))?;
        let payload_len = u64::from_le_bytes(len_bytes);

        let mut payload = Vec::new();
        reader
            .take(payload_len)
            .read_to_end(&mut payload)
            .map_err(|e| ServiceError::io_error(path, e))?;
        if payload.len() as u64 != payload_len {
            return Err(ServiceError::invalid_format(format!(
                "truncated payload: {} of {} bytes",
                payload.len(),
                payload_len
            )));
        }

        let actual = Self::hash_payload(&payload);
        if actual != checksum {
            return Err(ServiceError::ChecksumMismatch {
                expected: hex::encode(&checksum),
                actual: hex::encode(&actual),
            });
        }

        Ok(Self { checksum, payload })
    }

    /// Decodes the snapshot and re-validates it as a vertical database.
    pub fn to_database(&self) -> ServiceResult<VerticalDatabase> {
        let (snapshot, _): (DatabaseSnapshot, usize) =
            bincode::serde::decode_from_slice(&self.payload, bincode::config::standard())
                .map_err(|e| ServiceError::DeserializationError(e.to_string()))?;

        let tids = snapshot
            .tids
            .iter()
            .map(|bytes| TidSet::from_bytes(bytes))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServiceError::DeserializationError(e.to_string()))?;
        let transactions = snapshot
            .transactions
            .into_iter()
            .map(|record| Transaction::new(record.label, record.items))
            .collect();

        Ok(VerticalDatabase::from_parts(
            tids,
            snapshot.support,
            transactions,
            snapshot.max_item,
        )?)
    }
}

/// Writes `db` to `path` as a snapshot file.
pub fn save_database<P: AsRef<Path>>(db: &VerticalDatabase, path: P) -> ServiceResult<()> {
    DatabaseFile::from_database(db)?.save(path)
}

/// Reads a snapshot file written by [`save_database`].
pub fn load_database<P: AsRef<Path>>(path: P) -> ServiceResult<VerticalDatabase> {
    DatabaseFile::load(path)?.to_database()
}

/// Helper module for hex encoding (minimal implementation).
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_database() -> VerticalDatabase {
        let mut builder = VerticalDatabase::builder();
        builder.add_labeled_transaction("t-1", [1, 2, 3]).unwrap();
        builder.add_labeled_transaction("t-2", [1, 2]).unwrap();
        builder.add_labeled_transaction("t-3", [1, 3]).unwrap();
        builder.add_labeled_transaction("t-4", [2, 3]).unwrap();
        builder.with_max_item(5).build()
    }

    #[test]
    fn test_save_and_load() {
        let db = create_test_database();
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.arvd");

        save_database(&db, &path).unwrap();
        let loaded = load_database(&path).unwrap();

        assert_eq!(loaded.max_item(), 5);
        assert_eq!(loaded.transaction_count(), 4);
        assert_eq!(loaded.support_table(), db.support_table());
        assert_eq!(loaded.tid_table(), db.tid_table());
        assert_eq!(loaded.transactions(), db.transactions());
        assert_eq!(loaded.registry().get_tid("t-3"), Some(2));
    }

    #[test]
    fn test_checksum_is_stable() {
        let db = create_test_database();
        let first = DatabaseFile::from_database(&db).unwrap();
        let second = DatabaseFile::from_database(&db).unwrap();

        assert_eq!(first.checksum, second.checksum);
        assert_eq!(first.checksum_hex().len(), 64);
        assert!(first.payload_len() > 0);
    }

    #[test]
    fn test_invalid_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.arvd");
        std::fs::write(&path, b"BAAD\x01\x00\x00\x00").unwrap();

        let result = DatabaseFile::load(&path);
        assert!(matches!(result, Err(ServiceError::InvalidFormat { .. })));
    }

    #[test]
    fn test_unsupported_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.arvd");
        let mut bytes = DATABASE_MAGIC.to_vec();
        bytes.extend_from_slice(&99u32.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let result = DatabaseFile::load(&path);
        assert!(matches!(result, Err(ServiceError::InvalidFormat { .. })));
    }

    #[test]
    fn test_corrupted_payload() {
        let db = create_test_database();
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.arvd");
        save_database(&db, &path).unwrap();

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, bytes).unwrap();

        let result = DatabaseFile::load(&path);
        assert!(matches!(result, Err(ServiceError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_truncated_payload() {
        let db = create_test_database();
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.arvd");
        save_database(&db, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        let result = DatabaseFile::load(&path);
        assert!(matches!(result, Err(ServiceError::InvalidFormat { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_database(dir.path().join("absent.arvd"));
        assert!(matches!(result, Err(ServiceError::IoError { .. })));
    }
}
