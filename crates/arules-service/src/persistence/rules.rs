//! Plain-text rule files, one rendered rule per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arules::AssociationRule;
use arules_miner::MiningResult;

use crate::error::{ServiceError, ServiceResult};

/// A list of rules in the `A ==> C #SUP: s #CONF: c` line format.
///
/// # Example
///
/// ```ignore
/// use arules_service::persistence::RuleFile;
///
/// RuleFile::from_result(&result).save("rules.txt")?;
/// let rules = RuleFile::load("rules.txt")?.rules;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFile {
    /// Rules in file order.
    pub rules: Vec<AssociationRule>,
}

impl RuleFile {
    /// Wraps rules in the order given.
    pub fn new(rules: Vec<AssociationRule>) -> Self {
        Self { rules }
    }

    /// Takes a result's rules in output order (support, then confidence,
    /// descending).
    pub fn from_result(result: &MiningResult) -> Self {
        Self {
            rules: result.sorted_rules(),
        }
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Writes one line per rule.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ServiceResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| ServiceError::io_error(path, e))?;
        let mut writer = BufWriter::new(file);
        for rule in &self.rules {
            writeln!(writer, "{rule}").map_err(|e| ServiceError::io_error(path, e))?;
        }
        writer.flush().map_err(|e| ServiceError::io_error(path, e))?;
        Ok(())
    }

    /// Reads a rule file. Blank lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ServiceError::io_error(path, e))?;
        Ok(Self {
            rules: arules::parse_rules(&text)?,
        })
    }
}
