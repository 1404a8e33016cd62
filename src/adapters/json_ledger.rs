//! JSON file implementation of the points ledger.
//!
//! The whole ledger is one JSON object mapping user ids to balances. Each credit
//! reads the file, updates one entry and rewrites it; the last writer wins.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Result, error::Error, ports::PointsLedger, types::UserId};

/// File-backed ledger.
///
/// # Examples
///
/// ```no_run
/// use xo_break::adapters::JsonFileLedger;
/// use xo_break::ports::PointsLedger;
/// use xo_break::types::UserId;
///
/// let ledger = JsonFileLedger::new("points.json");
/// ledger.credit(&UserId::new("ada"), 10)?;
/// # Ok::<(), xo_break::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    /// Create a ledger stored at `path`. The file is created on first credit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored balance, ordered by user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn balances(&self) -> Result<BTreeMap<String, u64>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open ledger {:?}", self.path),
                    source,
                });
            }
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::SerializationContext {
            operation: format!("parse ledger {:?}", self.path),
            message: e.to_string(),
        })
    }

    fn store(&self, balances: &BTreeMap<String, u64>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {parent:?}"),
                source,
            })?;
        }

        let file = File::create(&self.path).map_err(|source| Error::Io {
            operation: format!("create ledger {:?}", self.path),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, balances).map_err(|e| {
            Error::SerializationContext {
                operation: format!("write ledger {:?}", self.path),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush ledger {:?}", self.path),
            source,
        })
    }
}

impl PointsLedger for JsonFileLedger {
    fn credit(&self, user: &UserId, points: u32) -> Result<u64> {
        let mut balances = self.balances()?;
        let balance = balances.entry(user.as_str().to_string()).or_insert(0);
        *balance = balance.saturating_add(u64::from(points));
        let updated = *balance;

        self.store(&balances)?;
        debug!(%user, points, balance = updated, "points credited");
        Ok(updated)
    }

    fn balance(&self, user: &UserId) -> Result<u64> {
        Ok(self.balances()?.get(user.as_str()).copied().unwrap_or(0))
    }
}
