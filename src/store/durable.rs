//! Crash-resistant write and validated read over a primary/backup slot pair
//!
//! A write is staged entirely in the backup slot and only then promoted to
//! the primary slot by rename, so an interrupted write never damages the
//! previously committed record:
//!
//! ```text
//! create(backup) -> header -> payload -> close -> remove(primary) -> rename(backup, primary)
//! ```
//!
//! A read validates the primary slot and falls back to the backup slot on
//! any failure. If both fail the primary's error is returned.

use crate::fs::{Filesystem, StdFilesystem};
use crate::model::Digest;
use crate::store::record::Record;
use crate::{Error, Result, StoreConfig};
use serde::Serialize;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

/// The two locations one blob is persisted to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotPair {
    primary: PathBuf,
    backup: PathBuf,
}

impl SlotPair {
    pub fn new(primary: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        SlotPair {
            primary: primary.into(),
            backup: backup.into(),
        }
    }

    /// Derive the backup path by appending `config.backup_suffix` to the primary
    pub fn with_default_backup(primary: impl Into<PathBuf>, config: &StoreConfig) -> Self {
        let primary = primary.into();
        let mut backup: OsString = primary.clone().into_os_string();
        backup.push(&config.backup_suffix);
        SlotPair {
            primary,
            backup: PathBuf::from(backup),
        }
    }

    /// The canonical, expected-good slot
    pub fn primary(&self) -> &Path {
        &self.primary
    }

    /// The staging slot
    pub fn backup(&self) -> &Path {
        &self.backup
    }
}

/// Which slot of a pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    Primary,
    Backup,
}

/// What a validated read found in one slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotState {
    Missing,
    Valid { payload_len: usize, checksum: String },
    Corrupt { reason: String },
    Unreadable { reason: String },
}

impl SlotState {
    fn from_result(result: &Result<Record>) -> Self {
        match result {
            Ok(record) => SlotState::Valid {
                payload_len: record.payload().len(),
                checksum: record.checksum().to_hex(),
            },
            Err(e) if e.is_not_found() => SlotState::Missing,
            Err(e) if e.is_corrupt_record() => SlotState::Corrupt {
                reason: e.to_string(),
            },
            Err(e) => SlotState::Unreadable {
                reason: e.to_string(),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SlotState::Valid { .. })
    }
}

/// State of one slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub state: SlotState,
}

/// State of both slots, checked independently
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotPairReport {
    pub primary: SlotReport,
    pub backup: SlotReport,
}

impl SlotPairReport {
    /// The slot a read would currently return data from
    pub fn served_from(&self) -> Option<SlotRole> {
        if self.primary.state.is_valid() {
            Some(SlotRole::Primary)
        } else if self.backup.state.is_valid() {
            Some(SlotRole::Backup)
        } else {
            None
        }
    }
}

/// Stateless durable blob store
///
/// Holds no data between calls; every operation opens and releases its own
/// file handles. Callers must serialize operations on the same [`SlotPair`].
#[derive(Clone, Debug, Default)]
pub struct DurableStore<F: Filesystem = StdFilesystem> {
    fs: F,
    config: StoreConfig,
}

impl DurableStore<StdFilesystem> {
    /// Store on the real filesystem with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Store on the real filesystem
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_filesystem(StdFilesystem, config)
    }
}

impl<F: Filesystem> DurableStore<F> {
    pub fn with_filesystem(fs: F, config: StoreConfig) -> Self {
        DurableStore { fs, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Slot pair for `primary` with the configured backup suffix
    pub fn slots(&self, primary: impl Into<PathBuf>) -> SlotPair {
        SlotPair::with_default_backup(primary, &self.config)
    }

    /// Persist `data` to the primary slot, staging it in the backup slot
    ///
    /// Any failure before the rename leaves the primary slot untouched. An
    /// error from removing the old primary is ignored and the rename is
    /// attempted regardless.
    #[instrument(skip_all, fields(size = data.len(), primary = %slots.primary.display()))]
    pub fn write(&self, data: &[u8], slots: &SlotPair) -> Result<()> {
        let primary = slots.primary();
        let backup = slots.backup();

        {
            let mut file = self.fs.create(backup).map_err(Error::io(backup))?;

            let header = Record::encode_header(&Digest::compute(data));
            file.write_all(header.as_bytes())
                .map_err(Error::io(backup))?;
            file.write_all(data).map_err(Error::io(backup))?;
            file.flush().map_err(Error::io(backup))?;
            trace!(header_len = header.len(), "Staged record in backup slot");

            if self.config.sync_writes {
                self.fs.sync_file(&mut file).map_err(Error::io(backup))?;
            }
        }

        if let Err(e) = self.fs.remove(primary) {
            debug!(error = %e, "Ignoring failure to remove old primary");
        }
        self.fs
            .rename(backup, primary)
            .map_err(Error::io(primary))?;

        if self.config.sync_writes {
            if let Err(e) = self.fs.sync_parent(primary) {
                debug!(error = %e, "Directory sync failed after promotion");
            }
        }

        debug!("Committed record");
        Ok(())
    }

    /// Return the payload of the most recent valid record
    ///
    /// Prefers the primary slot and falls back to the backup slot on any
    /// failure. When both fail, the primary's error is returned.
    #[instrument(skip_all, fields(primary = %slots.primary.display()))]
    pub fn read(&self, slots: &SlotPair) -> Result<Vec<u8>> {
        let primary_err = match self.read_slot(slots.primary()) {
            Ok(record) => return Ok(record.into_payload()),
            Err(e) => e,
        };
        debug!(error = %primary_err, "Primary slot unusable, trying backup");

        match self.read_slot(slots.backup()) {
            Ok(record) => {
                debug!(size = record.payload().len(), "Recovered from backup slot");
                Ok(record.into_payload())
            }
            Err(backup_err) => {
                debug!(error = %backup_err, "Backup slot unusable as well");
                Err(primary_err)
            }
        }
    }

    /// Validated read of a single slot, without fallback
    pub fn read_slot(&self, path: &Path) -> Result<Record> {
        let content = self.fs.read(path).map_err(Error::io(path))?;
        Record::decode(content)
    }

    /// Check both slots independently
    pub fn inspect(&self, slots: &SlotPair) -> SlotPairReport {
        let report = |path: &Path| SlotReport {
            path: path.to_path_buf(),
            state: SlotState::from_result(&self.read_slot(path)),
        };
        SlotPairReport {
            primary: report(slots.primary()),
            backup: report(slots.backup()),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    proptest! {
        /// Whatever is written is read back unchanged.
        #[test]
        fn write_then_read_roundtrips(data in prop::collection::vec(any::<u8>(), 0..2048)) {
            let dir = tempdir().unwrap();
            let slots = SlotPair::new(dir.path().join("p"), dir.path().join("b"));
            let store = DurableStore::new();

            store.write(&data, &slots).unwrap();
            prop_assert_eq!(store.read(&slots).unwrap(), data);
        }

        /// The on-disk size is always the fixed header plus the payload.
        #[test]
        fn encoded_size_is_header_plus_payload(data in prop::collection::vec(any::<u8>(), 0..2048)) {
            let dir = tempdir().unwrap();
            let slots = SlotPair::new(dir.path().join("p"), dir.path().join("b"));

            DurableStore::new().write(&data, &slots).unwrap();
            let on_disk = std::fs::metadata(slots.primary()).unwrap().len() as usize;
            prop_assert_eq!(on_disk, crate::HEADER_LEN + data.len());
        }
    }
}
