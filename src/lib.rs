//! # durable_blob
//!
//! Crash-resistant persistence of a single opaque byte blob.
//!
//! A blob is written to a backup path first and then renamed over the
//! primary path, so a crash or power loss mid-write never corrupts the
//! previously stored value. Every record carries a SHA-256 checksum of its
//! payload; reads validate it and transparently fall back to the backup
//! copy when the primary is missing or damaged.
//!
//! ## On-disk format
//!
//! ```text
//! DataHash:<base64url SHA-256, no padding>;<payload>
//! ```
//!
//! The header is always [`HEADER_LEN`] (53) bytes; the payload runs to end of file.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> durable_blob::Result<()> {
//! durable_blob::write(b"state", "state.bin", "state.bin.bak")?;
//! let data = durable_blob::read("state.bin", "state.bin.bak")?;
//! assert_eq!(data, b"state");
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod model;
pub mod store;

mod config;
mod error;

use std::path::Path;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use model::Digest;
pub use store::{DurableStore, Record, SlotPair, SlotPairReport, SlotReport, SlotRole, SlotState};

/// Record layout version. The header itself carries no version field.
pub const FORMAT_VERSION: u32 = 1;

/// Marker every record starts with
pub const HEADER_PREFIX: &str = "DataHash:";

/// Last byte of every record header
pub const HEADER_TERMINATOR: u8 = b';';

/// Fixed header length: marker, encoded digest, terminator
pub const HEADER_LEN: usize = HEADER_PREFIX.len() + model::ENCODED_DIGEST_LEN + 1;

/// Write `data` to `primary`, staging it in `backup`
pub fn write(data: &[u8], primary: impl AsRef<Path>, backup: impl AsRef<Path>) -> Result<()> {
    DurableStore::new().write(data, &SlotPair::new(primary.as_ref(), backup.as_ref()))
}

/// Read the most recent valid blob from `primary`, falling back to `backup`
pub fn read(primary: impl AsRef<Path>, backup: impl AsRef<Path>) -> Result<Vec<u8>> {
    DurableStore::new().read(&SlotPair::new(primary.as_ref(), backup.as_ref()))
}
