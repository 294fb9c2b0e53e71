//! Record codec - the self-describing on-disk layout of one stored blob
//!
//! ```text
//! DataHash:<43 chars of URL-safe base64 SHA-256, no padding>;<payload...>
//! ```
//!
//! The header is always [`HEADER_LEN`] bytes. There is no length field: the
//! payload is every byte after the header up to end of file.

use crate::model::Digest;
use crate::{Error, Result, HEADER_LEN, HEADER_PREFIX, HEADER_TERMINATOR};

/// A payload together with its checksum
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    checksum: Digest,
    payload: Vec<u8>,
}

impl Record {
    /// Create a record, computing the checksum of `payload`
    pub fn new(payload: Vec<u8>) -> Self {
        Record {
            checksum: Digest::compute(&payload),
            payload,
        }
    }

    /// Header text for a payload with the given checksum
    pub fn encode_header(checksum: &Digest) -> String {
        let mut header = String::with_capacity(HEADER_LEN);
        header.push_str(HEADER_PREFIX);
        header.push_str(&checksum.to_base64());
        header.push(HEADER_TERMINATOR as char);
        header
    }

    /// Encode header and payload into one buffer
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(Self::encode_header(&self.checksum).as_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Validate raw file content and split off the payload
    ///
    /// Checks, in order: minimum length, the `DataHash:` marker, the `;`
    /// terminator at the last header byte, and finally that the checksum in
    /// the header matches a hash of everything after the header.
    pub fn decode(mut content: Vec<u8>) -> Result<Self> {
        if content.len() < HEADER_LEN {
            return Err(Error::TooShort { len: content.len() });
        }

        let header = &content[..HEADER_LEN];
        if !header.starts_with(HEADER_PREFIX.as_bytes()) {
            return Err(Error::MissingPrefixMarker);
        }
        if header[HEADER_LEN - 1] != HEADER_TERMINATOR {
            return Err(Error::MissingTerminator);
        }

        let claimed = &header[HEADER_PREFIX.len()..HEADER_LEN - 1];
        let actual = Digest::compute(&content[HEADER_LEN..]);
        match Digest::from_base64(claimed) {
            Some(expected) if expected == actual => {}
            _ => {
                return Err(Error::ChecksumMismatch {
                    expected: String::from_utf8_lossy(claimed).into_owned(),
                    actual: actual.to_base64(),
                })
            }
        }

        content.drain(..HEADER_LEN);
        Ok(Record {
            checksum: actual,
            payload: content,
        })
    }

    /// Checksum of the payload
    pub fn checksum(&self) -> &Digest {
        &self.checksum
    }

    /// The stored bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take ownership of the stored bytes
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Size of the encoded record on disk
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }
}
