//! Core data model types for durable_blob

mod digest;

pub use digest::{Digest, DIGEST_LEN, ENCODED_DIGEST_LEN};
