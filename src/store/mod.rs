//! Durable blob storage
//!
//! This module implements the record codec and the crash-resistant
//! write/read protocol over a primary and a backup slot.

mod durable;
mod record;

pub use durable::{DurableStore, SlotPair, SlotPairReport, SlotReport, SlotRole, SlotState};
pub use record::Record;
