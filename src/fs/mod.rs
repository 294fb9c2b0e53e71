//! Pluggable filesystem layer

mod faulty;
mod std_fs;
mod traits;

pub use faulty::{FaultyFile, FaultyFilesystem};
pub use std_fs::StdFilesystem;
pub use traits::Filesystem;
