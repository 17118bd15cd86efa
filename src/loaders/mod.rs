//! Profile loaders
//!
//! This module provides the loader contract the cache manager delegates to,
//! and the built-in IES (LM-63) implementation.

use std::path::Path;

use crate::error::LoadError;

pub mod ies;

pub use ies::{validate_ies_data, validate_ies_file, IesDataset, IesLoader};

/// Contract between the cache manager and a profile loader.
///
/// A loader either returns a decoded dataset or a structured [`LoadError`];
/// no other failure kind crosses this boundary.
pub trait ProfileLoader {
    fn load(&self, path: &Path) -> Result<IesDataset, LoadError>;
}
