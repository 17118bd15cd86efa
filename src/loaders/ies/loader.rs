use std::path::Path;

use super::dataset::IesDataset;
use super::parser;
use crate::error::LoadError;
use crate::loaders::ProfileLoader;

/// LM-63 profile loader.
///
/// Decodes a profile file into an [`IesDataset`]: candela values are scaled
/// by the file's candela multiplier and ballast factor, then peak-normalized
/// to 1.0 so the 16-bit float storage channel stays in a shader-friendly
/// range.
#[derive(Debug, Clone, Default)]
pub struct IesLoader;

impl IesLoader {
    /// Create new IES loader
    pub fn new() -> Self {
        Self
    }

    /// Load a profile from a file on disk.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<IesDataset, LoadError> {
        let text = std::fs::read_to_string(path)?;
        self.load_from_str(&text)
    }

    /// Load a profile from in-memory text.
    pub fn load_from_str(&self, text: &str) -> Result<IesDataset, LoadError> {
        let parsed = parser::parse(text)?;

        let mut dataset = IesDataset::new(
            parsed.vertical_angles,
            parsed.horizontal_angles,
            parsed.candela,
        )?;
        dataset.scale(parsed.header.candela_multiplier * parsed.header.ballast_factor);

        let peak = dataset.peak_candela();
        if peak > 0.0 {
            dataset.scale(1.0 / peak);
        }
        Ok(dataset)
    }
}

impl ProfileLoader for IesLoader {
    fn load(&self, path: &Path) -> Result<IesDataset, LoadError> {
        self.load_from_file(path)
    }
}
