//! IES (IESNA LM-63) photometric profile loading and parsing
//!
//! This module decodes the text-based LM-63 luminaire format into the
//! fixed-size numeric dataset the profile cache uploads to GPU storage.

mod dataset;
mod loader;
mod parser;
mod types;
mod validation;

pub use dataset::IesDataset;
pub use loader::IesLoader;
pub use parser::{parse, ParsedProfile};
pub use types::{IesHeader, IesVersion, PhotometricType, UnitsType, SUPPORTED_MARKERS};
pub use validation::{validate_ies_data, validate_ies_file};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_validation() {
        assert!(validate_ies_data(
            "IESNA:LM-63-2002\n[TEST] X\nTILT=NONE\n"
        ));
        assert!(validate_ies_data("legacy header\nTILT=NONE\n"));
        assert!(!validate_ies_data("IESNA:LM-99-2099\nTILT=NONE\n"));
        assert!(!validate_ies_data(""));
        assert!(!validate_ies_data("just some text"));
    }

    #[test]
    fn version_marker_round_trip() {
        for marker in SUPPORTED_MARKERS {
            assert!(IesVersion::from_marker(marker).is_some(), "{marker}");
        }
        assert_eq!(IesVersion::from_marker("IESNA91"), Some(IesVersion::Lm63_1991));
        assert_eq!(IesVersion::from_marker("IESNA:LM-64-0000"), None);
    }

    #[test]
    fn loader_creation() {
        let loader = IesLoader::new();
        assert!(matches!(
            loader.load_from_str("garbage"),
            Err(crate::error::LoadError::Malformed(_))
        ));
    }
}
