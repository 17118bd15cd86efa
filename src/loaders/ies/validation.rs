use super::types::SUPPORTED_MARKERS;
use crate::error::LoadError;

/// Validate an IES profile file without fully parsing it
pub fn validate_ies_file<P: AsRef<std::path::Path>>(path: P) -> Result<bool, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(validate_ies_data(&text))
}

/// Cheap pre-check: a recognized marker line, or a markerless legacy file
/// that at least carries a TILT= specification.
pub fn validate_ies_data(text: &str) -> bool {
    let first = text.lines().map(str::trim).find(|l| !l.is_empty());
    match first {
        Some(line) if line.starts_with("IESNA") => SUPPORTED_MARKERS.contains(&line),
        Some(_) => text.lines().any(|l| l.trim().starts_with("TILT=")),
        None => false,
    }
}
