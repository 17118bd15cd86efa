// tests/test_ies_loader.rs
// Loader contract tests: structured failures for bad input, decoded grid and
// normalization for good input.

use std::fs;
use std::path::Path;

use anyhow::Result;
use ies_atlas::{validate_ies_data, validate_ies_file, IesLoader, LoadError, ProfileLoader};

const SAMPLE: &str = "IESNA:LM-63-2002\n\
    [TEST] RIG-42\n\
    [TESTLAB] ies-atlas\n\
    [MANUFAC] Example Lighting Co\n\
    [LUMCAT] EX-650\n\
    TILT=NONE\n\
    1 1650.0 2.0 5 3 1 2 0.30 0.30 0.12\n\
    1.0 1.0 72.0\n\
    0.0 45.0 90.0 135.0 180.0\n\
    0.0 90.0 180.0\n\
    800.0 600.0 400.0 200.0 0.0\n\
    700.0 500.0 300.0 100.0 0.0\n\
    600.0 400.0 200.0 50.0 0.0\n";

#[test]
fn sample_profile_decodes_and_normalizes() -> Result<()> {
    let loader = IesLoader::new();
    let dataset = loader.load_from_str(SAMPLE)?;

    assert!(!dataset.is_empty());
    // Peak-normalized: the brightest measurement maps to 1.0.
    assert!((dataset.peak_candela() - 1.0).abs() < 1e-6);
    assert!((dataset.sample(0.0, 0.0) - 1.0).abs() < 1e-6);
    // Relative shape survives normalization: 400/800 at (90 deg, 0 deg).
    assert!((dataset.sample(90.0, 0.0) - 0.5).abs() < 1e-6);
    // Nadir-to-zenith falloff reaches zero.
    assert!(dataset.sample(180.0, 0.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn loader_trait_reports_io_failures_for_missing_files() {
    let loader = IesLoader::new();
    let err = ProfileLoader::load(&loader, Path::new("/nonexistent/file.ies")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn loader_round_trips_through_a_file_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("sample.ies");
    fs::write(&path, SAMPLE)?;

    let from_file = IesLoader::new().load_from_file(&path)?;
    let from_str = IesLoader::new().load_from_str(SAMPLE)?;
    assert_eq!(
        from_file.generate_tile(32, 32),
        from_str.generate_tile(32, 32)
    );
    Ok(())
}

#[test]
fn malformed_files_fail_with_a_reason() {
    let loader = IesLoader::new();

    let truncated = &SAMPLE[..SAMPLE.len() - 40];
    let err = loader.load_from_str(truncated).unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
    assert!(!err.to_string().is_empty());

    let err = loader.load_from_str("").unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)));
}

#[test]
fn tilt_data_is_a_structured_unsupported_failure() {
    let text = SAMPLE.replace("TILT=NONE", "TILT=INCLUDE");
    let err = IesLoader::new().load_from_str(&text).unwrap_err();
    assert!(matches!(err, LoadError::Unsupported(_)));

    let text = SAMPLE.replace("TILT=NONE", "TILT=lamp.tlt");
    let err = IesLoader::new().load_from_str(&text).unwrap_err();
    assert!(matches!(err, LoadError::Unsupported(_)));
}

#[test]
fn unknown_marker_is_a_structured_unsupported_failure() {
    let text = SAMPLE.replace("IESNA:LM-63-2002", "IESNA:LM-63-2095");
    let err = IesLoader::new().load_from_str(&text).unwrap_err();
    assert!(matches!(err, LoadError::Unsupported(_)));
    assert!(err.to_string().contains("IESNA:LM-63-2095"));
}

#[test]
fn validation_precheck_matches_loader_outcome() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let good = dir.path().join("good.ies");
    fs::write(&good, SAMPLE)?;
    assert!(validate_ies_file(&good)?);

    let bad = dir.path().join("bad.ies");
    fs::write(&bad, "IESNA:LM-63-2095\nTILT=NONE\n")?;
    assert!(!validate_ies_file(&bad)?);

    assert!(!validate_ies_data("random text with no tilt line"));
    Ok(())
}

#[test]
fn symmetric_profile_ignores_horizontal_angle() -> Result<()> {
    let text = "IESNA:LM-63-1995\n\
        [TEST] SYM\n\
        TILT=NONE\n\
        1 -1 1.0 3 1 1 2 0.0 0.0 0.0\n\
        1.0 1.0 20.0\n\
        0.0 90.0 180.0\n\
        0.0\n\
        500.0 250.0 0.0\n";
    let dataset = IesLoader::new().load_from_str(text)?;
    for h in [0.0, 90.0, 215.0, 359.0] {
        assert!((dataset.sample(45.0, h) - 0.75).abs() < 1e-6);
    }
    Ok(())
}
