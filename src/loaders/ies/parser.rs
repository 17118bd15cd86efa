use std::collections::HashMap;

use super::types::*;
use crate::error::LoadError;

/// Upper bound on per-axis angle counts. Real LM-63 grids stay well under
/// this; anything larger is a corrupt count field, not a measurement.
const MAX_ANGLE_COUNT: usize = 4096;

const ANGLE_EPS: f32 = 1e-3;

/// Fully parsed profile file: header plus the raw measurement grid.
#[derive(Debug, Clone)]
pub struct ParsedProfile {
    pub header: IesHeader,
    /// Vertical angles in degrees, strictly increasing within [0, 180]
    pub vertical_angles: Vec<f32>,
    /// Horizontal angles in degrees, strictly increasing within [0, 360]
    pub horizontal_angles: Vec<f32>,
    /// Raw candela values indexed `[horizontal plane][vertical angle]`
    pub candela: Vec<Vec<f32>>,
}

/// Whitespace-separated numeric stream following the TILT= line.
struct NumberStream<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> NumberStream<'a> {
    fn new(lines: &[&'a str]) -> Self {
        Self {
            tokens: lines.iter().flat_map(|l| l.split_whitespace()).collect(),
            pos: 0,
        }
    }

    /// Read the next value. Some writers emit comma-separated fields, so a
    /// trailing/leading comma on a token is tolerated.
    fn next_f32(&mut self, what: &str) -> Result<f32, LoadError> {
        let token = self.tokens.get(self.pos).copied().ok_or_else(|| {
            LoadError::malformed(format!("unexpected end of file while reading {what}"))
        })?;
        self.pos += 1;
        let trimmed = token.trim_matches(',');
        trimmed.parse::<f32>().map_err(|_| {
            LoadError::malformed(format!("invalid numeric token '{token}' while reading {what}"))
        })
    }

    fn next_count(&mut self, what: &str) -> Result<usize, LoadError> {
        let value = self.next_f32(what)?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(LoadError::malformed(format!(
                "expected a non-negative integer for {what}, got {value}"
            )));
        }
        Ok(value as usize)
    }

    fn next_series(&mut self, count: usize, what: &str) -> Result<Vec<f32>, LoadError> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.next_f32(what)?);
        }
        Ok(values)
    }
}

fn parse_keyword(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix('[')?;
    let (key, value) = rest.split_once(']')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

fn ensure_increasing(angles: &[f32], what: &str) -> Result<(), LoadError> {
    for pair in angles.windows(2) {
        if pair[1] <= pair[0] {
            return Err(LoadError::malformed(format!(
                "{what} angles must be strictly increasing ({} follows {})",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

fn ensure_range(angles: &[f32], max: f32, what: &str) -> Result<(), LoadError> {
    let first = angles[0];
    let last = angles[angles.len() - 1];
    if first < -ANGLE_EPS || last > max + ANGLE_EPS {
        return Err(LoadError::malformed(format!(
            "{what} angles must lie within [0, {max}], got [{first}, {last}]"
        )));
    }
    Ok(())
}

/// Parse a complete LM-63 profile file.
pub fn parse(text: &str) -> Result<ParsedProfile, LoadError> {
    let lines: Vec<&str> = text.lines().collect();

    let mut attributes: HashMap<String, String> = HashMap::new();
    let mut last_key: Option<String> = None;
    let mut version = None;
    let mut seen_content = false;
    let mut tilt: Option<(usize, &str)> = None;

    for (index, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if !seen_content {
            seen_content = true;
            if line.starts_with("IESNA") {
                let marker = IesVersion::from_marker(line).ok_or_else(|| {
                    LoadError::unsupported(format!(
                        "unknown format marker '{line}' (supported: {})",
                        SUPPORTED_MARKERS.join(", ")
                    ))
                })?;
                version = Some(marker);
                continue;
            }
            // No marker line: 1986-era file, header is free-form text.
            version = Some(IesVersion::Lm63_1986);
        }
        if let Some(rest) = line.strip_prefix("TILT=") {
            tilt = Some((index, rest.trim()));
            break;
        }
        if let Some((key, value)) = parse_keyword(line) {
            if key == "MORE" {
                if let Some(prev) = last_key.as_ref().and_then(|k| attributes.get_mut(k)) {
                    prev.push('\n');
                    prev.push_str(&value);
                }
            } else {
                attributes.insert(key.clone(), value);
                last_key = Some(key);
            }
        }
    }

    let (tilt_index, tilt_value) = tilt.ok_or_else(|| LoadError::malformed("missing TILT= line"))?;
    match tilt_value {
        "NONE" => {}
        "INCLUDE" => return Err(LoadError::unsupported("TILT=INCLUDE tilt data")),
        other => {
            return Err(LoadError::unsupported(format!(
                "external tilt file '{other}'"
            )))
        }
    }

    let mut stream = NumberStream::new(&lines[tilt_index + 1..]);

    let lamp_count = stream.next_count("lamp count")?;
    if lamp_count == 0 {
        return Err(LoadError::malformed("lamp count must be at least 1"));
    }
    let lumens_per_lamp = stream.next_f32("lumens per lamp")?;
    let candela_multiplier = stream.next_f32("candela multiplier")?;
    if candela_multiplier <= 0.0 {
        return Err(LoadError::malformed(format!(
            "candela multiplier must be positive, got {candela_multiplier}"
        )));
    }

    let vertical_angle_count = stream.next_count("vertical angle count")?;
    let horizontal_angle_count = stream.next_count("horizontal angle count")?;
    if vertical_angle_count < 2 {
        return Err(LoadError::malformed(format!(
            "at least two vertical angles required, got {vertical_angle_count}"
        )));
    }
    if horizontal_angle_count == 0 {
        return Err(LoadError::malformed("at least one horizontal plane required"));
    }
    if vertical_angle_count > MAX_ANGLE_COUNT || horizontal_angle_count > MAX_ANGLE_COUNT {
        return Err(LoadError::malformed(format!(
            "implausible angle counts {vertical_angle_count}x{horizontal_angle_count}"
        )));
    }

    let photometric_type = PhotometricType::from_code(stream.next_count("photometric type")? as u32)?;
    if photometric_type != PhotometricType::TypeC {
        // Type B/A webs use a -90..90 vertical frame the storage mapping
        // cannot represent.
        return Err(LoadError::unsupported(format!(
            "{photometric_type:?} photometric web (only Type C is supported)"
        )));
    }
    let units = UnitsType::from_code(stream.next_count("units type")? as u32)?;
    let luminaire_dimensions = [
        stream.next_f32("luminaire width")?,
        stream.next_f32("luminaire length")?,
        stream.next_f32("luminaire height")?,
    ];
    let ballast_factor = stream.next_f32("ballast factor")?;
    if ballast_factor <= 0.0 {
        return Err(LoadError::malformed(format!(
            "ballast factor must be positive, got {ballast_factor}"
        )));
    }
    let future_use = stream.next_f32("future use field")?;
    let input_watts = stream.next_f32("input watts")?;

    let vertical_angles = stream.next_series(vertical_angle_count, "vertical angles")?;
    ensure_increasing(&vertical_angles, "vertical")?;
    ensure_range(&vertical_angles, 180.0, "vertical")?;

    let horizontal_angles = stream.next_series(horizontal_angle_count, "horizontal angles")?;
    ensure_increasing(&horizontal_angles, "horizontal")?;
    ensure_range(&horizontal_angles, 360.0, "horizontal")?;

    let mut candela = Vec::with_capacity(horizontal_angle_count);
    for plane in 0..horizontal_angle_count {
        let row = stream.next_series(
            vertical_angle_count,
            &format!("candela values for horizontal plane {plane}"),
        )?;
        if let Some(bad) = row.iter().find(|v| **v < 0.0) {
            return Err(LoadError::malformed(format!(
                "negative candela value {bad} in horizontal plane {plane}"
            )));
        }
        candela.push(row);
    }
    // Trailing tokens (e.g. an END marker) are tolerated.

    let header = IesHeader {
        version: version.ok_or_else(|| LoadError::malformed("empty file"))?,
        attributes,
        lamp_count: lamp_count as u32,
        lumens_per_lamp,
        candela_multiplier,
        vertical_angle_count,
        horizontal_angle_count,
        photometric_type,
        units,
        luminaire_dimensions,
        ballast_factor,
        future_use,
        input_watts,
    };

    Ok(ParsedProfile {
        header,
        vertical_angles,
        horizontal_angles,
        candela,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "IESNA:LM-63-2002\n\
        [TEST] LAB-1\n\
        [MANUFAC] Example\n\
        TILT=NONE\n\
        1 1000.0 1.0 3 1 1 2 0.1 0.1 0.1\n\
        1.0 1.0 100.0\n\
        0.0 90.0 180.0\n\
        0.0\n\
        200.0 100.0 0.0\n";

    #[test]
    fn minimal_profile_parses() {
        let parsed = parse(MINIMAL).unwrap();
        assert_eq!(parsed.header.version, IesVersion::Lm63_2002);
        assert_eq!(parsed.header.attributes.get("TEST").unwrap(), "LAB-1");
        assert_eq!(parsed.header.photometric_type, PhotometricType::TypeC);
        assert_eq!(parsed.header.units, UnitsType::Meters);
        assert_eq!(parsed.vertical_angles, vec![0.0, 90.0, 180.0]);
        assert_eq!(parsed.horizontal_angles, vec![0.0]);
        assert_eq!(parsed.candela, vec![vec![200.0, 100.0, 0.0]]);
    }

    #[test]
    fn missing_marker_is_treated_as_1986() {
        let text = MINIMAL.replace("IESNA:LM-63-2002\n", "");
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed.header.version, IesVersion::Lm63_1986);
    }

    #[test]
    fn unknown_marker_is_unsupported() {
        let text = MINIMAL.replace("IESNA:LM-63-2002", "IESNA:LM-99-2099");
        assert!(matches!(parse(&text), Err(LoadError::Unsupported(_))));
    }

    #[test]
    fn type_b_webs_are_unsupported() {
        // Photometric type is the sixth numeric field.
        let text = MINIMAL.replace("1 1000.0 1.0 3 1 1 2", "1 1000.0 1.0 3 1 2 2");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, LoadError::Unsupported(_)));
        assert!(err.to_string().contains("TypeB"));
    }

    #[test]
    fn tilt_include_is_unsupported() {
        let text = MINIMAL.replace("TILT=NONE", "TILT=INCLUDE");
        assert!(matches!(parse(&text), Err(LoadError::Unsupported(_))));
    }

    #[test]
    fn missing_tilt_line_is_malformed() {
        assert!(matches!(
            parse("IESNA:LM-63-2002\n[TEST] X\n"),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn truncated_candela_grid_is_malformed() {
        let text = MINIMAL.replace("200.0 100.0 0.0\n", "200.0 100.0\n");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn non_monotonic_vertical_angles_are_malformed() {
        let text = MINIMAL.replace("0.0 90.0 180.0", "0.0 180.0 90.0");
        assert!(matches!(parse(&text), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn negative_candela_is_malformed() {
        let text = MINIMAL.replace("200.0 100.0 0.0", "200.0 -5.0 0.0");
        assert!(matches!(parse(&text), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn non_numeric_token_is_malformed() {
        let text = MINIMAL.replace("1000.0", "lots");
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("'lots'"));
    }

    #[test]
    fn more_keyword_appends_to_previous() {
        let text = MINIMAL.replace(
            "[MANUFAC] Example\n",
            "[MANUFAC] Example\n[MORE] Lighting Co\n",
        );
        let parsed = parse(&text).unwrap();
        assert_eq!(
            parsed.header.attributes.get("MANUFAC").unwrap(),
            "Example\nLighting Co"
        );
    }
}
