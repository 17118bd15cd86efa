use std::collections::HashMap;

use crate::error::LoadError;

/// Format markers accepted on the first line of a profile file.
pub const SUPPORTED_MARKERS: &[&str] = &[
    "IESNA:LM-63-1986",
    "IESNA:LM-63-1991",
    "IESNA91",
    "IESNA:LM-63-1995",
    "IESNA:LM-63-2002",
];

/// LM-63 edition a profile file declares (or implies) on its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IesVersion {
    /// 1986 edition; files predate the `IESNA:` marker line
    Lm63_1986,
    /// 1991 edition (`IESNA:LM-63-1991` or the short `IESNA91` marker)
    Lm63_1991,
    /// 1995 edition
    Lm63_1995,
    /// 2002 edition
    Lm63_2002,
}

impl IesVersion {
    /// Map a marker line to an edition, `None` for unrecognized markers.
    pub fn from_marker(line: &str) -> Option<Self> {
        match line.trim() {
            "IESNA:LM-63-1986" => Some(Self::Lm63_1986),
            "IESNA:LM-63-1991" | "IESNA91" => Some(Self::Lm63_1991),
            "IESNA:LM-63-1995" => Some(Self::Lm63_1995),
            "IESNA:LM-63-2002" => Some(Self::Lm63_2002),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Lm63_1986 => "LM-63-1986",
            Self::Lm63_1991 => "LM-63-1991",
            Self::Lm63_1995 => "LM-63-1995",
            Self::Lm63_2002 => "LM-63-2002",
        }
    }
}

/// Goniometer coordinate system the candela grid was measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotometricType {
    /// Type C: vertical angles from nadir, horizontal angles around the polar axis
    TypeC,
    /// Type B: floodlight-style axes
    TypeB,
    /// Type A: automotive-style axes
    TypeA,
}

impl PhotometricType {
    pub fn from_code(code: u32) -> Result<Self, LoadError> {
        match code {
            1 => Ok(Self::TypeC),
            2 => Ok(Self::TypeB),
            3 => Ok(Self::TypeA),
            other => Err(LoadError::malformed(format!(
                "invalid photometric type code {other} (expected 1, 2 or 3)"
            ))),
        }
    }
}

/// Unit system for the luminaire dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsType {
    Feet,
    Meters,
}

impl UnitsType {
    pub fn from_code(code: u32) -> Result<Self, LoadError> {
        match code {
            1 => Ok(Self::Feet),
            2 => Ok(Self::Meters),
            other => Err(LoadError::malformed(format!(
                "invalid units type code {other} (expected 1 or 2)"
            ))),
        }
    }
}

/// Parsed LM-63 header: the keyword block plus the leading numeric fields.
#[derive(Debug, Clone)]
pub struct IesHeader {
    /// Declared (or implied) file edition
    pub version: IesVersion,
    /// Bracketed keyword attributes (`[TEST]`, `[MANUFAC]`, ...)
    pub attributes: HashMap<String, String>,
    /// Number of lamps in the luminaire
    pub lamp_count: u32,
    /// Rated lumens per lamp (-1 indicates absolute photometry)
    pub lumens_per_lamp: f32,
    /// Multiplier applied to every candela value
    pub candela_multiplier: f32,
    /// Number of vertical measurement angles
    pub vertical_angle_count: usize,
    /// Number of horizontal measurement planes
    pub horizontal_angle_count: usize,
    /// Goniometer coordinate system
    pub photometric_type: PhotometricType,
    /// Unit system for the luminaire dimensions
    pub units: UnitsType,
    /// Luminous opening width, length, height
    pub luminaire_dimensions: [f32; 3],
    /// Ballast factor, also applied to every candela value
    pub ballast_factor: f32,
    /// Reserved field (ballast-lamp photometric factor in older editions)
    pub future_use: f32,
    /// Rated input watts
    pub input_watts: f32,
}
