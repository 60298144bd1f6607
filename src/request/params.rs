use std::{fmt, ops::RangeInclusive, str::FromStr};

use crate::foundation::error::{ArtError, ArtResult};

/// Shape family primitive fits with (`-m`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    Combo,
    #[default]
    Triangle,
    Rect,
    Ellipse,
    Circle,
    RotatedRect,
    Beziers,
    RotatedEllipse,
    Polygon,
}

impl ShapeMode {
    pub const ALL: [ShapeMode; 9] = [
        Self::Combo,
        Self::Triangle,
        Self::Rect,
        Self::Ellipse,
        Self::Circle,
        Self::RotatedRect,
        Self::Beziers,
        Self::RotatedEllipse,
        Self::Polygon,
    ];

    /// Numeric code primitive expects after `-m`.
    pub fn code(self) -> u8 {
        match self {
            Self::Combo => 0,
            Self::Triangle => 1,
            Self::Rect => 2,
            Self::Ellipse => 3,
            Self::Circle => 4,
            Self::RotatedRect => 5,
            Self::Beziers => 6,
            Self::RotatedEllipse => 7,
            Self::Polygon => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Combo => "combo",
            Self::Triangle => "triangle",
            Self::Rect => "rect",
            Self::Ellipse => "ellipse",
            Self::Circle => "circle",
            Self::RotatedRect => "rotatedrect",
            Self::Beziers => "beziers",
            Self::RotatedEllipse => "rotatedellipse",
            Self::Polygon => "polygon",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }
}

impl fmt::Display for ShapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.code(), self.name())
    }
}

impl FromStr for ShapeMode {
    type Err = ArtError;

    /// Accepts `"1"`, `"triangle"` or the form label `"1=triangle"`; a label's
    /// code and name must agree.
    fn from_str(s: &str) -> ArtResult<Self> {
        let s = s.trim();
        match s.split_once('=') {
            Some((code, name)) => {
                let by_code = Self::parse_code(code.trim())?;
                let by_name = Self::parse_name(name.trim())?;
                if by_code != by_name {
                    return Err(ArtError::validation(format!(
                        "shape mode label '{s}' mixes code {} ({}) with '{}'",
                        by_code.code(),
                        by_code.name(),
                        by_name.name()
                    )));
                }
                Ok(by_code)
            }
            None if s.bytes().all(|b| b.is_ascii_digit()) && !s.is_empty() => Self::parse_code(s),
            None => Self::parse_name(s),
        }
    }
}

impl ShapeMode {
    fn parse_code(code: &str) -> ArtResult<Self> {
        code.parse::<u8>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| ArtError::validation(format!("unknown shape mode code '{code}'")))
    }

    fn parse_name(name: &str) -> ArtResult<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| ArtError::validation(format!("unknown shape mode '{name}'")))
    }
}

/// What the request hands back to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    /// Frames rendered by primitive, assembled by ImageMagick.
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [Self::Png, Self::Jpg, Self::Svg, Self::Gif];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Gif => "gif",
        }
    }

    pub fn is_animated(self) -> bool {
        matches!(self, Self::Gif)
    }

    /// Final artifact file name for an upload with the given stem.
    pub fn artifact_name(self, stem: &str) -> String {
        match self {
            Self::Gif => format!("{stem}_animation.gif"),
            other => format!("{stem}_result.{}", other.extension()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ArtError;

    fn from_str(s: &str) -> ArtResult<Self> {
        // Form labels may carry a decoration after the name ("GIF 🎬").
        let word = s.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
        match word.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            "gif" => Ok(Self::Gif),
            _ => Err(ArtError::validation(format!("unknown output format '{s}'"))),
        }
    }
}

/// Hex background color for `-bg`, stored without `#`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor(String);

impl BackgroundColor {
    pub const DEFAULT_HEX: &'static str = "ffffff";

    pub fn parse(raw: &str) -> ArtResult<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.is_empty() {
            return Ok(Self::default());
        }
        if !matches!(hex.len(), 3 | 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ArtError::validation(format!(
                "background color '{raw}' must be 3, 6 or 8 hex digits"
            )));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self(Self::DEFAULT_HEX.to_string())
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = ArtError;

    fn try_from(value: String) -> ArtResult<Self> {
        Self::parse(&value)
    }
}

impl From<BackgroundColor> for String {
    fn from(value: BackgroundColor) -> Self {
        value.0
    }
}

impl FromStr for BackgroundColor {
    type Err = ArtError;

    fn from_str(s: &str) -> ArtResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const NUM_SHAPES_RANGE: RangeInclusive<u32> = 10..=1000;
pub const REPEAT_RANGE: RangeInclusive<u32> = 0..=100;
pub const NTH_RANGE: RangeInclusive<u32> = 1..=100;
pub const RESIZE_RANGE: RangeInclusive<u32> = 64..=2048;
pub const OUTPUT_SIZE_RANGE: RangeInclusive<u32> = 128..=4096;
pub const WORKERS_RANGE: RangeInclusive<u32> = 0..=16;

/// The configuration record collected from the settings form.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub num_shapes: u32,
    pub mode: ShapeMode,
    pub repeat: u32,
    /// Save every nth frame (only meaningful with `%d` outputs).
    pub nth: u32,
    pub resize: u32,
    pub output_size: u32,
    pub alpha: u8,
    pub background: BackgroundColor,
    /// 0 lets primitive use every core.
    pub workers: u32,
    pub verbose: bool,
    pub very_verbose: bool,
    pub format: OutputFormat,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            num_shapes: 100,
            mode: ShapeMode::default(),
            repeat: 0,
            nth: 1,
            resize: 256,
            output_size: 1024,
            alpha: 128,
            background: BackgroundColor::default(),
            workers: 0,
            verbose: false,
            very_verbose: false,
            format: OutputFormat::default(),
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> ArtResult<()> {
        check_range("num_shapes", self.num_shapes, NUM_SHAPES_RANGE)?;
        check_range("repeat", self.repeat, REPEAT_RANGE)?;
        check_range("nth", self.nth, NTH_RANGE)?;
        check_range("resize", self.resize, RESIZE_RANGE)?;
        check_range("output_size", self.output_size, OUTPUT_SIZE_RANGE)?;
        check_range("workers", self.workers, WORKERS_RANGE)?;
        Ok(())
    }

    /// Sets one field from its textual form, keyed by the serde field name.
    pub fn set_field(&mut self, key: &str, value: &str) -> ArtResult<()> {
        let value = value.trim();
        match key {
            "num_shapes" => self.num_shapes = parse_number(key, value)?,
            "mode" => self.mode = value.parse()?,
            "repeat" => self.repeat = parse_number(key, value)?,
            "nth" => self.nth = parse_number(key, value)?,
            "resize" => self.resize = parse_number(key, value)?,
            "output_size" => self.output_size = parse_number(key, value)?,
            "alpha" => self.alpha = parse_number(key, value)?,
            "background" => self.background = value.parse()?,
            "workers" => self.workers = parse_number(key, value)?,
            "verbose" => self.verbose = parse_flag(value),
            "very_verbose" => self.very_verbose = parse_flag(value),
            "format" => self.format = value.parse()?,
            _ => {
                return Err(ArtError::validation(format!("unknown parameter '{key}'")));
            }
        }
        Ok(())
    }
}

fn check_range(name: &str, value: u32, range: RangeInclusive<u32>) -> ArtResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ArtError::validation(format!(
            "{name} must be within {}..={}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> ArtResult<T> {
    value
        .parse()
        .map_err(|_| ArtError::validation(format!("{name} expects a number, got '{value}'")))
}

// HTML checkboxes submit "on"; absent means false.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

#[cfg(test)]
#[path = "../../tests/unit/request/params.rs"]
mod tests;
