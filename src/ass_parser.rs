use std::fmt;
use anyhow::{Result, anyhow};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: ASS script parsing into overlay descriptors

// @const: Inline color override tag, e.g. {\1c&HFF0000&}
static COLOR_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\\1c&H([0-9A-Fa-f]{6})&\}").unwrap()
});

// @const: Font size used when the script has no Default style
pub const FALLBACK_FONT_SIZE: u32 = 48;

/// Symbolic color names understood by the overlay renderer.
///
/// Inline ASS color overrides are mapped onto this fixed set; codes outside
/// the table resolve to `White`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayColor {
    Blue,
    Green,
    Red,
    Yellow,
    Magenta,
    White,
    Black,
}

impl OverlayColor {
    /// Resolve a 6-digit hex code from a `{\1c&H..&}` tag to a color name.
    /// Unknown codes fall back to white.
    pub fn from_hex(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "0000FF" => Self::Blue,
            "00FF00" => Self::Green,
            "FF0000" => Self::Red,
            "FFFF00" => Self::Yellow,
            "FF00FF" => Self::Magenta,
            "FFFFFF" => Self::White,
            "000000" => Self::Black,
            _ => Self::White,
        }
    }

    // @returns: Lowercase color name as the renderer expects it
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Magenta => "magenta",
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for OverlayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Placement anchor for an overlay on the video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPosition {
    #[default]
    Center,
    CenterBottom,
    CenterTop,
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
}

impl fmt::Display for OverlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Center => "center",
            Self::CenterBottom => "center-bottom",
            Self::CenterTop => "center-top",
            Self::LeftTop => "left-top",
            Self::RightTop => "right-top",
            Self::LeftBottom => "left-bottom",
            Self::RightBottom => "right-bottom",
        };
        write!(f, "{}", name)
    }
}

/// One timed, styled caption produced from a dialogue line.
///
/// Descriptors are constructed in a single pass over the script, immutable
/// afterwards, and handed to the overlay renderer in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
    // @field: Caption text, may contain embedded newlines
    pub text: String,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Placement anchor
    pub position: OverlayPosition,

    // @field: Font size in points
    pub font_size: u32,

    // @field: Text color
    pub color: OverlayColor,

    // @field: Optional background box color (not produced by the parser)
    pub bg_color: Option<OverlayColor>,

    // @field: Optional background opacity, 0.0 to 1.0
    pub bg_opacity: Option<f64>,
}

impl OverlayDescriptor {
    pub fn new(text: String, start: f64, end: f64, font_size: u32, color: OverlayColor) -> Self {
        OverlayDescriptor {
            text,
            start,
            end,
            position: OverlayPosition::Center,
            font_size,
            color,
            bg_color: None,
            bg_opacity: None,
        }
    }
}

// @enum: Scanner section state, toggled by section header lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Styles,
    Events,
}

/// Parser for Advanced SubStation Alpha scripts.
///
/// Parsing is permissive: malformed or short style and dialogue lines are
/// skipped silently. The only hard failure is a time field that does not
/// follow the `H:MM:SS.ss` shape, which propagates to the caller.
pub struct AssParser;

impl AssParser {
    /// Parse the full text of an ASS script into overlay descriptors.
    ///
    /// Descriptors come back in the same order as their dialogue lines. The
    /// script-wide default font size is taken from the `Default` entry of the
    /// styles table; scripts without one use the hard fallback.
    pub fn parse_script(content: &str) -> Result<Vec<OverlayDescriptor>> {
        let mut descriptors = Vec::new();
        let mut section = Section::None;
        let mut default_font_size = FALLBACK_FONT_SIZE;

        for line in content.lines() {
            let trimmed = line.trim();

            // Section headers are matched on line prefix only
            if trimmed.starts_with("[V4+ Styles]") {
                section = Section::Styles;
                continue;
            }
            if trimmed.starts_with("[Events]") {
                section = Section::Events;
                continue;
            }

            match section {
                Section::Styles => {
                    if let Some(rest) = trimmed.strip_prefix("Style:") {
                        if let Some(size) = Self::parse_default_style_size(rest) {
                            default_font_size = size;
                        }
                    }
                }
                Section::Events => {
                    if let Some(rest) = trimmed.strip_prefix("Dialogue:") {
                        if let Some(descriptor) =
                            Self::parse_dialogue_line(rest, default_font_size)?
                        {
                            descriptors.push(descriptor);
                        }
                    }
                }
                Section::None => {}
            }
        }

        debug!("Parsed {} overlay descriptor(s) from ASS script", descriptors.len());
        Ok(descriptors)
    }

    /// Pull the font size out of a style definition if it is the Default
    /// style. Returns None for other styles and for unparsable sizes, so the
    /// caller retains the previous default.
    fn parse_default_style_size(style_fields: &str) -> Option<u32> {
        let fields: Vec<&str> = style_fields.split(',').collect();
        if fields.len() < 3 {
            return None;
        }

        if !fields[0].trim().eq_ignore_ascii_case("Default") {
            return None;
        }

        fields[2].trim().parse::<u32>().ok()
    }

    /// Parse one dialogue payload into a descriptor.
    ///
    /// The payload is split into exactly ten comma-separated fields; the
    /// tenth carries the caption text, so embedded commas survive. Lines
    /// with fewer fields yield `Ok(None)` and are skipped.
    fn parse_dialogue_line(
        dialogue_fields: &str,
        default_font_size: u32,
    ) -> Result<Option<OverlayDescriptor>> {
        let fields: Vec<&str> = dialogue_fields.splitn(10, ',').collect();
        if fields.len() < 10 {
            return Ok(None);
        }

        let start = Self::parse_timestamp(fields[1].trim())?;
        let end = Self::parse_timestamp(fields[2].trim())?;

        let (text, color) = Self::extract_color_and_text(fields[9]);

        Ok(Some(OverlayDescriptor::new(
            text,
            start,
            end,
            default_font_size,
            color,
        )))
    }

    /// Parse an ASS timestamp (`H:MM:SS.ss`, hours unpadded) into seconds.
    pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
        let parts: Vec<&str> = timestamp.split(':').collect();
        if parts.len() != 3 {
            return Err(anyhow!("Invalid ASS timestamp format: {}", timestamp));
        }

        let hours: f64 = parts[0]
            .parse()
            .map_err(|_| anyhow!("Failed to parse hours in timestamp: {}", timestamp))?;
        let minutes: f64 = parts[1]
            .parse()
            .map_err(|_| anyhow!("Failed to parse minutes in timestamp: {}", timestamp))?;
        let seconds: f64 = parts[2]
            .parse()
            .map_err(|_| anyhow!("Failed to parse seconds in timestamp: {}", timestamp))?;

        Ok(hours * 3600.0 + minutes * 60.0 + seconds)
    }

    /// Resolve the color of a dialogue text payload and strip its tags.
    ///
    /// Only the first color tag governs the whole line; additional tags are
    /// stripped but ignored. The `\N` line-break escape becomes a real
    /// newline.
    fn extract_color_and_text(payload: &str) -> (String, OverlayColor) {
        let color = COLOR_TAG_REGEX
            .captures(payload)
            .map(|caps| OverlayColor::from_hex(&caps[1]))
            .unwrap_or(OverlayColor::White);

        let stripped = COLOR_TAG_REGEX.replace_all(payload, "");
        let text = stripped
            .replace("{\\1c}", "")
            .replace("\\N", "\n");

        (text, color)
    }
}
