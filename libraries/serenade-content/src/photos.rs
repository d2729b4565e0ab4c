//! Polaroid photo frames
//!
//! The manifest comes in two shapes:
//! - a flat array of frames, each with an optional absolute `y` or `offsetY`
//! - an object `{ "baseY": 100, "items": [...] }` where `offsetY` is relative to `baseY`
//!
//! Both are decoded at the boundary and normalized into [`PhotoFrame`]s.

use crate::error::{ContentError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// A CSS length/angle given either as a bare number or as a string ("12%", "-4deg")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl CssValue {
    /// Zero and the empty string count as "not set"
    fn is_set(&self) -> bool {
        match self {
            CssValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CssValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Number(n) => write!(f, "{}", n),
            CssValue::Text(s) => f.write_str(s),
        }
    }
}

/// Manifest as it appears on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PhotoManifest {
    Flat(Vec<Value>),
    Anchored {
        #[serde(rename = "baseY", default)]
        base_y: f64,
        items: Vec<Value>,
    },
}

/// One manifest entry; only a missing `src` disqualifies it
///
/// Every field takes any JSON value. Numbers and strings are kept, anything
/// else reads as absent.
#[derive(Debug, Deserialize)]
struct RawPhoto {
    #[serde(default, deserialize_with = "loose_css")]
    src: Option<CssValue>,
    #[serde(default, deserialize_with = "loose_css")]
    x: Option<CssValue>,
    #[serde(default, deserialize_with = "loose_css")]
    dy: Option<CssValue>,
    #[serde(default, deserialize_with = "loose_css")]
    rot: Option<CssValue>,
    #[serde(default, deserialize_with = "loose_css")]
    alt: Option<CssValue>,
    #[serde(default, deserialize_with = "loose_css")]
    caption: Option<CssValue>,
    #[serde(default, deserialize_with = "loose_number")]
    y: Option<f64>,
    #[serde(rename = "offsetY", default, deserialize_with = "loose_number")]
    offset_y: Option<f64>,
}

fn loose_css<'de, D>(deserializer: D) -> std::result::Result<Option<CssValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map(CssValue::Number),
        Value::String(s) => Some(CssValue::Text(s)),
        _ => None,
    })
}

/// Numbers, or strings holding a number ("120")
fn loose_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Text for alt/caption; unset values render as nothing
fn display_text(value: Option<CssValue>) -> String {
    value
        .filter(CssValue::is_set)
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// One normalized frame, ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoFrame {
    pub src: String,
    /// Horizontal position (`--x`), defaults to `0`
    pub x: CssValue,
    /// Vertical nudge (`--dy`)
    pub dy: Option<CssValue>,
    /// Tilt (`--rot`)
    pub rot: Option<CssValue>,
    pub alt: String,
    pub caption: String,
    /// Absolute top in pixels, when the manifest places the frame
    pub top: Option<f64>,
}

impl PhotoFrame {
    fn from_raw(raw: RawPhoto, base_y: Option<f64>) -> Option<Self> {
        let src = raw.src.filter(CssValue::is_set)?.to_string();

        // Absolute `y` wins; `offsetY` is relative to `baseY` when there is one
        let top = match (raw.y, base_y) {
            (Some(y), _) => Some(y),
            (None, Some(base)) => Some(base + raw.offset_y.unwrap_or(0.0)),
            (None, None) => raw.offset_y,
        };

        Some(Self {
            src,
            x: raw
                .x
                .filter(CssValue::is_set)
                .unwrap_or_else(|| CssValue::Text("0".to_string())),
            dy: raw.dy.filter(CssValue::is_set),
            rot: raw.rot.filter(CssValue::is_set),
            alt: display_text(raw.alt),
            caption: display_text(raw.caption),
            top,
        })
    }

    /// Inline style with the CSS custom properties the stylesheet reads
    pub fn style(&self) -> String {
        let mut style = format!("--x: {}", self.x);
        if let Some(dy) = &self.dy {
            style.push_str(&format!("; --dy: {}", dy));
        }
        if let Some(rot) = &self.rot {
            style.push_str(&format!("; --rot: {}", rot));
        }
        if let Some(top) = self.top {
            style.push_str(&format!("; top: {}px", top));
        }
        style
    }

    /// `<figure class="polaroid">` markup with all text escaped
    pub fn to_html(&self) -> String {
        format!(
            "<figure class=\"polaroid\" style=\"{}\">\n  <img src=\"{}\" alt=\"{}\" loading=\"lazy\" />\n  <figcaption>{}</figcaption>\n</figure>",
            escape_html(&self.style()),
            escape_html(&self.src),
            escape_html(&self.alt),
            escape_html(&self.caption),
        )
    }
}

/// Parse a manifest, failing on an unaccepted shape
///
/// Individual entries without a `src` (or that are not objects) are skipped.
pub fn parse_photo_manifest(json: &str) -> Result<Vec<PhotoFrame>> {
    let manifest: PhotoManifest = serde_json::from_str(json).map_err(|e| {
        ContentError::InvalidManifest(format!("expected an array or {{baseY, items}}: {}", e))
    })?;

    let (items, base_y) = match manifest {
        PhotoManifest::Flat(items) => (items, None),
        PhotoManifest::Anchored { base_y, items } => (items, Some(base_y)),
    };

    let frames: Vec<PhotoFrame> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawPhoto>(item) {
            Ok(raw) => PhotoFrame::from_raw(raw, base_y),
            Err(e) => {
                debug!("Skipping malformed photo entry: {}", e);
                None
            }
        })
        .collect();

    debug!("Parsed {} photo frames", frames.len());
    Ok(frames)
}

/// Parse a manifest; any failure is logged and yields no frames
pub fn load_photo_frames(json: &str) -> Vec<PhotoFrame> {
    parse_photo_manifest(json).unwrap_or_else(|e| {
        warn!("Polaroid load failed: {}", e);
        Vec::new()
    })
}

/// Read and parse a manifest file
pub fn parse_photo_manifest_from_path(path: impl AsRef<Path>) -> Result<Vec<PhotoFrame>> {
    let json = std::fs::read_to_string(path)?;
    parse_photo_manifest(&json)
}

/// Read and parse a manifest file; any failure is logged and yields no frames
pub fn load_photo_frames_from_path(path: impl AsRef<Path>) -> Vec<PhotoFrame> {
    let path = path.as_ref();
    parse_photo_manifest_from_path(path).unwrap_or_else(|e| {
        warn!("Polaroid load failed for {:?}: {}", path, e);
        Vec::new()
    })
}

/// Render all frames as one fragment for the polaroid cluster
pub fn render_cluster(frames: &[PhotoFrame]) -> String {
    frames
        .iter()
        .map(PhotoFrame::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
