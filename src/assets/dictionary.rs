//! Glyph dictionary: single characters mapped to outline paths authored in a
//! 100x100 unit square.

use std::collections::BTreeMap;

use crate::foundation::core::{BezPath, Point, Quad};
use crate::foundation::error::{QuadmorphError, QuadmorphResult};
use crate::render::path::parse_svg_path;

/// Side length of the square glyph outlines are authored in.
pub const GLYPH_UNIT: f64 = 100.0;

/// Source quad every glyph is warped from.
pub fn glyph_source_quad() -> Quad {
    Quad::from_rect(kurbo::Rect::new(0.0, 0.0, GLYPH_UNIT, GLYPH_UNIT))
}

const METADATA_KEYS: [&str; 2] = ["description", "unitSize"];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Named reference corners an outline was drawn against.
pub struct GuidePoints {
    /// Top-left corner, in glyph units.
    #[serde(rename = "TL")]
    pub tl: [f64; 2],
    /// Top-right corner.
    #[serde(rename = "TR")]
    pub tr: [f64; 2],
    /// Bottom-right corner.
    #[serde(rename = "BR")]
    pub br: [f64; 2],
    /// Bottom-left corner.
    #[serde(rename = "BL")]
    pub bl: [f64; 2],
    /// Center point; informational only.
    #[serde(rename = "Center")]
    pub center: [f64; 2],
}

impl Default for GuidePoints {
    fn default() -> Self {
        Self {
            tl: [10.0, 10.0],
            tr: [90.0, 10.0],
            br: [90.0, 90.0],
            bl: [10.0, 90.0],
            center: [50.0, 50.0],
        }
    }
}

impl GuidePoints {
    /// The four corners as a [`Quad`], clockwise from top-left.
    pub fn quad(&self) -> Quad {
        let p = |v: [f64; 2]| Point::new(v[0], v[1]);
        Quad::new(p(self.tl), p(self.tr), p(self.br), p(self.bl))
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One dictionary entry as stored on disk.
pub struct GlyphEntry {
    /// Corners the outline was drawn against.
    #[serde(default)]
    pub guide_points: GuidePoints,
    /// SVG path data in the 100-unit glyph square.
    #[serde(default)]
    pub svg_path_d: String,
}

#[derive(Clone, Debug)]
struct Glyph {
    entry: GlyphEntry,
    outline: Option<BezPath>,
}

impl Glyph {
    fn new(ch: char, entry: GlyphEntry) -> Self {
        let d = entry.svg_path_d.trim();
        let outline = if d.is_empty() {
            None
        } else {
            match parse_svg_path(d) {
                Ok(p) if !p.elements().is_empty() => Some(p),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(glyph = %ch, error = %e, "glyph outline ignored");
                    None
                }
            }
        };
        Self { entry, outline }
    }
}

/// Character-keyed glyph outlines, parsed once on load.
#[derive(Clone, Debug, Default)]
pub struct GlyphDictionary {
    glyphs: BTreeMap<char, Glyph>,
}

impl GlyphDictionary {
    /// An empty dictionary; every character renders as nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary file. Metadata keys are skipped and missing digits are
    /// back-filled with empty entries.
    #[tracing::instrument(skip(json), fields(len = json.len()))]
    pub fn from_json_str(json: &str) -> QuadmorphResult<Self> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| QuadmorphError::serde(format!("glyph dictionary: {e}")))?;

        let mut dict = Self::new();
        for (key, value) in raw {
            if METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                tracing::debug!(key = %key, "skipping non single-character dictionary key");
                continue;
            };
            let entry: GlyphEntry = serde_json::from_value(value)
                .map_err(|e| QuadmorphError::serde(format!("glyph '{key}': {e}")))?;
            dict.insert(ch, entry);
        }

        if dict.glyphs.is_empty() {
            return Err(QuadmorphError::validation(
                "glyph dictionary contains no letter definitions",
            ));
        }
        dict.backfill_digits();
        tracing::debug!(glyphs = dict.len(), "glyph dictionary loaded");
        Ok(dict)
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, ch: char, entry: GlyphEntry) {
        self.glyphs.insert(ch, Glyph::new(ch, entry));
    }

    fn backfill_digits(&mut self) {
        for d in '0'..='9' {
            self.glyphs
                .entry(d)
                .or_insert_with(|| Glyph::new(d, GlyphEntry::default()));
        }
    }

    /// Drawable outline for `ch`; `None` when the character is unknown or its path is empty.
    pub fn outline(&self, ch: char) -> Option<&BezPath> {
        self.glyphs.get(&ch).and_then(|g| g.outline.as_ref())
    }

    /// The stored entry for `ch`, outline or not.
    pub fn entry(&self, ch: char) -> Option<&GlyphEntry> {
        self.glyphs.get(&ch).map(|g| &g.entry)
    }

    /// Whether `ch` has an entry.
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Number of entries, back-filled digits included.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// No entries at all.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/dictionary.rs"]
mod tests;
