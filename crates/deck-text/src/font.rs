//! Pluggable font metrics backends.
//!
//! `azul-text-layout` hard-wires a single `ParsedFont` (shaped via
//! `allsorts`) for everything from bounding-box estimation to glyph
//! positioning. This engine only ever needs bounding boxes, so the
//! provider is a small trait: a real TrueType backend for accurate
//! measurement, and a conservative estimator for the fallback path
//! spec §7's `MeasurementUnavailable` handling requires.

use std::sync::Arc;

/// Supplies per-character advance widths at a given font size. Wrapping
/// math in `crate::wrap` is expressed purely in terms of this trait so
/// it never depends on a specific font backend.
pub trait FontMetricsProvider: Send + Sync {
    /// Advance width, in points, of `ch` rendered at `font_size_pt`.
    fn char_advance(&self, ch: char, font_size_pt: f32) -> f32;

    /// A short, stable name used in cache keys and log messages.
    fn name(&self) -> &str;
}

/// Real glyph metrics read from an embedded/loaded TrueType font via
/// `ttf-parser`. Lighter-weight than full OpenType shaping (no
/// cmap-driven glyph substitution, no kerning) since bounding-box
/// estimation only needs per-glyph advance widths.
///
/// The raw font bytes are kept and re-parsed (a cheap, zero-copy table
/// walk, not a full font compile) on every lookup rather than storing
/// a borrowing `ttf_parser::Face` alongside its own backing buffer,
/// which would require a self-referential struct.
pub struct TtfFontMetricsProvider {
    name: String,
    font_bytes: Vec<u8>,
    units_per_em: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontLoadError {
    #[error("font data could not be parsed: {0}")]
    Parse(String),
    #[error("font has zero units-per-em, cannot scale metrics")]
    ZeroUnitsPerEm,
}

impl TtfFontMetricsProvider {
    /// Parses `font_bytes` (the first font in the file, as per
    /// `ttf_parser::Face::parse(data, 0)`) to validate it and capture
    /// `units_per_em` up front, so construction fails fast on garbage
    /// input instead of failing later during measurement.
    pub fn from_bytes(font_bytes: &[u8], name: impl Into<String>) -> Result<Self, FontLoadError> {
        let face = ttf_parser::Face::parse(font_bytes, 0)
            .map_err(|e| FontLoadError::Parse(format!("{e:?}")))?;

        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return Err(FontLoadError::ZeroUnitsPerEm);
        }

        Ok(Self {
            name: name.into(),
            font_bytes: font_bytes.to_vec(),
            units_per_em,
        })
    }

    fn face(&self) -> ttf_parser::Face<'_> {
        ttf_parser::Face::parse(&self.font_bytes, 0)
            .expect("font bytes were validated in from_bytes")
    }
}

impl FontMetricsProvider for TtfFontMetricsProvider {
    fn char_advance(&self, ch: char, font_size_pt: f32) -> f32 {
        let face = self.face();
        let units = face
            .glyph_index(ch)
            .and_then(|g| face.glyph_hor_advance(g))
            .unwrap_or((self.units_per_em * 0.5) as u16) as f32;
        (units / self.units_per_em) * font_size_pt
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fallback estimator used when no real font is available (spec §7:
/// "Falls back to a conservative monospaced estimator and logs a
/// warning; never fatal"). Every character, including whitespace, is
/// charged the same fraction of the font size, deliberately
/// overestimating narrow glyphs so text never measures as *narrower*
/// than it would actually render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservativeMonospaceMetrics {
    pub width_ratio: f32,
}

impl Default for ConservativeMonospaceMetrics {
    fn default() -> Self {
        Self { width_ratio: 0.6 }
    }
}

impl FontMetricsProvider for ConservativeMonospaceMetrics {
    fn char_advance(&self, _ch: char, font_size_pt: f32) -> f32 {
        font_size_pt * self.width_ratio
    }

    fn name(&self) -> &str {
        "conservative-monospace"
    }
}

/// Loads `font_bytes` into a `TtfFontMetricsProvider`, logging and
/// falling back to `ConservativeMonospaceMetrics` on failure rather
/// than propagating an error — the `MeasurementUnavailable` policy
/// from spec §7 applies at the point of font loading, not at every
/// subsequent measurement call.
pub fn load_or_fallback(font_bytes: &[u8], name: &str) -> Arc<dyn FontMetricsProvider> {
    match TtfFontMetricsProvider::from_bytes(font_bytes, name) {
        Ok(provider) => Arc::new(provider),
        Err(err) => {
            log::warn!(
                "font '{name}' unavailable ({err}), falling back to conservative monospace metrics"
            );
            Arc::new(ConservativeMonospaceMetrics::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conservative_metrics_scale_with_font_size() {
        let m = ConservativeMonospaceMetrics::default();
        assert!((m.char_advance('x', 10.0) - 6.0).abs() < 1e-6);
        assert!((m.char_advance('x', 20.0) - 12.0).abs() < 1e-6);
    }

    #[test]
    fn invalid_font_bytes_fall_back_without_panicking() {
        let provider = load_or_fallback(b"not a font", "broken");
        assert_eq!(provider.name(), "conservative-monospace");
    }
}
