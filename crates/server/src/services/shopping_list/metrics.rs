//! Horizontal text metrics read from the embedded font.

use ttf_parser::{Face, GlyphId};

use super::RenderError;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Glyph advance widths of a parsed TrueType font.
pub struct FontMetrics<'a> {
    face: Face<'a>,
}

impl<'a> FontMetrics<'a> {
    /// Parse the first face of a TrueType font.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Font` if the bytes are not a usable font.
    pub fn parse(font: &'a [u8]) -> Result<Self, RenderError> {
        Face::parse(font, 0)
            .map(|face| Self { face })
            .map_err(|e| RenderError::Font(e.to_string()))
    }

    /// Width of `text` set at `size_pt`, in millimetres.
    ///
    /// Characters the font lacks are measured as its missing-glyph box,
    /// which is what the PDF viewer draws for them.
    #[must_use]
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let units: f32 = text
            .chars()
            .map(|ch| {
                let glyph = self.face.glyph_index(ch).unwrap_or(GlyphId(0));
                f32::from(self.face.glyph_hor_advance(glyph).unwrap_or(0))
            })
            .sum();
        units / f32::from(self.face.units_per_em()) * size_pt * MM_PER_PT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::shopping_list::BUNDLED_FONT;

    #[test]
    fn test_width_follows_glyph_advances() {
        let metrics = FontMetrics::parse(BUNDLED_FONT).unwrap();
        assert!(metrics.text_width_mm("", 12.0).abs() < f32::EPSILON);
        assert!(metrics.text_width_mm("WWWW", 12.0) > metrics.text_width_mm("iiii", 12.0));
        assert!(metrics.text_width_mm("мука", 12.0) > 0.0);

        let small = metrics.text_width_mm("flour", 10.0);
        let large = metrics.text_width_mm("flour", 20.0);
        assert!((large - 2.0 * small).abs() < 0.001);
    }

    #[test]
    fn test_unknown_characters_still_take_space() {
        let metrics = FontMetrics::parse(BUNDLED_FONT).unwrap();
        // Private use area; DejaVu Sans has no glyph here
        assert!(metrics.text_width_mm("\u{F8FF}", 12.0) > 0.0);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            FontMetrics::parse(b"not a font"),
            Err(RenderError::Font(_))
        ));
    }
}
