//! PDF backend for laid-out pages.

use std::io::Cursor;

use printpdf::{Mm, PdfDocument};

use super::RenderError;
use super::layout::{LaidOutPage, PageGeometry};

const LAYER_NAME: &str = "Layer 1";

/// Render laid-out pages into PDF bytes using the given TrueType font.
///
/// The font is embedded, so any script the font covers renders correctly.
///
/// # Errors
///
/// Returns `RenderError::Font` if the font cannot be parsed, or
/// `RenderError::Serialize` if the document cannot be written.
pub fn render(
    title: &str,
    pages: &[LaidOutPage],
    geometry: &PageGeometry,
    font: &[u8],
) -> Result<Vec<u8>, RenderError> {
    let width = Mm(geometry.width_mm);
    let height = Mm(geometry.height_mm);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let font = doc
        .add_external_font(Cursor::new(font))
        .map_err(|e| RenderError::Font(e.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in &page.lines {
            layer.use_text(
                line.text.as_str(),
                line.size_pt,
                Mm(line.x_mm),
                Mm(line.y_mm),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Serialize(e.to_string()))
}
