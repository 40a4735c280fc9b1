//! Page layout for the shopping list document.
//!
//! Pure positioning, independent of the PDF backend. Coordinates are in
//! millimetres from the bottom-left corner of the page, which is what PDF
//! uses. Text widths come from a caller-supplied measure, so layout can be
//! tested without a font.

/// Page size, margins and type sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub title_size_pt: f32,
    pub body_size_pt: f32,
    /// Vertical distance between consecutive body lines.
    pub line_height_mm: f32,
    /// Vertical distance between the title and the first body line.
    pub title_gap_mm: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            title_size_pt: 18.0,
            body_size_pt: 12.0,
            line_height_mm: 7.0,
            title_gap_mm: 12.0,
        }
    }
}

impl PageGeometry {
    /// Width available to text between the side margins.
    #[must_use]
    pub fn text_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }
}

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_pt: f32,
}

/// Everything placed on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

/// Break `text` into lines no wider than `max_width_mm`.
///
/// Breaks at whitespace where possible. A word wider than a whole line is
/// split between characters. Always returns at least one line.
#[must_use]
pub fn wrap(text: &str, max_width_mm: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) <= max_width_mm {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure(word) <= max_width_mm {
            current = word.to_owned();
            continue;
        }
        for ch in word.chars() {
            current.push(ch);
            // A single character always fits, however narrow the page
            if measure(&current) > max_width_mm && current.chars().nth(1).is_some() {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out a title and body rows over as many pages as needed.
///
/// The title goes on the first page only. Rows wider than the page are
/// wrapped onto continuation lines. A line moves to a new page when its
/// baseline would fall below the bottom margin. At least one page is always
/// returned, so an empty list still renders as a valid document.
///
/// `measure` gives the width in millimetres of a string at a point size.
#[must_use]
pub fn paginate(
    title: &str,
    rows: &[String],
    geometry: &PageGeometry,
    measure: impl Fn(&str, f32) -> f32,
) -> Vec<LaidOutPage> {
    let top = geometry.height_mm - geometry.margin_mm;
    let x = geometry.margin_mm;
    let max_width = geometry.text_width_mm();

    let mut pages = Vec::new();
    let mut current = LaidOutPage {
        lines: vec![PlacedLine {
            text: title.to_owned(),
            x_mm: x,
            y_mm: top,
            size_pt: geometry.title_size_pt,
        }],
    };
    let mut y = top - geometry.title_gap_mm;

    for row in rows {
        for text in wrap(row, max_width, |s| measure(s, geometry.body_size_pt)) {
            if y < geometry.margin_mm {
                pages.push(std::mem::take(&mut current));
                y = top;
            }
            current.lines.push(PlacedLine {
                text,
                x_mm: x,
                y_mm: y,
                size_pt: geometry.body_size_pt,
            });
            y -= geometry.line_height_mm;
        }
    }

    pages.push(current);
    pages
}
