//! Shopping list export.
//!
//! Aggregates the ingredients of every recipe in a user's cart and renders
//! them into a downloadable PDF, one `name (unit) - amount` line per
//! ingredient. The pipeline is a single pass per request: aggregate, lay
//! out, render. Aggregations are never cached. The font is read once at
//! startup and shared.

pub mod layout;
mod metrics;
mod pdf;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use foodgram_core::UserId;

use crate::db::{RepositoryError, ShoppingListRepository};
use crate::models::AggregatedLine;

pub use layout::{LaidOutPage, PageGeometry, PlacedLine, paginate, wrap};
pub use metrics::FontMetrics;

/// Download name of the exported document.
pub const FILENAME: &str = "shopping_list.pdf";

/// Heading on the first page.
pub const TITLE: &str = "Shopping list";

/// DejaVu Sans, compiled in so exports work without any font on the host.
pub const BUNDLED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));

/// Errors that can occur while rendering the document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font file {} could not be read: {source}", path.display())]
    FontMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font could not be loaded: {0}")]
    Font(String),

    #[error("document could not be written: {0}")]
    Serialize(String),
}

/// Errors that can occur during an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("render failure: {0}")]
    Render(#[from] RenderError),
}

/// TrueType font embedded into exports, held in memory and shared.
#[derive(Clone)]
pub struct FontFile {
    bytes: Arc<[u8]>,
}

impl FontFile {
    /// The font compiled into the binary.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            bytes: Arc::from(BUNDLED_FONT),
        }
    }

    /// Read and check a font file.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::FontMissing` if the file cannot be read, or
    /// `RenderError::Font` if it is not a usable TrueType font.
    pub async fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| RenderError::FontMissing {
                path: path.to_path_buf(),
                source,
            })?;
        FontMetrics::parse(&bytes)?;
        Ok(Self {
            bytes: Arc::from(bytes),
        })
    }

    /// The configured override if there is one, otherwise the bundled font.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the override cannot be loaded.
    pub async fn from_config(path: Option<&Path>) -> Result<Self, RenderError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::bundled()),
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for FontFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFile")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A rendered export ready to be sent.
#[derive(Debug, Clone)]
pub struct ShoppingListDocument {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
    /// Number of aggregated ingredient lines in the document.
    pub line_count: usize,
}

/// Render aggregated lines into PDF bytes.
///
/// # Errors
///
/// Returns a [`RenderError`] if the font cannot be embedded or the document
/// cannot be written.
pub fn render_document(
    lines: &[AggregatedLine],
    geometry: &PageGeometry,
    font: &[u8],
) -> Result<Vec<u8>, RenderError> {
    let metrics = FontMetrics::parse(font)?;
    let rows: Vec<String> = lines.iter().map(ToString::to_string).collect();
    let pages = paginate(TITLE, &rows, geometry, |text, size| {
        metrics.text_width_mm(text, size)
    });
    pdf::render(TITLE, &pages, geometry, font)
}

/// Shopping list export service.
pub struct ShoppingListService<'a> {
    lists: ShoppingListRepository<'a>,
    font: &'a FontFile,
    geometry: PageGeometry,
}

impl<'a> ShoppingListService<'a> {
    /// Create a new export service using A4 pages.
    #[must_use]
    pub fn new(pool: &'a PgPool, font: &'a FontFile) -> Self {
        Self {
            lists: ShoppingListRepository::new(pool),
            font,
            geometry: PageGeometry::default(),
        }
    }

    /// Aggregate the user's cart without rendering it.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Repository` if the query fails.
    pub async fn aggregate(&self, user: UserId) -> Result<Vec<AggregatedLine>, ExportError> {
        Ok(self.lists.aggregate(user).await?)
    }

    /// Aggregate the user's cart and render it. An empty cart produces a
    /// document with just the title.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Repository` if aggregation fails, or
    /// `ExportError::Render` if the document cannot be rendered.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn export(&self, user: UserId) -> Result<ShoppingListDocument, ExportError> {
        let lines = self.aggregate(user).await?;
        let bytes = render_document(&lines, &self.geometry, self.font.bytes())?;

        tracing::info!(lines = lines.len(), bytes = bytes.len(), "Shopping list exported");

        Ok(ShoppingListDocument {
            filename: FILENAME,
            bytes,
            line_count: lines.len(),
        })
    }
}
