//! Reference data loading.
//!
//! # Usage
//!
//! ```bash
//! fg-cli load ingredients --file data/ingredients.csv
//! fg-cli load tags
//! ```
//!
//! Both commands are idempotent: ingredients that already exist are skipped
//! and default tags are updated in place by slug.

use std::io::Read;
use std::path::Path;

use foodgram_core::{HexColor, Slug};
use foodgram_server::db::{IngredientRepository, RepositoryError, TagRepository};

use super::ConnectError;

/// Tags every installation starts with: `(name, color, slug)`.
const DEFAULT_TAGS: [(&str, &str, &str); 3] = [
    ("Breakfast", "#E26C2D", "breakfast"),
    ("Lunch", "#49B64E", "lunch"),
    ("Dinner", "#8775D2", "dinner"),
];

/// Errors that can occur while loading data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected name,measurement_unit")]
    BadRow { line: u64 },

    #[error("Invalid default tag {0}")]
    BadTag(&'static str),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Parse `name,measurement_unit` rows. Fields are trimmed and blank lines
/// skipped.
pub fn parse_ingredients(reader: impl Read) -> Result<Vec<(String, String)>, LoadError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        match (record.get(0), record.get(1), record.len()) {
            (Some(name), Some(unit), 2) if !name.is_empty() && !unit.is_empty() => {
                rows.push((name.to_owned(), unit.to_owned()));
            }
            (Some(""), None, 1) => {}
            _ => return Err(LoadError::BadRow { line }),
        }
    }
    Ok(rows)
}

/// Load ingredients from a CSV file.
pub async fn ingredients(file: &Path) -> Result<u64, LoadError> {
    let content = tokio::fs::read(file).await.map_err(|source| LoadError::Io {
        path: file.display().to_string(),
        source,
    })?;
    let rows = parse_ingredients(content.as_slice())?;
    tracing::info!(path = %file.display(), rows = rows.len(), "Parsed ingredients");

    let pool = super::connect().await?;
    let inserted = IngredientRepository::new(&pool).insert_many(&rows).await?;

    tracing::info!(
        inserted,
        skipped = u64::try_from(rows.len())
            .unwrap_or(u64::MAX)
            .saturating_sub(inserted),
        "Ingredients loaded"
    );
    Ok(inserted)
}

/// Create or refresh the default tags.
pub async fn tags() -> Result<(), LoadError> {
    let pool = super::connect().await?;
    let repo = TagRepository::new(&pool);

    for (name, color, slug) in DEFAULT_TAGS {
        let color = HexColor::parse(color).map_err(|_| LoadError::BadTag(name))?;
        let slug = Slug::parse(slug).map_err(|_| LoadError::BadTag(name))?;
        let tag = repo.upsert(name, Some(&color), &slug).await?;
        tracing::info!(id = %tag.id, slug = %slug.as_str(), "Tag loaded");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredients_trims_and_skips_blank_lines() {
        let data = "flour, g\n\neggs,pcs\nмука,г\n";
        let rows = parse_ingredients(data.as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                ("flour".to_owned(), "g".to_owned()),
                ("eggs".to_owned(), "pcs".to_owned()),
                ("мука".to_owned(), "г".to_owned()),
            ]
        );
    }

    #[test]
    fn test_parse_ingredients_handles_quoted_commas() {
        let rows = parse_ingredients("\"salt, sea\",g\n".as_bytes()).unwrap();
        assert_eq!(rows, vec![("salt, sea".to_owned(), "g".to_owned())]);
    }

    #[test]
    fn test_parse_ingredients_rejects_short_rows() {
        let err = parse_ingredients("flour,g\nsugar\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::BadRow { line: 2 }));
    }

    #[test]
    fn test_default_tags_are_valid() {
        for (_, color, slug) in DEFAULT_TAGS {
            assert!(HexColor::parse(color).is_ok(), "{color}");
            assert!(Slug::parse(slug).is_ok(), "{slug}");
        }
    }
}
