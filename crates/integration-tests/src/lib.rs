//! Integration tests for Foodgram.
//!
//! # Running Tests
//!
//! ```bash
//! # Point the tests at a scratch database; migrations run automatically
//! export FOODGRAM_TEST_DATABASE_URL=postgres://localhost/foodgram_test
//!
//! # Run integration tests
//! cargo test -p foodgram-integration-tests -- --ignored
//! ```
//!
//! Every test creates its own users, ingredients and tags with unique names,
//! so tests can share one database and run in parallel.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use foodgram_core::{Email, IngredientId, RecipeId, Slug, TagId, UserId, Username};
use foodgram_server::db::{IngredientRepository, TagRepository, UserRepository};
use foodgram_server::models::{NewUser, User};
use foodgram_server::services::recipes::{IngredientAmount, RecipeForm, RecipeService};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// A 1x1 transparent GIF as a data URL.
pub const TINY_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

/// Decoded size limit used by [`TestContext::recipes`].
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Connection to the test database plus fixture builders.
pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to `FOODGRAM_TEST_DATABASE_URL` and apply migrations.
    pub async fn new() -> Self {
        let url = std::env::var("FOODGRAM_TEST_DATABASE_URL")
            .expect("FOODGRAM_TEST_DATABASE_URL must be set for integration tests");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .expect("Failed to connect to test database");
        sqlx::migrate!("../server/migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        Self { pool }
    }

    /// Recipe service over the test pool.
    #[must_use]
    pub const fn recipes(&self) -> RecipeService<'_> {
        RecipeService::new(&self.pool, MAX_IMAGE_BYTES)
    }

    /// Create a user with a unique username.
    pub async fn user(&self) -> User {
        let suffix = unique();
        let new_user = NewUser::new(
            Email::parse(&format!("cook-{suffix}@example.com")).unwrap(),
            Username::parse(&format!("cook-{suffix}")).unwrap(),
            "Test",
            "Cook",
        )
        .unwrap();
        UserRepository::new(&self.pool).create(&new_user).await.unwrap()
    }

    /// Create an ingredient named `{name} {unique}` and return its ID.
    pub async fn ingredient(&self, name: &str, unit: &str) -> IngredientId {
        let name = format!("{name} {}", unique());
        self.ingredient_exact(&name, unit).await
    }

    /// Create (or reuse) an ingredient with exactly this name and unit.
    pub async fn ingredient_exact(&self, name: &str, unit: &str) -> IngredientId {
        IngredientRepository::new(&self.pool)
            .insert_many(&[(name.to_owned(), unit.to_owned())])
            .await
            .unwrap();
        sqlx::query_scalar::<_, IngredientId>(
            "SELECT id FROM foodgram.ingredient WHERE name = $1 AND measurement_unit = $2",
        )
        .bind(name)
        .bind(unit)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }

    /// Create a tag with a unique slug.
    pub async fn tag(&self) -> TagId {
        let slug = Slug::parse(&format!("tag-{}", unique())).unwrap();
        TagRepository::new(&self.pool)
            .upsert("Test tag", None, &slug)
            .await
            .unwrap()
            .id
    }

    /// Publish a recipe by `author` with the given lines.
    pub async fn recipe(&self, author: UserId, lines: &[(IngredientId, i64)]) -> RecipeId {
        let form = form(self.tag().await, lines);
        self.recipes().create(author, &form).await.unwrap().id
    }
}

/// A valid recipe form with one tag and an image.
#[must_use]
pub fn form(tag: TagId, lines: &[(IngredientId, i64)]) -> RecipeForm {
    RecipeForm {
        ingredients: lines
            .iter()
            .map(|&(id, amount)| IngredientAmount { id, amount })
            .collect(),
        tags: vec![tag],
        image: Some(TINY_GIF.to_owned()),
        name: "Test recipe".to_owned(),
        text: "Mix and serve.".to_owned(),
        cooking_time: 10,
    }
}

/// Short unique suffix for fixture names.
#[must_use]
pub fn unique() -> String {
    Uuid::new_v4().simple().to_string().chars().take(12).collect()
}
