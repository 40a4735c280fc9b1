//! Shopping list aggregation and export against a real database.
//!
//! Run with: cargo test -p foodgram-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use foodgram_integration_tests::{TestContext, unique};
use foodgram_server::db::{RecipeList, RecipeListRepository, RepositoryError};
use foodgram_server::models::AggregatedLine;
use foodgram_server::services::shopping_list::{FILENAME, FontFile, ShoppingListService};

fn line(name: &str, unit: &str, total_amount: i64) -> AggregatedLine {
    AggregatedLine {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
        total_amount,
    }
}

async fn cart_add(ctx: &TestContext, user: foodgram_core::UserId, recipe: foodgram_core::RecipeId) {
    RecipeListRepository::new(&ctx.pool, RecipeList::ShoppingCart)
        .add(user, recipe)
        .await
        .unwrap();
}

async fn aggregate(ctx: &TestContext, user: foodgram_core::UserId) -> Vec<AggregatedLine> {
    let font = FontFile::bundled();
    ShoppingListService::new(&ctx.pool, &font)
        .aggregate(user)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_amounts_are_summed_across_recipes() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let suffix = unique();
    let eggs = ctx.ingredient_exact(&format!("eggs {suffix}"), "pcs").await;
    let flour = ctx.ingredient_exact(&format!("flour {suffix}"), "g").await;

    let omelette = ctx.recipe(author.id, &[(eggs, 3)]).await;
    let pancakes = ctx.recipe(author.id, &[(eggs, 2), (flour, 200)]).await;
    cart_add(&ctx, shopper.id, omelette).await;
    cart_add(&ctx, shopper.id, pancakes).await;

    assert_eq!(
        aggregate(&ctx, shopper.id).await,
        vec![
            line(&format!("eggs {suffix}"), "pcs", 5),
            line(&format!("flour {suffix}"), "g", 200),
        ]
    );
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_empty_cart_aggregates_to_nothing() {
    let ctx = TestContext::new().await;
    let shopper = ctx.user().await;
    assert!(aggregate(&ctx, shopper.id).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_same_name_different_units_stay_separate() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let name = format!("sugar {}", unique());
    let grams = ctx.ingredient_exact(&name, "g").await;
    let spoons = ctx.ingredient_exact(&name, "tbsp").await;

    let cake = ctx.recipe(author.id, &[(grams, 100), (spoons, 2)]).await;
    let tea = ctx.recipe(author.id, &[(spoons, 1)]).await;
    cart_add(&ctx, shopper.id, cake).await;
    cart_add(&ctx, shopper.id, tea).await;

    assert_eq!(
        aggregate(&ctx, shopper.id).await,
        vec![line(&name, "g", 100), line(&name, "tbsp", 3)]
    );
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_only_cart_recipes_of_the_user_count() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let neighbour = ctx.user().await;
    let milk = ctx.ingredient("milk", "ml").await;

    let in_cart = ctx.recipe(author.id, &[(milk, 250)]).await;
    let favorite_only = ctx.recipe(author.id, &[(milk, 1000)]).await;
    let elsewhere = ctx.recipe(author.id, &[(milk, 500)]).await;

    cart_add(&ctx, shopper.id, in_cart).await;
    RecipeListRepository::new(&ctx.pool, RecipeList::Favorites)
        .add(shopper.id, favorite_only)
        .await
        .unwrap();
    cart_add(&ctx, neighbour.id, elsewhere).await;

    let lines = aggregate(&ctx, shopper.id).await;
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].total_amount, 250);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_aggregation_is_deterministic() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let ids = [
        ctx.ingredient("zucchini", "pcs").await,
        ctx.ingredient("apple", "pcs").await,
        ctx.ingredient("mint", "g").await,
    ];
    let salad = ctx
        .recipe(author.id, &[(ids[0], 1), (ids[1], 2), (ids[2], 5)])
        .await;
    cart_add(&ctx, shopper.id, salad).await;

    let first = aggregate(&ctx, shopper.id).await;
    let second = aggregate(&ctx, shopper.id).await;
    assert_eq!(first, second);

    let names: Vec<&str> = first.iter().map(|l| l.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_recipe_can_be_in_cart_once() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let salt = ctx.ingredient("salt", "g").await;
    let soup = ctx.recipe(author.id, &[(salt, 5)]).await;

    let cart = RecipeListRepository::new(&ctx.pool, RecipeList::ShoppingCart);
    cart.add(shopper.id, soup).await.unwrap();
    let err = cart.add(shopper.id, soup).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    // Still counted once
    assert_eq!(aggregate(&ctx, shopper.id).await[0].total_amount, 5);

    assert!(cart.remove(shopper.id, soup).await.unwrap());
    assert!(!cart.remove(shopper.id, soup).await.unwrap());
    assert!(aggregate(&ctx, shopper.id).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_export_produces_pdf_attachment() {
    let font = FontFile::bundled();
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let rice = ctx.ingredient("рис", "г").await;
    let pilaf = ctx.recipe(author.id, &[(rice, 300)]).await;
    cart_add(&ctx, shopper.id, pilaf).await;

    let document = ShoppingListService::new(&ctx.pool, &font)
        .export(shopper.id)
        .await
        .unwrap();
    assert_eq!(document.filename, FILENAME);
    assert_eq!(document.line_count, 1);
    assert!(document.bytes.starts_with(b"%PDF"));

    // An empty cart still yields a document
    let empty = ShoppingListService::new(&ctx.pool, &font)
        .export(author.id)
        .await
        .unwrap();
    assert_eq!(empty.line_count, 0);
    assert!(empty.bytes.starts_with(b"%PDF"));
}
