//! Recipe authoring, listing and cascade rules against a real database.
//!
//! Run with: cargo test -p foodgram-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use foodgram_core::Slug;
use foodgram_integration_tests::{TestContext, form};
use foodgram_server::db::{
    FollowRepository, PageRequest, RecipeList, RecipeListRepository, RecipeRepository,
    ShoppingListRepository, TagRepository,
};
use foodgram_server::models::RecipeFilter;
use foodgram_server::services::recipes::RecipeError;

const FIRST_PAGE: PageRequest = PageRequest {
    limit: 50,
    offset: 0,
};

#[tokio::test]
#[ignore = "Requires database"]
async fn test_create_stores_lines_tags_and_image() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let oats = ctx.ingredient("oats", "g").await;
    let tag = ctx.tag().await;

    let recipe = ctx
        .recipes()
        .create(author.id, &form(tag, &[(oats, 80)]))
        .await
        .unwrap();
    assert!(recipe.has_image);

    let card = ctx.recipes().card(Some(author.id), recipe.id).await.unwrap();
    assert_eq!(card.author.id, author.id);
    assert_eq!(card.tags.len(), 1);
    assert_eq!(card.tags[0].id, tag);
    assert_eq!(card.ingredients.len(), 1);
    assert_eq!(card.ingredients[0].ingredient.id, oats);
    assert_eq!(card.ingredients[0].amount.get(), 80);
    assert!(!card.is_favorited);
    assert!(!card.is_in_shopping_cart);

    let image = RecipeRepository::new(&ctx.pool)
        .image(recipe.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(image.content_type, "image/gif");
    assert!(image.bytes.starts_with(b"GIF89a"));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_unknown_references_are_rejected() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let oats = ctx.ingredient("oats", "g").await;
    let tag = ctx.tag().await;

    let mut unknown_ingredient = form(tag, &[(oats, 80)]);
    unknown_ingredient.ingredients[0].id = foodgram_core::IngredientId::new(i32::MAX);
    assert!(matches!(
        ctx.recipes().create(author.id, &unknown_ingredient).await,
        Err(RecipeError::UnknownIngredient)
    ));

    let mut unknown_tag = form(tag, &[(oats, 80)]);
    unknown_tag.tags = vec![foodgram_core::TagId::new(i32::MAX)];
    assert!(matches!(
        ctx.recipes().create(author.id, &unknown_tag).await,
        Err(RecipeError::UnknownTag)
    ));

    let mut without_image = form(tag, &[(oats, 80)]);
    without_image.image = None;
    assert!(matches!(
        ctx.recipes().create(author.id, &without_image).await,
        Err(RecipeError::MissingImage)
    ));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_update_replaces_lines_and_changes_cart_totals() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let butter = ctx.ingredient("butter", "g").await;
    let jam = ctx.ingredient("jam", "g").await;
    let tag = ctx.tag().await;

    let toast = ctx.recipe(author.id, &[(butter, 10)]).await;
    RecipeListRepository::new(&ctx.pool, RecipeList::ShoppingCart)
        .add(shopper.id, toast)
        .await
        .unwrap();

    // No image on update keeps the stored one
    let mut edit = form(tag, &[(jam, 30)]);
    edit.image = None;
    edit.name = "Jam toast".to_owned();
    let updated = ctx.recipes().update(author.id, toast, &edit).await.unwrap();
    assert_eq!(updated.name, "Jam toast");
    assert!(updated.has_image);

    let lines = ShoppingListRepository::new(&ctx.pool)
        .aggregate(shopper.id)
        .await
        .unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].name.starts_with("jam"));
    assert_eq!(lines[0].total_amount, 30);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_only_the_author_may_edit_or_delete() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let stranger = ctx.user().await;
    let salt = ctx.ingredient("salt", "g").await;
    let tag = ctx.tag().await;
    let recipe = ctx.recipe(author.id, &[(salt, 1)]).await;

    assert!(matches!(
        ctx.recipes()
            .update(stranger.id, recipe, &form(tag, &[(salt, 2)]))
            .await,
        Err(RecipeError::NotAuthor)
    ));
    assert!(matches!(
        ctx.recipes().delete(stranger.id, recipe).await,
        Err(RecipeError::NotAuthor)
    ));

    ctx.recipes().delete(author.id, recipe).await.unwrap();
    assert!(matches!(
        ctx.recipes().delete(author.id, recipe).await,
        Err(RecipeError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_deleting_a_recipe_empties_it_from_carts() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let shopper = ctx.user().await;
    let rice = ctx.ingredient("rice", "g").await;
    let recipe = ctx.recipe(author.id, &[(rice, 150)]).await;

    for list in [RecipeList::ShoppingCart, RecipeList::Favorites] {
        RecipeListRepository::new(&ctx.pool, list)
            .add(shopper.id, recipe)
            .await
            .unwrap();
    }

    ctx.recipes().delete(author.id, recipe).await.unwrap();

    assert!(
        ShoppingListRepository::new(&ctx.pool)
            .aggregate(shopper.id)
            .await
            .unwrap()
            .is_empty()
    );
    let favorites = RecipeListRepository::new(&ctx.pool, RecipeList::Favorites)
        .contains_among(shopper.id, &[recipe])
        .await
        .unwrap();
    assert!(favorites.is_empty());
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_list_filters_by_author_tag_and_lists() {
    let ctx = TestContext::new().await;
    let author = ctx.user().await;
    let viewer = ctx.user().await;
    let egg = ctx.ingredient("egg", "pcs").await;

    let tagged = ctx.tag().await;
    let tagged_slug: Slug = TagRepository::new(&ctx.pool)
        .get(tagged)
        .await
        .unwrap()
        .unwrap()
        .slug;
    let first = ctx
        .recipes()
        .create(author.id, &form(tagged, &[(egg, 1)]))
        .await
        .unwrap()
        .id;
    let second = ctx.recipe(author.id, &[(egg, 2)]).await;

    let repo = RecipeRepository::new(&ctx.pool);

    let by_author = repo
        .list(
            &RecipeFilter {
                author: Some(author.id),
                ..RecipeFilter::default()
            },
            FIRST_PAGE,
        )
        .await
        .unwrap();
    assert_eq!(by_author.total, 2);
    // Newest first
    assert_eq!(
        by_author.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![second, first]
    );

    let by_tag = repo
        .list(
            &RecipeFilter {
                tags: vec![tagged_slug],
                ..RecipeFilter::default()
            },
            FIRST_PAGE,
        )
        .await
        .unwrap();
    assert_eq!(by_tag.items.len(), 1);
    assert_eq!(by_tag.items[0].id, first);

    RecipeListRepository::new(&ctx.pool, RecipeList::Favorites)
        .add(viewer.id, second)
        .await
        .unwrap();
    let favorites = repo
        .list(
            &RecipeFilter {
                favorited_by: Some(viewer.id),
                ..RecipeFilter::default()
            },
            FIRST_PAGE,
        )
        .await
        .unwrap();
    assert_eq!(favorites.total, 1);
    assert_eq!(favorites.items[0].id, second);

    let cart = repo
        .list(
            &RecipeFilter {
                in_cart_of: Some(viewer.id),
                ..RecipeFilter::default()
            },
            FIRST_PAGE,
        )
        .await
        .unwrap();
    assert_eq!(cart.total, 0);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_follow_rules() {
    let ctx = TestContext::new().await;
    let reader = ctx.user().await;
    let author = ctx.user().await;
    let follows = FollowRepository::new(&ctx.pool);

    follows.follow(reader.id, author.id).await.unwrap();
    assert!(follows.follow(reader.id, author.id).await.is_err());
    assert!(follows.follow(reader.id, reader.id).await.is_err());

    let followed = follows.list_followed(reader.id, FIRST_PAGE).await.unwrap();
    assert_eq!(followed.total, 1);
    assert_eq!(followed.items[0].id, author.id);

    assert!(follows.unfollow(reader.id, author.id).await.unwrap());
    assert!(!follows.unfollow(reader.id, author.id).await.unwrap());
}
