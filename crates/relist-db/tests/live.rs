//! Live integration tests for relist-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/relist-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use relist_core::StoreSettings;
use relist_db::{
    complete_import_batch, delete_negative_word, delete_prompt_template, fail_import_batch,
    get_import_batch, get_or_create_store_settings, get_prompt_template, insert_negative_word,
    insert_prompt_template, list_import_batches, list_negative_words, list_prompt_templates,
    save_store_settings, start_import_batch, DbError,
};
use rust_decimal::Decimal;

const SHOP: &str = "test-shop.myshopify.com";

fn source_urls() -> Vec<String> {
    vec![
        "https://drinkcann.com/collections/all".to_string(),
        "https://drinkbrez.com/products/brez-flow".to_string(),
    ]
}

fn snapshot_settings() -> StoreSettings {
    StoreSettings {
        vendor: Some("My Brand".to_string()),
        region: "United Kingdom".to_string(),
        retail_price_multiplier: Decimal::new(2, 0),
        rounding: ".95".to_string(),
        ..StoreSettings::default()
    }
}

// ---------------------------------------------------------------------------
// Section 1: Import Batch Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn start_import_batch_opens_in_processing(pool: sqlx::PgPool) {
    let urls = source_urls();
    let batch = start_import_batch(&pool, SHOP, 4, &urls, &snapshot_settings())
        .await
        .expect("start_import_batch failed");

    assert_eq!(batch.shop, SHOP);
    assert_eq!(batch.status, "processing");
    assert_eq!(batch.total_products, 4);
    assert_eq!(batch.imported_products, 0);
    assert_eq!(batch.failed_products, 0);
    assert!(batch.completed_at.is_none());

    let stored_urls: Vec<String> =
        serde_json::from_value(batch.source_urls).expect("source_urls should round-trip");
    assert_eq!(stored_urls, urls);
}

#[sqlx::test(migrations = "../../migrations")]
async fn complete_import_batch_records_final_counts(pool: sqlx::PgPool) {
    let batch = start_import_batch(&pool, SHOP, 3, &source_urls(), &snapshot_settings())
        .await
        .expect("start_import_batch failed");

    complete_import_batch(&pool, batch.id, 2, 1)
        .await
        .expect("complete_import_batch failed");

    let fetched = get_import_batch(&pool, SHOP, batch.id)
        .await
        .expect("get_import_batch failed");

    assert_eq!(fetched.status, "completed");
    assert_eq!(fetched.imported_products, 2);
    assert_eq!(fetched.failed_products, 1);
    let completed_at = fetched.completed_at.expect("completed_at should be set");
    assert!(
        completed_at >= fetched.created_at,
        "completed_at must not precede created_at"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn complete_import_batch_rejects_second_completion(pool: sqlx::PgPool) {
    let batch = start_import_batch(&pool, SHOP, 1, &[], &snapshot_settings())
        .await
        .expect("start_import_batch failed");

    complete_import_batch(&pool, batch.id, 1, 0)
        .await
        .expect("first completion failed");

    let err = complete_import_batch(&pool, batch.id, 1, 0)
        .await
        .expect_err("completing a completed batch should fail");

    assert!(matches!(
        err,
        DbError::InvalidBatchTransition {
            expected_status: "processing",
            ..
        }
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn complete_import_batch_rejects_unknown_id(pool: sqlx::PgPool) {
    let err = complete_import_batch(&pool, 999_999, 1, 0)
        .await
        .expect_err("completing an unknown batch should fail");

    assert!(matches!(err, DbError::InvalidBatchTransition { .. }));
}

#[sqlx::test(migrations = "../../migrations")]
async fn fail_import_batch_marks_failed_with_timestamp(pool: sqlx::PgPool) {
    let batch = start_import_batch(&pool, SHOP, 2, &source_urls(), &snapshot_settings())
        .await
        .expect("start_import_batch failed");

    fail_import_batch(&pool, batch.id)
        .await
        .expect("fail_import_batch failed");

    let fetched = get_import_batch(&pool, SHOP, batch.id)
        .await
        .expect("get_import_batch failed");

    assert_eq!(fetched.status, "failed");
    assert!(
        fetched.completed_at.is_some(),
        "completed_at should be set after fail"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn fail_import_batch_rejects_completed_batch(pool: sqlx::PgPool) {
    let batch = start_import_batch(&pool, SHOP, 1, &[], &snapshot_settings())
        .await
        .expect("start_import_batch failed");
    complete_import_batch(&pool, batch.id, 1, 0)
        .await
        .expect("completion failed");

    let err = fail_import_batch(&pool, batch.id)
        .await
        .expect_err("failing a completed batch should fail");

    assert!(matches!(err, DbError::InvalidBatchTransition { .. }));
}

#[sqlx::test(migrations = "../../migrations")]
async fn settings_snapshot_round_trips_through_jsonb(pool: sqlx::PgPool) {
    let batch = start_import_batch(&pool, SHOP, 1, &[], &snapshot_settings())
        .await
        .expect("start_import_batch failed");

    let snapshot: StoreSettings =
        serde_json::from_value(batch.settings_snapshot).expect("snapshot should deserialize");

    assert_eq!(snapshot.vendor.as_deref(), Some("My Brand"));
    assert_eq!(snapshot.region, "United Kingdom");
    assert_eq!(snapshot.rounding, ".95");
    assert_eq!(snapshot.retail_price_multiplier, Decimal::new(2, 0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_import_batch_is_scoped_to_shop(pool: sqlx::PgPool) {
    let batch = start_import_batch(&pool, SHOP, 1, &[], &snapshot_settings())
        .await
        .expect("start_import_batch failed");

    let err = get_import_batch(&pool, "other-shop.myshopify.com", batch.id)
        .await
        .expect_err("another shop must not see the batch");

    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_import_batches_newest_first_with_limit(pool: sqlx::PgPool) {
    let first = start_import_batch(&pool, SHOP, 1, &[], &snapshot_settings())
        .await
        .expect("first start failed");
    let second = start_import_batch(&pool, SHOP, 2, &[], &snapshot_settings())
        .await
        .expect("second start failed");
    let third = start_import_batch(&pool, SHOP, 3, &[], &snapshot_settings())
        .await
        .expect("third start failed");

    let all = list_import_batches(&pool, SHOP, 10)
        .await
        .expect("list failed");
    let ids: Vec<i64> = all.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let limited = list_import_batches(&pool, SHOP, 2)
        .await
        .expect("limited list failed");
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, third.id);
}

// ---------------------------------------------------------------------------
// Section 2: Store Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn settings_created_lazily_with_defaults(pool: sqlx::PgPool) {
    let row = get_or_create_store_settings(&pool, SHOP)
        .await
        .expect("get_or_create failed");

    assert_eq!(row.shop, SHOP);
    assert!(row.vendor.is_none());
    assert_eq!(row.region, "United States");
    assert_eq!(row.retail_price_multiplier, Decimal::ONE);
    assert_eq!(row.rounding, ".99");
    assert_eq!(row.product_status, "DRAFT");
    assert_eq!(row.default_inventory_quantity, 100);
    assert_eq!(row.inventory_policy, "deny");
}

#[sqlx::test(migrations = "../../migrations")]
async fn settings_second_read_returns_existing_row(pool: sqlx::PgPool) {
    let first = get_or_create_store_settings(&pool, SHOP)
        .await
        .expect("first read failed");
    let second = get_or_create_store_settings(&pool, SHOP)
        .await
        .expect("second read failed");

    assert_eq!(first.id, second.id, "repeated reads must not create rows");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store_settings WHERE shop = $1")
        .bind(SHOP)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn save_store_settings_updates_wholesale(pool: sqlx::PgPool) {
    let created = get_or_create_store_settings(&pool, SHOP)
        .await
        .expect("get_or_create failed");

    let updated = save_store_settings(&pool, SHOP, &snapshot_settings())
        .await
        .expect("save failed");

    assert_eq!(updated.id, created.id, "save must update the existing row");
    assert_eq!(updated.vendor.as_deref(), Some("My Brand"));
    assert_eq!(updated.region, "United Kingdom");
    assert_eq!(updated.rounding, ".95");
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn save_store_settings_inserts_for_new_shop(pool: sqlx::PgPool) {
    let row = save_store_settings(&pool, "fresh-shop.myshopify.com", &snapshot_settings())
        .await
        .expect("save failed");

    assert_eq!(row.shop, "fresh-shop.myshopify.com");
    assert_eq!(row.region, "United Kingdom");
}

// ---------------------------------------------------------------------------
// Section 3: Prompt Templates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn template_insert_and_get_round_trip(pool: sqlx::PgPool) {
    let inserted = insert_prompt_template(
        &pool,
        SHOP,
        "Luxury tone",
        Some("Rewrite as a luxury brand."),
        None,
    )
    .await
    .expect("insert failed");

    let fetched = get_prompt_template(&pool, SHOP, inserted.id)
        .await
        .expect("get failed");

    assert_eq!(fetched.name, "Luxury tone");
    assert_eq!(
        fetched.title_prompt.as_deref(),
        Some("Rewrite as a luxury brand.")
    );
    assert!(fetched.description_prompt.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn template_get_is_scoped_to_shop(pool: sqlx::PgPool) {
    let inserted = insert_prompt_template(&pool, SHOP, "Mine", None, None)
        .await
        .expect("insert failed");

    let err = get_prompt_template(&pool, "other-shop.myshopify.com", inserted.id)
        .await
        .expect_err("another shop must not see the template");
    assert!(matches!(err, DbError::NotFound));
}

#[sqlx::test(migrations = "../../migrations")]
async fn template_delete_removes_row(pool: sqlx::PgPool) {
    let inserted = insert_prompt_template(&pool, SHOP, "Short-lived", None, None)
        .await
        .expect("insert failed");

    delete_prompt_template(&pool, SHOP, inserted.id)
        .await
        .expect("delete failed");

    let err = delete_prompt_template(&pool, SHOP, inserted.id)
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, DbError::NotFound));

    assert!(list_prompt_templates(&pool, SHOP)
        .await
        .expect("list failed")
        .is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn template_deletion_leaves_batch_snapshot_untouched(pool: sqlx::PgPool) {
    // Batches snapshot settings, not template text: deleting a template
    // after a run must not rewrite what the batch reports.
    let template = insert_prompt_template(&pool, SHOP, "Seasonal", Some("Rewrite."), None)
        .await
        .expect("insert failed");
    let batch = start_import_batch(&pool, SHOP, 1, &[], &snapshot_settings())
        .await
        .expect("start failed");

    delete_prompt_template(&pool, SHOP, template.id)
        .await
        .expect("delete failed");

    let fetched = get_import_batch(&pool, SHOP, batch.id)
        .await
        .expect("get failed");
    let snapshot: StoreSettings =
        serde_json::from_value(fetched.settings_snapshot).expect("snapshot deserialize");
    assert_eq!(snapshot.rounding, ".95");
}

// ---------------------------------------------------------------------------
// Section 4: Negative Words
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn negative_word_is_stored_lowercased_and_trimmed(pool: sqlx::PgPool) {
    let row = insert_negative_word(&pool, SHOP, "  DropShipping ")
        .await
        .expect("insert failed");

    assert_eq!(row.word, "dropshipping");
}

#[sqlx::test(migrations = "../../migrations")]
async fn negative_word_insert_is_idempotent(pool: sqlx::PgPool) {
    let first = insert_negative_word(&pool, SHOP, "cheap")
        .await
        .expect("first insert failed");
    let second = insert_negative_word(&pool, SHOP, "CHEAP")
        .await
        .expect("second insert failed");

    assert_eq!(first.id, second.id, "re-adding must return the same row");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM negative_words WHERE shop = $1")
        .bind(SHOP)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn negative_words_list_alphabetically_per_shop(pool: sqlx::PgPool) {
    insert_negative_word(&pool, SHOP, "knockoff").await.unwrap();
    insert_negative_word(&pool, SHOP, "cheap").await.unwrap();
    insert_negative_word(&pool, "other-shop.myshopify.com", "aaa")
        .await
        .unwrap();

    let words = list_negative_words(&pool, SHOP).await.expect("list failed");
    let listed: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(listed, vec!["cheap", "knockoff"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn negative_word_delete_removes_row(pool: sqlx::PgPool) {
    let row = insert_negative_word(&pool, SHOP, "spam")
        .await
        .expect("insert failed");

    delete_negative_word(&pool, SHOP, row.id)
        .await
        .expect("delete failed");

    let err = delete_negative_word(&pool, SHOP, row.id)
        .await
        .expect_err("second delete should fail");
    assert!(matches!(err, DbError::NotFound));
}
