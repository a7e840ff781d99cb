//! Database operations for per-shop `store_settings`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use relist_core::StoreSettings;

use crate::DbError;

/// A row from the `store_settings` table. Column defaults mirror
/// [`StoreSettings::default`], so a bare insert of just the shop key
/// yields a fully usable record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettingsRow {
    pub id: i64,
    pub shop: String,
    pub vendor: Option<String>,
    pub region: String,
    pub retail_price_multiplier: Decimal,
    pub retail_price_manual: bool,
    pub compare_at_price_multiplier: Decimal,
    pub compare_at_price_manual: bool,
    pub rounding: String,
    pub product_status: String,
    pub default_inventory_quantity: i32,
    pub inventory_policy: String,
    pub charge_vat: bool,
    pub optimize_alt_text: bool,
    pub uniform_variant_pricing: bool,
    pub generate_tags: bool,
    pub generate_product_type: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for StoreSettings {
    fn from(row: SettingsRow) -> Self {
        StoreSettings {
            vendor: row.vendor,
            region: row.region,
            retail_price_multiplier: row.retail_price_multiplier,
            retail_price_manual: row.retail_price_manual,
            compare_at_price_multiplier: row.compare_at_price_multiplier,
            compare_at_price_manual: row.compare_at_price_manual,
            rounding: row.rounding,
            product_status: row.product_status,
            default_inventory_quantity: row.default_inventory_quantity,
            inventory_policy: row.inventory_policy,
            charge_vat: row.charge_vat,
            optimize_alt_text: row.optimize_alt_text,
            uniform_variant_pricing: row.uniform_variant_pricing,
            generate_tags: row.generate_tags,
            generate_product_type: row.generate_product_type,
        }
    }
}

const ALL_COLUMNS: &str = "id, shop, vendor, region, retail_price_multiplier, \
     retail_price_manual, compare_at_price_multiplier, compare_at_price_manual, rounding, \
     product_status, default_inventory_quantity, inventory_policy, charge_vat, \
     optimize_alt_text, uniform_variant_pricing, generate_tags, generate_product_type, \
     created_at, updated_at";

/// Fetches the settings for a shop, creating the row with column
/// defaults on first read.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn get_or_create_store_settings(
    pool: &PgPool,
    shop: &str,
) -> Result<SettingsRow, DbError> {
    sqlx::query("INSERT INTO store_settings (shop) VALUES ($1) ON CONFLICT (shop) DO NOTHING")
        .bind(shop)
        .execute(pool)
        .await?;

    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "SELECT {ALL_COLUMNS} FROM store_settings WHERE shop = $1"
    ))
    .bind(shop)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Saves a shop's settings wholesale (upsert). Every configurable field
/// is written; there is no partial update.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn save_store_settings(
    pool: &PgPool,
    shop: &str,
    settings: &StoreSettings,
) -> Result<SettingsRow, DbError> {
    let row = sqlx::query_as::<_, SettingsRow>(&format!(
        "INSERT INTO store_settings \
             (shop, vendor, region, retail_price_multiplier, retail_price_manual, \
              compare_at_price_multiplier, compare_at_price_manual, rounding, product_status, \
              default_inventory_quantity, inventory_policy, charge_vat, optimize_alt_text, \
              uniform_variant_pricing, generate_tags, generate_product_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         ON CONFLICT (shop) DO UPDATE SET \
             vendor                      = EXCLUDED.vendor, \
             region                      = EXCLUDED.region, \
             retail_price_multiplier     = EXCLUDED.retail_price_multiplier, \
             retail_price_manual         = EXCLUDED.retail_price_manual, \
             compare_at_price_multiplier = EXCLUDED.compare_at_price_multiplier, \
             compare_at_price_manual     = EXCLUDED.compare_at_price_manual, \
             rounding                    = EXCLUDED.rounding, \
             product_status              = EXCLUDED.product_status, \
             default_inventory_quantity  = EXCLUDED.default_inventory_quantity, \
             inventory_policy            = EXCLUDED.inventory_policy, \
             charge_vat                  = EXCLUDED.charge_vat, \
             optimize_alt_text           = EXCLUDED.optimize_alt_text, \
             uniform_variant_pricing     = EXCLUDED.uniform_variant_pricing, \
             generate_tags               = EXCLUDED.generate_tags, \
             generate_product_type       = EXCLUDED.generate_product_type, \
             updated_at                  = NOW() \
         RETURNING {ALL_COLUMNS}"
    ))
    .bind(shop)
    .bind(&settings.vendor)
    .bind(&settings.region)
    .bind(settings.retail_price_multiplier)
    .bind(settings.retail_price_manual)
    .bind(settings.compare_at_price_multiplier)
    .bind(settings.compare_at_price_manual)
    .bind(&settings.rounding)
    .bind(&settings.product_status)
    .bind(settings.default_inventory_quantity)
    .bind(&settings.inventory_policy)
    .bind(settings.charge_vat)
    .bind(settings.optimize_alt_text)
    .bind(settings.uniform_variant_pricing)
    .bind(settings.generate_tags)
    .bind(settings.generate_product_type)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
