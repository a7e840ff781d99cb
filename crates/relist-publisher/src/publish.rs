//! Sequential publish orchestration with per-product failure isolation.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use relist_core::{EnhancedImage, ProductVariant, ScrapedProduct, StoreSettings};

use crate::client::AdminClient;
use crate::error::PublisherError;
use crate::types::{
    InventoryItemUpdate, MeasurementUpdate, ProductCreateInput, VariantUpdate, WeightUpdate,
};

/// One product queued for publishing, with any AI-enhanced image
/// renditions produced earlier in the run. Images without a rendition
/// are attached from their original source URL.
#[derive(Debug)]
pub struct PublishItem {
    pub product: ScrapedProduct,
    pub enhanced_images: Vec<EnhancedImage>,
}

impl PublishItem {
    #[must_use]
    pub fn plain(product: ScrapedProduct) -> Self {
        Self {
            product,
            enhanced_images: Vec::new(),
        }
    }
}

/// Aggregate result of a publish run.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub imported: u32,
    pub failed: u32,
    pub total: u32,
    /// Ids of successfully created products, in input order.
    pub created_product_ids: Vec<String>,
}

/// Publishes each product to the catalog, strictly sequentially and in
/// input order, then assigns every created product to the selected
/// collections in a separate pass.
///
/// A product that fails creation increments `failed` and the run moves
/// on; variant-update and media failures after a successful creation
/// are logged and the product still counts as imported.
///
/// `inter_product_delay_ms` is applied between products only when
/// `used_ai` is set — runs that already hammered the AI service space
/// out their catalog mutations too, so the two rate limits never
/// compound. Pure repricing runs proceed at full speed.
pub async fn publish_products(
    client: &AdminClient,
    items: &[PublishItem],
    settings: &StoreSettings,
    collection_ids: &[String],
    used_ai: bool,
    inter_product_delay_ms: u64,
) -> PublishOutcome {
    let mut imported = 0u32;
    let mut failed = 0u32;
    let mut created_product_ids = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if index > 0 && used_ai && inter_product_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(inter_product_delay_ms)).await;
        }

        match publish_one(client, item, settings).await {
            Ok(product_id) => {
                imported += 1;
                created_product_ids.push(product_id);
            }
            Err(e) => {
                failed += 1;
                tracing::error!(
                    product = %item.product.title,
                    source = %item.product.source_store,
                    error = %e,
                    "product creation failed, continuing with remaining products"
                );
            }
        }
    }

    for collection_id in collection_ids {
        if created_product_ids.is_empty() {
            break;
        }
        if let Err(e) = client
            .collection_add_products(collection_id, &created_product_ids)
            .await
        {
            tracing::error!(
                collection = %collection_id,
                error = %e,
                "collection assignment failed, continuing with remaining collections"
            );
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let total = items.len() as u32;
    PublishOutcome {
        imported,
        failed,
        total,
        created_product_ids,
    }
}

/// Creates one product and best-effort fills its variant and media.
///
/// Only the creation call decides success or failure. The follow-up
/// variant update and media attachment log their own failures and leave
/// the product standing, possibly with default variant values or a
/// missing gallery image.
async fn publish_one(
    client: &AdminClient,
    item: &PublishItem,
    settings: &StoreSettings,
) -> Result<String, PublisherError> {
    let product = &item.product;

    let input = build_create_input(product, settings);
    let created = client.create_product(&input).await?;

    if let (Some(variant_id), Some(variant)) =
        (created.default_variant_id.as_ref(), product.first_variant())
    {
        let update = build_variant_update(variant_id, variant, settings);
        if let Err(e) = client.update_variant(&created.id, &update).await {
            tracing::warn!(
                product = %product.title,
                product_id = %created.id,
                error = %e,
                "variant update failed after creation; product keeps default variant values"
            );
        }
    }

    attach_media(client, item, &created.id).await;

    Ok(created.id)
}

fn build_create_input(product: &ScrapedProduct, settings: &StoreSettings) -> ProductCreateInput {
    let vendor = settings
        .vendor
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| product.vendor.clone());

    ProductCreateInput {
        title: product.title.clone(),
        description_html: product.description.clone(),
        vendor,
        product_type: product.product_type.clone(),
        tags: product.tags.clone(),
        status: settings.product_status.to_uppercase(),
    }
}

fn build_variant_update(
    variant_id: &str,
    variant: &ProductVariant,
    settings: &StoreSettings,
) -> VariantUpdate {
    VariantUpdate {
        id: variant_id.to_owned(),
        price: variant.price.clone(),
        compare_at_price: variant.compare_at_price.clone(),
        inventory_policy: Some(settings.inventory_policy.to_uppercase()),
        inventory_item: Some(InventoryItemUpdate {
            sku: (!variant.sku.is_empty()).then(|| variant.sku.clone()),
            measurement: Some(MeasurementUpdate {
                weight: WeightUpdate {
                    value: variant.weight,
                    unit: map_weight_unit(&variant.weight_unit).to_owned(),
                },
            }),
        }),
    }
}

/// Attaches the product's gallery. Enhanced renditions go through the
/// staged-upload flow; everything else is referenced by its source URL.
/// Every failure here is logged and non-fatal.
async fn attach_media(client: &AdminClient, item: &PublishItem, product_id: &str) {
    let product = &item.product;
    let enhanced_positions: HashSet<i32> =
        item.enhanced_images.iter().map(|e| e.position).collect();

    for enhanced in &item.enhanced_images {
        let alt = product
            .images
            .iter()
            .find(|i| i.position == enhanced.position)
            .map(|i| i.alt.as_str())
            .unwrap_or_default();
        if let Err(e) = upload_enhanced(client, product, enhanced, product_id, alt).await {
            tracing::warn!(
                product = %product.title,
                position = enhanced.position,
                error = %e,
                "enhanced image attachment failed"
            );
        }
    }

    for image in &product.images {
        if enhanced_positions.contains(&image.position) || image.src.is_empty() {
            continue;
        }
        if let Err(e) = client.create_media(product_id, &image.src, &image.alt).await {
            tracing::warn!(
                product = %product.title,
                position = image.position,
                error = %e,
                "image attachment failed"
            );
        }
    }
}

async fn upload_enhanced(
    client: &AdminClient,
    product: &ScrapedProduct,
    enhanced: &EnhancedImage,
    product_id: &str,
    alt: &str,
) -> Result<(), PublisherError> {
    let filename = format!(
        "{}-{}.{}",
        product.handle,
        enhanced.position,
        extension_for(&enhanced.mime_type)
    );
    let target = client
        .staged_uploads_create(&filename, &enhanced.mime_type, enhanced.data.len())
        .await?;
    client
        .upload_staged(&target, &enhanced.mime_type, enhanced.data.clone())
        .await?;
    client
        .create_media(product_id, &target.resource_url, alt)
        .await
}

/// Maps a source-store weight unit name onto the catalog's enum
/// vocabulary. Anything unrecognized is treated as grams, the unit the
/// storefront endpoints report by default.
#[must_use]
pub fn map_weight_unit(unit: &str) -> &'static str {
    match unit.trim().to_ascii_lowercase().as_str() {
        "kg" | "kgs" | "kilogram" | "kilograms" => "KILOGRAMS",
        "oz" | "ounce" | "ounces" => "OUNCES",
        "lb" | "lbs" | "pound" | "pounds" => "POUNDS",
        _ => "GRAMS",
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_units_map_to_catalog_enum() {
        assert_eq!(map_weight_unit("g"), "GRAMS");
        assert_eq!(map_weight_unit("grams"), "GRAMS");
        assert_eq!(map_weight_unit("KG"), "KILOGRAMS");
        assert_eq!(map_weight_unit("oz"), "OUNCES");
        assert_eq!(map_weight_unit("lbs"), "POUNDS");
        assert_eq!(map_weight_unit("stone"), "GRAMS");
    }

    #[test]
    fn vendor_override_takes_precedence() {
        let product = ScrapedProduct {
            external_id: 1,
            title: "T".to_string(),
            handle: "t".to_string(),
            description: String::new(),
            vendor: "Scraped Vendor".to_string(),
            product_type: String::new(),
            tags: vec![],
            images: vec![],
            variants: vec![],
            options: vec![],
            source_url: String::new(),
            source_store: "a.com".to_string(),
        };

        let mut settings = StoreSettings::default();
        let input = build_create_input(&product, &settings);
        assert_eq!(input.vendor, "Scraped Vendor");

        settings.vendor = Some("My Brand".to_string());
        let input = build_create_input(&product, &settings);
        assert_eq!(input.vendor, "My Brand");

        settings.vendor = Some(String::new());
        let input = build_create_input(&product, &settings);
        assert_eq!(input.vendor, "Scraped Vendor");
    }

    #[test]
    fn create_input_uppercases_status() {
        let product = ScrapedProduct {
            external_id: 1,
            title: "T".to_string(),
            handle: "t".to_string(),
            description: String::new(),
            vendor: String::new(),
            product_type: String::new(),
            tags: vec![],
            images: vec![],
            variants: vec![],
            options: vec![],
            source_url: String::new(),
            source_store: "a.com".to_string(),
        };
        let settings = StoreSettings {
            product_status: "draft".to_string(),
            ..StoreSettings::default()
        };
        let input = build_create_input(&product, &settings);
        assert_eq!(input.status, "DRAFT");
    }

    #[test]
    fn variant_update_skips_empty_sku() {
        let variant = ProductVariant {
            title: String::new(),
            price: "10.99".to_string(),
            compare_at_price: Some("14.99".to_string()),
            sku: String::new(),
            weight: 0.5,
            weight_unit: "kg".to_string(),
            inventory_quantity: 3,
            option1: None,
            option2: None,
            option3: None,
        };
        let update = build_variant_update("gid://x/1", &variant, &StoreSettings::default());
        assert_eq!(update.price, "10.99");
        let item = update.inventory_item.unwrap();
        assert!(item.sku.is_none());
        assert_eq!(item.measurement.unwrap().weight.unit, "KILOGRAMS");
    }
}
