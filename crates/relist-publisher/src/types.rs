//! Input and response shapes for the Admin GraphQL operations the
//! publisher uses. Inputs serialize camelCase to match the API's
//! variable vocabulary; response structs deserialize only the fields
//! the pipeline reads.

use serde::{Deserialize, Serialize};

use crate::error::UserError;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Variables for `productCreate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateInput {
    pub title: String,
    pub description_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    /// `"ACTIVE"` or `"DRAFT"`.
    pub status: String,
}

/// Fields updated on the default variant after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantUpdate {
    pub id: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_item: Option<InventoryItemUpdate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<MeasurementUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeasurementUpdate {
    pub weight: WeightUpdate,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightUpdate {
    pub value: f64,
    /// Catalog enum vocabulary: `GRAMS`, `KILOGRAMS`, `OUNCES`, `POUNDS`.
    pub unit: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A newly created product: its id and, when the API returned one, the
/// id of the default variant the creation spawned.
#[derive(Debug, Clone)]
pub struct CreatedProduct {
    pub id: String,
    pub default_variant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductCreateData {
    pub product_create: ProductCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductCreatePayload {
    pub product: Option<ProductNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductNode {
    pub id: String,
    #[serde(default)]
    pub variants: VariantConnection,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VariantConnection {
    #[serde(default)]
    pub nodes: Vec<IdNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IdNode {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantsBulkUpdateData {
    pub product_variants_bulk_update: UserErrorsPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductCreateMediaData {
    pub product_create_media: MediaPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MediaPayload {
    #[serde(default)]
    pub media_user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionAddProductsData {
    pub collection_add_products: UserErrorsPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserErrorsPayload {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StagedUploadsCreateData {
    pub staged_uploads_create: StagedUploadsPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StagedUploadsPayload {
    #[serde(default)]
    pub staged_targets: Vec<StagedTarget>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

/// A staged upload slot: PUT the binary to `url`, then reference
/// `resource_url` in `productCreateMedia`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedTarget {
    pub url: String,
    pub resource_url: String,
    #[serde(default)]
    pub parameters: Vec<StagedParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StagedParameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionsData {
    pub collections: NodeConnection<CollectionSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsData {
    pub products: NodeConnection<CollectionSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NodeConnection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

/// Id/title pair used for both collection and product listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
}
