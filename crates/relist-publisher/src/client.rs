//! Authenticated client for the catalog's Admin GraphQL endpoint.
//!
//! All operations go through [`AdminClient::execute`], which posts a
//! query + variables document and handles the three failure layers:
//! HTTP status, the top-level GraphQL `errors` array, and the
//! per-mutation `userErrors` field (checked by each operation, since
//! those arrive alongside a 200 and valid data).

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::PublisherError;
use crate::types::{
    CollectionAddProductsData, CollectionSummary, CollectionsData, CreatedProduct,
    ProductCreateData, ProductCreateInput, ProductCreateMediaData, ProductsData, StagedTarget,
    StagedUploadsCreateData, VariantUpdate, VariantsBulkUpdateData,
};

const PRODUCT_CREATE: &str = "mutation productCreate($input: ProductInput!) {\
  productCreate(input: $input) {\
    product { id variants(first: 1) { nodes { id } } }\
    userErrors { field message }\
  }\
}";

const VARIANTS_BULK_UPDATE: &str =
    "mutation productVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {\
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {\
    productVariants { id }\
    userErrors { field message }\
  }\
}";

const PRODUCT_CREATE_MEDIA: &str =
    "mutation productCreateMedia($productId: ID!, $media: [CreateMediaInput!]!) {\
  productCreateMedia(productId: $productId, media: $media) {\
    media { alt }\
    mediaUserErrors { field message }\
  }\
}";

const STAGED_UPLOADS_CREATE: &str =
    "mutation stagedUploadsCreate($input: [StagedUploadInput!]!) {\
  stagedUploadsCreate(input: $input) {\
    stagedTargets { url resourceUrl parameters { name value } }\
    userErrors { field message }\
  }\
}";

const COLLECTION_ADD_PRODUCTS: &str =
    "mutation collectionAddProducts($id: ID!, $productIds: [ID!]!) {\
  collectionAddProducts(id: $id, productIds: $productIds) {\
    collection { id }\
    userErrors { field message }\
  }\
}";

const LIST_COLLECTIONS: &str = "query listCollections($first: Int!) {\
  collections(first: $first) { nodes { id title } }\
}";

const LIST_PRODUCTS: &str = "query listProducts($first: Int!, $query: String) {\
  products(first: $first, query: $query) { nodes { id title } }\
}";

/// Client for the merchant catalog's Admin GraphQL API.
pub struct AdminClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl AdminClient {
    /// Creates a client for a shop domain, e.g. `"my-shop.myshopify.com"`.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        shop_domain: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, PublisherError> {
        let endpoint = format!(
            "https://{}/admin/api/{api_version}/graphql.json",
            shop_domain.trim_end_matches('/')
        );
        Self::with_endpoint(&endpoint, access_token, timeout_secs)
    }

    /// Creates a client with an explicit GraphQL endpoint URL (for
    /// pointing tests at a mock server).
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        timeout_secs: u64,
    ) -> Result<Self, PublisherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_owned(),
            access_token: access_token.to_owned(),
        })
    }

    /// Creates a product with its basic fields.
    ///
    /// # Errors
    ///
    /// - [`PublisherError::UserErrors`] — the catalog rejected the input.
    /// - [`PublisherError::MissingData`] — no product came back despite
    ///   an empty error list.
    /// - Plus the transport/parse errors of [`Self::execute`].
    pub async fn create_product(
        &self,
        input: &ProductCreateInput,
    ) -> Result<CreatedProduct, PublisherError> {
        let data: ProductCreateData = self
            .execute(PRODUCT_CREATE, json!({ "input": input }), "productCreate")
            .await?;

        let payload = data.product_create;
        if !payload.user_errors.is_empty() {
            return Err(PublisherError::UserErrors(payload.user_errors));
        }
        let product = payload.product.ok_or(PublisherError::MissingData {
            context: "productCreate".to_owned(),
        })?;

        let default_variant_id = product.variants.nodes.into_iter().next().map(|n| n.id);
        Ok(CreatedProduct {
            id: product.id,
            default_variant_id,
        })
    }

    /// Updates price/sku/weight fields on one variant.
    ///
    /// # Errors
    ///
    /// [`PublisherError::UserErrors`] on rejection, plus transport/parse
    /// errors.
    pub async fn update_variant(
        &self,
        product_id: &str,
        update: &VariantUpdate,
    ) -> Result<(), PublisherError> {
        let data: VariantsBulkUpdateData = self
            .execute(
                VARIANTS_BULK_UPDATE,
                json!({ "productId": product_id, "variants": [update] }),
                "productVariantsBulkUpdate",
            )
            .await?;

        let errors = data.product_variants_bulk_update.user_errors;
        if !errors.is_empty() {
            return Err(PublisherError::UserErrors(errors));
        }
        Ok(())
    }

    /// Attaches one image to a product from an external URL or a staged
    /// upload `resourceUrl`.
    ///
    /// # Errors
    ///
    /// [`PublisherError::UserErrors`] on rejection, plus transport/parse
    /// errors.
    pub async fn create_media(
        &self,
        product_id: &str,
        original_source: &str,
        alt: &str,
    ) -> Result<(), PublisherError> {
        let data: ProductCreateMediaData = self
            .execute(
                PRODUCT_CREATE_MEDIA,
                json!({
                    "productId": product_id,
                    "media": [{
                        "originalSource": original_source,
                        "alt": alt,
                        "mediaContentType": "IMAGE"
                    }]
                }),
                "productCreateMedia",
            )
            .await?;

        let errors = data.product_create_media.media_user_errors;
        if !errors.is_empty() {
            return Err(PublisherError::UserErrors(errors));
        }
        Ok(())
    }

    /// Requests a staged upload slot for one image file.
    ///
    /// # Errors
    ///
    /// [`PublisherError::UserErrors`] on rejection;
    /// [`PublisherError::MissingData`] when no target comes back.
    pub async fn staged_uploads_create(
        &self,
        filename: &str,
        mime_type: &str,
        byte_size: usize,
    ) -> Result<StagedTarget, PublisherError> {
        let data: StagedUploadsCreateData = self
            .execute(
                STAGED_UPLOADS_CREATE,
                json!({
                    "input": [{
                        "filename": filename,
                        "mimeType": mime_type,
                        "fileSize": byte_size.to_string(),
                        "httpMethod": "PUT",
                        "resource": "IMAGE"
                    }]
                }),
                "stagedUploadsCreate",
            )
            .await?;

        let payload = data.staged_uploads_create;
        if !payload.user_errors.is_empty() {
            return Err(PublisherError::UserErrors(payload.user_errors));
        }
        payload
            .staged_targets
            .into_iter()
            .next()
            .ok_or(PublisherError::MissingData {
                context: "stagedUploadsCreate".to_owned(),
            })
    }

    /// PUTs the binary to a staged upload slot.
    ///
    /// # Errors
    ///
    /// [`PublisherError::Upload`] on a non-2xx response from the slot.
    pub async fn upload_staged(
        &self,
        target: &StagedTarget,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), PublisherError> {
        let response = self
            .http
            .put(&target.url)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublisherError::Upload {
                status: status.as_u16(),
                context: target.url.clone(),
            });
        }
        Ok(())
    }

    /// Adds a list of products to one collection in a single call.
    ///
    /// # Errors
    ///
    /// [`PublisherError::UserErrors`] on rejection, plus transport/parse
    /// errors.
    pub async fn collection_add_products(
        &self,
        collection_id: &str,
        product_ids: &[String],
    ) -> Result<(), PublisherError> {
        let data: CollectionAddProductsData = self
            .execute(
                COLLECTION_ADD_PRODUCTS,
                json!({ "id": collection_id, "productIds": product_ids }),
                "collectionAddProducts",
            )
            .await?;

        let errors = data.collection_add_products.user_errors;
        if !errors.is_empty() {
            return Err(PublisherError::UserErrors(errors));
        }
        Ok(())
    }

    /// Lists the shop's collections.
    ///
    /// # Errors
    ///
    /// Transport/parse errors of [`Self::execute`].
    pub async fn list_collections(
        &self,
        first: u32,
    ) -> Result<Vec<CollectionSummary>, PublisherError> {
        let data: CollectionsData = self
            .execute(LIST_COLLECTIONS, json!({ "first": first }), "collections")
            .await?;
        Ok(data.collections.nodes)
    }

    /// Lists or searches the shop's products.
    ///
    /// # Errors
    ///
    /// Transport/parse errors of [`Self::execute`].
    pub async fn list_products(
        &self,
        first: u32,
        query: Option<&str>,
    ) -> Result<Vec<CollectionSummary>, PublisherError> {
        let data: ProductsData = self
            .execute(
                LIST_PRODUCTS,
                json!({ "first": first, "query": query }),
                "products",
            )
            .await?;
        Ok(data.products.nodes)
    }

    /// Posts one GraphQL document and deserializes the `data` object.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        context: &str,
    ) -> Result<T, PublisherError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublisherError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: GraphQlEnvelope =
            serde_json::from_str(&body).map_err(|e| PublisherError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let message = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(PublisherError::GraphQl(message));
            }
        }

        let data = envelope.data.ok_or(PublisherError::MissingData {
            context: context.to_owned(),
        })?;
        serde_json::from_value(data).map_err(|e| PublisherError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[derive(serde::Deserialize)]
struct GraphQlEnvelope {
    data: Option<Value>,
    errors: Option<Vec<GraphQlMessage>>,
}

#[derive(serde::Deserialize)]
struct GraphQlMessage {
    message: String,
}
