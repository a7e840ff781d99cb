//! Catalog publisher: materializes scraped (and optionally optimized,
//! always repriced) products in the merchant's own catalog through the
//! authenticated Admin GraphQL API.
//!
//! Failure isolation is the organizing principle: each product's
//! creation is independently attempted, and within a product the
//! variant update and media attachment are best-effort sub-steps that
//! log instead of failing the product. A run always completes with
//! counts, never aborts on one bad product.

pub mod client;
pub mod error;
pub mod publish;
pub mod types;

pub use client::AdminClient;
pub use error::{PublisherError, UserError};
pub use publish::{map_weight_unit, publish_products, PublishItem, PublishOutcome};
pub use types::{CollectionSummary, CreatedProduct, ProductCreateInput, StagedTarget, VariantUpdate};
