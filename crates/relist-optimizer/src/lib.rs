//! Generative-AI content optimizer for imported products.
//!
//! Rewrites product titles, descriptions, and image alt text through a
//! generative text/image service, under merchant prompt templates and a
//! negative-word denylist. The pipeline degrades gracefully: every
//! field-level optimization is independently attempted and falls back
//! to the original content on failure, so a flaky AI service can never
//! abort an import run.
//!
//! Denylist enforcement is double: the prompt instructs the model not
//! to use the words, and [`sanitize`] mechanically strips them from
//! whatever the model produced anyway.

pub mod client;
pub mod error;
pub mod images;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod sanitize;

pub use client::{GenAiClient, InlinePart};
pub use error::OptimizerError;
pub use images::enhance_product_images;
pub use pipeline::{
    optimize_product, optimize_products, BatchOutcome, OptimizationOutcome, OPTIMIZE_BATCH_SIZE,
};
pub use retry::RetryPolicy;
pub use sanitize::clean_response;
