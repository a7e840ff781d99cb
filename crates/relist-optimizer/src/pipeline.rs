//! Product-level optimization pipeline.
//!
//! The cardinal rule: optimization never fails a product. Title,
//! description, and each image's alt text are independently attempted;
//! whatever fails falls back to the original content with a warning,
//! and the batch moves on.

use futures::future::join_all;

use relist_core::{OptimizedProduct, ScrapedProduct};

use crate::client::GenAiClient;
use crate::prompts;
use crate::sanitize::clean_response;

/// Products optimized concurrently per batch. Batch N+1 does not start
/// until every optimization in batch N has settled.
pub const OPTIMIZE_BATCH_SIZE: usize = 3;

/// Result of optimizing one product: always a product, plus warnings
/// for whichever fields fell back to their originals.
#[derive(Debug)]
pub struct OptimizationOutcome {
    pub product: OptimizedProduct,
    pub warnings: Vec<String>,
}

/// Result of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub products: Vec<OptimizedProduct>,
    /// Human-readable warnings, keyed by product title.
    pub warnings: Vec<String>,
}

/// Optimizes one product. Never fails: each field falls back to its
/// original value when its AI call errors out.
pub async fn optimize_product(
    client: &GenAiClient,
    product: ScrapedProduct,
    title_template: Option<&str>,
    description_template: Option<&str>,
    negative_words: &[String],
    optimize_alt_text: bool,
) -> OptimizationOutcome {
    let original_title = product.title.clone();
    let original_description = product.description.clone();
    let mut warnings = Vec::new();
    let mut optimized = product;

    match client
        .generate_text(&prompts::title_prompt(
            &optimized,
            title_template,
            negative_words,
        ))
        .await
    {
        Ok(raw) => {
            let cleaned = clean_response(&raw, negative_words);
            if cleaned.is_empty() {
                warnings.push(format!(
                    "{original_title}: title optimization produced empty output, kept original"
                ));
            } else {
                optimized.title = cleaned;
            }
        }
        Err(e) => {
            tracing::warn!(product = %original_title, error = %e, "title optimization failed, keeping original");
            warnings.push(format!("{original_title}: title optimization failed: {e}"));
        }
    }

    match client
        .generate_text(&prompts::description_prompt(
            &optimized,
            description_template,
            negative_words,
        ))
        .await
    {
        Ok(raw) => {
            let cleaned = clean_response(&raw, negative_words);
            if cleaned.is_empty() {
                warnings.push(format!(
                    "{original_title}: description optimization produced empty output, kept original"
                ));
            } else {
                optimized.description = cleaned;
            }
        }
        Err(e) => {
            tracing::warn!(product = %original_title, error = %e, "description optimization failed, keeping original");
            warnings.push(format!(
                "{original_title}: description optimization failed: {e}"
            ));
        }
    }

    if optimize_alt_text && !optimized.images.is_empty() {
        // Alt-text calls for one product run concurrently across its
        // images; each image fails independently.
        let alt_futures = optimized.images.iter().map(|image| {
            let prompt = prompts::alt_text_prompt(&optimized, image, negative_words);
            async move { client.generate_text(&prompt).await }
        });
        let results = join_all(alt_futures).await;

        for (image_index, result) in results.into_iter().enumerate() {
            match result {
                Ok(raw) => {
                    let cleaned = clean_response(&raw, negative_words);
                    if !cleaned.is_empty() {
                        optimized.images[image_index].alt = cleaned;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        product = %original_title,
                        image_index,
                        error = %e,
                        "alt-text optimization failed, keeping original"
                    );
                    warnings.push(format!(
                        "{original_title}: alt text for image {} failed: {e}",
                        image_index + 1
                    ));
                }
            }
        }
    }

    OptimizationOutcome {
        product: OptimizedProduct {
            product: optimized,
            original_title,
            original_description,
        },
        warnings,
    }
}

/// Optimizes a list of products in fixed-size concurrent batches.
///
/// Within a batch all product optimizations run concurrently; the next
/// batch starts only once every one of them has settled. Output order
/// matches input order, and every input product appears in the output —
/// failures surface as warnings on fallback records, never as holes.
pub async fn optimize_products(
    client: &GenAiClient,
    products: Vec<ScrapedProduct>,
    title_template: Option<&str>,
    description_template: Option<&str>,
    negative_words: &[String],
    optimize_alt_text: bool,
) -> BatchOutcome {
    let mut optimized = Vec::with_capacity(products.len());
    let mut warnings = Vec::new();

    let mut remaining = products.into_iter();
    loop {
        let batch: Vec<ScrapedProduct> = remaining.by_ref().take(OPTIMIZE_BATCH_SIZE).collect();
        if batch.is_empty() {
            break;
        }

        let outcomes = join_all(batch.into_iter().map(|product| {
            optimize_product(
                client,
                product,
                title_template,
                description_template,
                negative_words,
                optimize_alt_text,
            )
        }))
        .await;

        for outcome in outcomes {
            warnings.extend(outcome.warnings);
            optimized.push(outcome.product);
        }
    }

    BatchOutcome {
        products: optimized,
        warnings,
    }
}
