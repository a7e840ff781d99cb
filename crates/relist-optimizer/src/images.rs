//! AI image enhancement for product galleries.
//!
//! Each source image is downloaded, sent to the image service as an
//! inline reference, and replaced with the first returned rendition.
//! The first gallery image is treated as the hero shot and only cleaned
//! up; later images get lifestyle framing (see [`crate::prompts`]).
//! Per-image failures are logged and skipped — the original image URL
//! simply remains in use for that position.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use relist_core::{EnhancedImage, ProductImage, ScrapedProduct};

use crate::client::{GenAiClient, InlinePart};
use crate::error::OptimizerError;
use crate::prompts;

/// Enhances every image of a product, returning the renditions that
/// succeeded. Never fails; an empty vec means every image fell back to
/// its original.
///
/// Images are processed sequentially — the image endpoint is the most
/// aggressively rate-limited dependency in the pipeline, and one
/// in-flight generation per product keeps the retry budget meaningful.
pub async fn enhance_product_images(
    client: &GenAiClient,
    http: &reqwest::Client,
    product: &ScrapedProduct,
) -> Vec<EnhancedImage> {
    let mut enhanced = Vec::new();

    for image in &product.images {
        match enhance_one(client, http, product, image).await {
            Ok(rendition) => enhanced.push(rendition),
            Err(e) => {
                tracing::warn!(
                    product = %product.title,
                    position = image.position,
                    src = %image.src,
                    error = %e,
                    "image enhancement failed, keeping original image"
                );
            }
        }
    }

    enhanced
}

async fn enhance_one(
    client: &GenAiClient,
    http: &reqwest::Client,
    product: &ScrapedProduct,
    image: &ProductImage,
) -> Result<EnhancedImage, OptimizerError> {
    let reference = fetch_reference(http, &image.src).await?;
    let prompt = prompts::image_enhancement_prompt(product, image.position);

    let mut renditions = client.generate_image(&prompt, Some(&reference)).await?;
    let first = renditions.drain(..).next().ok_or(OptimizerError::EmptyResponse {
        context: "image enhancement".to_owned(),
    })?;

    let data = BASE64
        .decode(first.data.as_bytes())
        .map_err(|e| OptimizerError::Api {
            status: 200,
            message: format!("image service returned undecodable base64: {e}"),
        })?;

    Ok(EnhancedImage {
        position: image.position,
        mime_type: first.mime_type,
        data,
    })
}

/// Downloads the source image and wraps it as an inline base64 part.
async fn fetch_reference(
    http: &reqwest::Client,
    src: &str,
) -> Result<InlinePart, OptimizerError> {
    let response = http.get(src).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(OptimizerError::Api {
            status: status.as_u16(),
            message: format!("source image fetch from {src} failed"),
        });
    }

    let mime_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| guess_mime(src), str::to_owned);

    let bytes = response.bytes().await?;
    Ok(InlinePart {
        mime_type,
        data: BASE64.encode(&bytes),
    })
}

/// MIME type from the URL's extension when the CDN omits Content-Type.
fn guess_mime(src: &str) -> String {
    let path = src.split('?').next().unwrap_or(src);
    let mime = match path.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    };
    mime.to_owned()
}
