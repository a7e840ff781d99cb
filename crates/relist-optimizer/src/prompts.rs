//! Prompt construction for the content optimizer.
//!
//! Merchant templates are used verbatim with product context appended;
//! when no template exists a built-in generic SEO instruction applies.
//! The negative-word clause is appended whenever the denylist is
//! non-empty — the mechanical strip in [`crate::sanitize`] backs it up,
//! since model compliance with the instruction is not reliable.

use relist_core::{ProductImage, ScrapedProduct};

const DEFAULT_TITLE_INSTRUCTION: &str = "Rewrite this product title to be clear, compelling, and \
    search-engine friendly. Keep it under 70 characters, lead with what the product is, and do \
    not use quotation marks or emoji. Return only the title.";

const DEFAULT_DESCRIPTION_INSTRUCTION: &str = "Rewrite this product description as clean HTML \
    suitable for an online store. Keep the factual claims of the original, improve readability \
    and search-engine relevance, and structure it with short paragraphs. Return only the \
    description HTML.";

const DEFAULT_ALT_TEXT_INSTRUCTION: &str = "Write concise, descriptive alt text for this product \
    image for accessibility and image search. Under 125 characters. Return only the alt text.";

/// Builds the title-rewrite prompt.
#[must_use]
pub fn title_prompt(
    product: &ScrapedProduct,
    template: Option<&str>,
    negative_words: &[String],
) -> String {
    let instruction = template.unwrap_or(DEFAULT_TITLE_INSTRUCTION);
    let mut prompt = format!("{instruction}\n\n{}", product_context(product));
    if let Some(clause) = negative_words_clause(negative_words) {
        prompt.push_str(&clause);
    }
    prompt
}

/// Builds the description-rewrite prompt.
#[must_use]
pub fn description_prompt(
    product: &ScrapedProduct,
    template: Option<&str>,
    negative_words: &[String],
) -> String {
    let instruction = template.unwrap_or(DEFAULT_DESCRIPTION_INSTRUCTION);
    let mut prompt = format!(
        "{instruction}\n\n{}\nCurrent description:\n{}",
        product_context(product),
        product.description
    );
    if let Some(clause) = negative_words_clause(negative_words) {
        prompt.push_str(&clause);
    }
    prompt
}

/// Builds the alt-text prompt for one image.
#[must_use]
pub fn alt_text_prompt(
    product: &ScrapedProduct,
    image: &ProductImage,
    negative_words: &[String],
) -> String {
    let current_alt = if image.alt.is_empty() {
        "(none)"
    } else {
        image.alt.as_str()
    };
    let mut prompt = format!(
        "{DEFAULT_ALT_TEXT_INSTRUCTION}\n\n{}\nImage position: {}\nCurrent alt text: {current_alt}",
        product_context(product),
        image.position,
    );
    if let Some(clause) = negative_words_clause(negative_words) {
        prompt.push_str(&clause);
    }
    prompt
}

/// Builds the image-enhancement prompt for an image at the given
/// 1-based gallery position.
///
/// Position 1 is the canonical hero shot: the instructions forbid
/// changing the background or context beyond cleanup, because that
/// image carries product identity across listings. Later positions get
/// lifestyle framing instead. The positional split is fixed, not
/// configurable.
#[must_use]
pub fn image_enhancement_prompt(product: &ScrapedProduct, position: i32) -> String {
    if position <= 1 {
        format!(
            "Enhance this product photo of \"{}\" for an e-commerce listing. Clean up lighting, \
             sharpness, and color balance only. Keep the product, background, and composition \
             exactly as they are — no new props, scenery, or context.",
            product.title
        )
    } else {
        format!(
            "Create a lifestyle rendition of this product photo of \"{}\" for an e-commerce \
             gallery. Place the product in a natural, appealing setting that fits the product \
             category, keeping the product itself accurate and unaltered.",
            product.title
        )
    }
}

/// Interpolated product context appended to every text prompt.
fn product_context(product: &ScrapedProduct) -> String {
    format!(
        "Product title: {}\nVendor: {}\nProduct type: {}\nTags: {}",
        product.title,
        product.vendor,
        product.product_type,
        product.tags.join(", ")
    )
}

fn negative_words_clause(words: &[String]) -> Option<String> {
    if words.is_empty() {
        return None;
    }
    Some(format!(
        "\n\nNever use any of these words in your answer: {}.",
        words.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ScrapedProduct {
        ScrapedProduct {
            external_id: 1,
            title: "Blue Shirt".to_string(),
            handle: "blue-shirt".to_string(),
            description: "<p>Old copy.</p>".to_string(),
            vendor: "Acme".to_string(),
            product_type: "Shirts".to_string(),
            tags: vec!["cotton".to_string(), "blue".to_string()],
            images: vec![],
            variants: vec![],
            options: vec![],
            source_url: String::new(),
            source_store: "a.com".to_string(),
        }
    }

    #[test]
    fn template_is_used_verbatim_with_context_appended() {
        let prompt = title_prompt(&product(), Some("Make it punchy."), &[]);
        assert!(prompt.starts_with("Make it punchy."));
        assert!(prompt.contains("Product title: Blue Shirt"));
        assert!(prompt.contains("Tags: cotton, blue"));
    }

    #[test]
    fn default_instruction_applies_without_template() {
        let prompt = title_prompt(&product(), None, &[]);
        assert!(prompt.contains("search-engine friendly"));
    }

    #[test]
    fn negative_words_clause_appended_when_denylist_nonempty() {
        let words = vec!["cheap".to_string(), "dropshipping".to_string()];
        let prompt = description_prompt(&product(), None, &words);
        assert!(prompt.contains("Never use any of these words"));
        assert!(prompt.contains("cheap, dropshipping"));
    }

    #[test]
    fn no_clause_for_empty_denylist() {
        let prompt = title_prompt(&product(), None, &[]);
        assert!(!prompt.contains("Never use any of these words"));
    }

    #[test]
    fn first_image_gets_hero_instructions() {
        let prompt = image_enhancement_prompt(&product(), 1);
        assert!(prompt.contains("exactly as they are"));
    }

    #[test]
    fn later_images_get_lifestyle_instructions() {
        let prompt = image_enhancement_prompt(&product(), 2);
        assert!(prompt.contains("lifestyle"));
    }
}
