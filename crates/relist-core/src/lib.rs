//! Canonical domain types and configuration for the relist workspace.
//!
//! Everything downstream of the scraper operates on the types defined
//! here: [`ScrapedProduct`] and friends are the normalized product
//! representation, [`OptimizedProduct`] carries AI-rewritten content
//! alongside the originals, and [`StoreSettings`] is the per-shop
//! configuration record that governs pricing and publishing.

pub mod app_config;
pub mod config;
pub mod products;
pub mod settings;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    EnhancedImage, OptimizedProduct, ProductImage, ProductOption, ProductVariant, ScrapedProduct,
};
pub use settings::StoreSettings;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
