pub mod brand;
pub mod content;
pub mod envelope;
pub mod image;
pub mod product;
pub mod seo;

pub use brand::{BrandAnalysis, BrandProfile, BrandSample, BrandTrainData, BrandTrainRequest, BrandVoice};
pub use content::{ContentData, ContentRequest, InternalLink, MetaData};
pub use envelope::{ApiResponse, ErrorBody, ResponseMetadata};
pub use image::{ImageData, ImageRequest};
pub use product::{CrossSellSuggestion, Faq, ProductData, ProductRequest};
pub use seo::{SeoData, SeoHeading, SeoRequest};

pub const MAX_KEYWORDS: usize = 10;

/// Field-level invariants of an incoming request.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub(crate) fn default_tone() -> String {
    "professional".to_string()
}

pub(crate) fn default_language() -> String {
    "en".to_string()
}
