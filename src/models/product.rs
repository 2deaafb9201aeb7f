use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::brand::BrandVoice;
use super::{Validate, default_language, default_tone};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub usp: Vec<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub brand_profile: Option<BrandVoice>,
}

impl Validate for ProductRequest {
    fn validate(&self) -> Result<(), String> {
        let name_len = self.name.chars().count();
        if !(3..=200).contains(&name_len) {
            return Err(format!(
                "name must be between 3 and 200 characters, got {name_len}"
            ));
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossSellSuggestion {
    pub product_type: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    pub seo_title: String,
    pub short_desc_html: String,
    pub long_desc_html: String,
    pub bullets: Vec<String>,
    pub faqs: Vec<Faq>,
    pub meta_desc: String,
    pub tags: Vec<String>,
    pub cross_sell_suggestions: Vec<CrossSellSuggestion>,
}
