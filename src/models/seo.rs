use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::InternalLink;
use super::{Validate, default_language};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoRequest {
    pub content_html: String,
    #[serde(default)]
    pub current_title: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_post_type")]
    pub post_type: String,
}

fn default_post_type() -> String {
    "post".to_string()
}

impl Validate for SeoRequest {
    fn validate(&self) -> Result<(), String> {
        if self.content_html.trim().is_empty() {
            return Err("content_html must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoHeading {
    pub level: String,
    pub text: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoData {
    pub seo_title: String,
    pub meta_desc: String,
    pub slug: String,
    pub suggested_headings: Vec<SeoHeading>,
    pub internal_links: Vec<InternalLink>,
    pub schema_ld_json: Option<Map<String, Value>>,
    pub readability_score: Option<i64>,
    pub keyword_density: Option<BTreeMap<String, f64>>,
    pub suggestions: Vec<String>,
}
