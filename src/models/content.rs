use serde::{Deserialize, Serialize};

use super::brand::BrandVoice;
use super::{MAX_KEYWORDS, Validate, default_language, default_tone};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_length")]
    pub length: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub brand_profile: Option<BrandVoice>,
}

fn default_length() -> String {
    "medium".to_string()
}

impl Validate for ContentRequest {
    fn validate(&self) -> Result<(), String> {
        let topic_len = self.topic.chars().count();
        if !(5..=200).contains(&topic_len) {
            return Err(format!(
                "topic must be between 5 and 200 characters, got {topic_len}"
            ));
        }
        if self.keywords.len() > MAX_KEYWORDS {
            return Err(format!(
                "keywords must contain at most {MAX_KEYWORDS} items, got {}",
                self.keywords.len()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    pub seo_title: String,
    pub meta_desc: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalLink {
    pub anchor: String,
    pub suggested_url: Option<String>,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentData {
    pub title: String,
    pub excerpt: String,
    pub outline: Vec<String>,
    pub body_html: String,
    pub meta: MetaData,
    pub headings: Vec<String>,
    pub internal_links: Vec<InternalLink>,
    pub schema_ld_json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_request_defaults() {
        let request: ContentRequest =
            serde_json::from_str(r#"{"topic": "Composting at home"}"#).unwrap();
        assert_eq!(request.tone, "professional");
        assert_eq!(request.length, "medium");
        assert_eq!(request.language, "en");
        assert!(request.keywords.is_empty());
        assert!(request.audience.is_none());
        assert!(request.brand_profile.is_none());
    }

    #[test]
    fn test_content_request_topic_bounds() {
        let mut request: ContentRequest =
            serde_json::from_str(r#"{"topic": "Tea"}"#).unwrap();
        assert!(request.validate().is_err());

        request.topic = "x".repeat(201);
        assert!(request.validate().is_err());

        request.topic = "Green tea".to_string();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_content_request_keyword_limit() {
        let mut request: ContentRequest =
            serde_json::from_str(r#"{"topic": "Green tea benefits"}"#).unwrap();
        request.keywords = (0..11).map(|i| format!("kw{i}")).collect();
        assert!(request.validate().is_err());
        request.keywords.truncate(10);
        assert!(request.validate().is_ok());
    }
}
