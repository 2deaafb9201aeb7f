use serde::{Deserialize, Serialize};

use super::{Validate, default_language};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub image_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_context() -> String {
    "product".to_string()
}

impl Validate for ImageRequest {
    fn validate(&self) -> Result<(), String> {
        if self.image_url.trim().is_empty() {
            return Err("image_url must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub description: String,
    pub features: Vec<String>,
    pub audience: String,
    pub selling_points: Vec<String>,
    pub alt_text: String,
    pub suggested_category: Option<String>,
    pub confidence: f64,
}
