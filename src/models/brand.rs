use serde::{Deserialize, Serialize};

use super::{Validate, default_language};

pub const MIN_BRAND_SAMPLES: usize = 10;

/// A content owner's writing style.
///
/// Produced by brand training and accepted back (wrapped in [`BrandVoice`])
/// to steer later generations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandProfile {
    pub tone: String,
    pub sentence_length: String,
    pub vocabulary_level: String,
    pub paragraph_structure: Option<String>,
    pub common_phrases: Vec<String>,
    pub writing_style: String,
    pub punctuation_patterns: Option<String>,
    pub content_structure: Option<String>,
}

/// Brand profile as sent by the CMS, with the on/off switch it stores
/// alongside the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandVoice {
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub profile: BrandProfile,
}

impl BrandVoice {
    /// The profile to apply, if the voice is switched on.
    pub fn active(voice: Option<&BrandVoice>) -> Option<&BrandProfile> {
        voice.filter(|v| v.enabled).map(|v| &v.profile)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSample {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandTrainRequest {
    pub samples: Vec<BrandSample>,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Validate for BrandTrainRequest {
    fn validate(&self) -> Result<(), String> {
        if self.samples.len() < MIN_BRAND_SAMPLES {
            return Err(format!(
                "samples must contain at least {MIN_BRAND_SAMPLES} items, got {}",
                self.samples.len()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAnalysis {
    pub avg_sentence_length: f64,
    pub avg_paragraph_length: f64,
    pub flesch_reading_ease: Option<f64>,
    pub common_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandTrainData {
    pub brand_profile: BrandProfile,
    pub prompt_template: String,
    pub analysis: Option<BrandAnalysis>,
}
