use serde_json::Value;

use super::ObjectReader;
use crate::error::LlmError;
use crate::models::{BrandAnalysis, BrandProfile, BrandTrainData};

fn parse_profile(profile: &ObjectReader<'_>) -> Result<BrandProfile, LlmError> {
    Ok(BrandProfile {
        tone: profile.string("tone")?,
        sentence_length: profile.string("sentence_length")?,
        vocabulary_level: profile.string("vocabulary_level")?,
        paragraph_structure: profile.opt_string("paragraph_structure")?,
        common_phrases: profile.string_list("common_phrases")?,
        writing_style: profile.string("writing_style")?,
        punctuation_patterns: profile.opt_string("punctuation_patterns")?,
        content_structure: profile.opt_string("content_structure")?,
    })
}

fn parse_analysis(analysis: &ObjectReader<'_>) -> Result<BrandAnalysis, LlmError> {
    Ok(BrandAnalysis {
        avg_sentence_length: analysis.f64_or("avg_sentence_length", 0.0)?,
        avg_paragraph_length: analysis.f64_or("avg_paragraph_length", 0.0)?,
        flesch_reading_ease: analysis.opt_f64("flesch_reading_ease")?,
        common_words: analysis.string_list("common_words")?,
    })
}

pub fn parse_brand(value: &Value) -> Result<BrandTrainData, LlmError> {
    let reader = ObjectReader::root(value)?;

    let brand_profile = parse_profile(&reader.object("brand_profile")?)?;

    let analysis = if reader.has("analysis") {
        Some(parse_analysis(&reader.object("analysis")?)?)
    } else {
        None
    };

    Ok(BrandTrainData {
        brand_profile,
        prompt_template: reader.string("prompt_template")?,
        analysis,
    })
}
