use serde_json::Value;

use super::ObjectReader;
use crate::error::LlmError;
use crate::models::ImageData;

pub const MAX_ALT_TEXT_CHARS: usize = 125;
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Alt text longer than 125 characters is cut to 122 plus `...`.
pub fn clamp_alt_text(alt_text: String) -> String {
    if alt_text.chars().count() <= MAX_ALT_TEXT_CHARS {
        return alt_text;
    }
    let mut clamped: String = alt_text.chars().take(MAX_ALT_TEXT_CHARS - 3).collect();
    clamped.push_str("...");
    clamped
}

pub fn parse_image(value: &Value) -> Result<ImageData, LlmError> {
    let reader = ObjectReader::root(value)?;

    Ok(ImageData {
        description: reader.string("description")?,
        features: reader.string_list("features")?,
        audience: reader.string("audience")?,
        selling_points: reader.string_list("selling_points")?,
        alt_text: clamp_alt_text(reader.string("alt_text")?),
        suggested_category: reader.opt_string("suggested_category")?,
        confidence: reader.f64_or("confidence", DEFAULT_CONFIDENCE)?,
    })
}
