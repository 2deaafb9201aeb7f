use super::{PromptPair, UseCase};
use crate::models::ImageRequest;

/// Image analysis is text-only: the model sees the URL, never the pixels.
pub fn build(req: &ImageRequest) -> PromptPair {
    let context = &req.context;
    let language = &req.language;

    let prompt = format!(
        "Analyze this image and provide detailed insights for {context} content.\n\n\
        CONTEXT: {context}\n\
        LANGUAGE: {language}\n\n\
        REQUIREMENTS:\n\
        - Describe what you see in detail\n\
        - Identify key visual features and elements\n\
        - Determine the target audience based on the image\n\
        - Extract selling points or key messages from the visual\n\
        - Generate SEO-friendly alt-text (max 125 characters)\n\
        - Suggest a product category if applicable\n\
        - Rate your confidence in the analysis (0-1)\n\n\
        OUTPUT STRUCTURE (strict JSON):\n\
        {{\n  \
        \"description\": \"Detailed description of the image in {language}\",\n  \
        \"features\": [\n    \
        \"Visual feature 1 (color, shape, composition)\",\n    \
        \"Visual feature 2\",\n    \
        \"Visual feature 3\"\n  ],\n  \
        \"audience\": \"Target audience based on image style and content\",\n  \
        \"selling_points\": [\n    \
        \"Key selling point visible in image\",\n    \
        \"Another visual selling point\"\n  ],\n  \
        \"alt_text\": \"Concise, descriptive alt-text under 125 characters in {language}\",\n  \
        \"suggested_category\": \"Product category if applicable\",\n  \
        \"confidence\": 0.95\n}}\n\n\
        Generate the image analysis now in strict JSON format:\n\n\
        IMAGE URL: {url}",
        url = req.image_url,
    );

    PromptPair {
        prompt,
        system: UseCase::Image.system_message(),
    }
}
