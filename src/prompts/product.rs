use serde_json::Value;

use super::{PromptPair, UseCase, or_default, push_line};
use crate::models::{BrandVoice, ProductRequest};

const PRODUCT_OUTPUT_SCHEMA: &str = r#"{
  "seo_title": "SEO-optimized product title (max 60 chars, include keyword)",
  "short_desc_html": "<p>Compelling 2-3 sentence benefit-focused summary that hooks customers...</p>",
  "long_desc_html": "<h2>Overview</h2>\n<p>Engaging product story...</p>\n<h2>Key Benefits</h2>\n<ul><li>Benefit 1</li></ul>\n<h2>Specifications</h2>...",
  "bullets": [
    "Concise benefit-focused feature point",
    "Another key feature with customer value",
    "Feature that solves a problem"
  ],
  "faqs": [
    {
      "question": "Common customer question?",
      "answer": "Clear, helpful answer addressing customer concern"
    }
  ],
  "meta_desc": "Compelling meta description (140-160 chars) with benefits and call-to-action",
  "tags": ["keyword1", "keyword2", "category", "feature"],
  "cross_sell_suggestions": [
    {
      "product_type": "Complementary Product Name",
      "rationale": "Why this pairs well with the main product"
    }
  ]
}"#;

fn attribute_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bullet_list(items: impl Iterator<Item = String>) -> String {
    items
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build(req: &ProductRequest) -> PromptPair {
    let attributes = bullet_list(
        req.attributes
            .iter()
            .map(|(k, v)| format!("{k}: {}", attribute_value(v))),
    );
    let features = bullet_list(req.features.iter().cloned());
    let usp = bullet_list(req.usp.iter().cloned());

    let mut header = String::new();
    push_line(&mut header, Some(format!("PRODUCT NAME: {}", req.name)));
    push_line(&mut header, Some(format!("CATEGORY: {}", req.category)));
    push_line(
        &mut header,
        req.price.filter(|p| *p > 0.0).map(|p| format!("PRICE: ${p}")),
    );

    let mut brand = String::new();
    if let Some(profile) = BrandVoice::active(req.brand_profile.as_ref()) {
        brand.push_str("\nBRAND VOICE:\n");
        push_line(
            &mut brand,
            Some(format!(
                "- Write in a {} tone",
                or_default(&profile.tone, &req.tone)
            )),
        );
        push_line(
            &mut brand,
            Some(format!(
                "- {}",
                or_default(&profile.writing_style, "Clear and benefit-focused")
            )),
        );
    }

    let prompt = format!(
        "Generate compelling WooCommerce product content with the following details:\n\n\
        {header}\n\
        ATTRIBUTES/SPECIFICATIONS:\n\
        {attributes}\n\n\
        KEY FEATURES:\n\
        {features}\n\n\
        UNIQUE SELLING POINTS:\n\
        {usp}\n\n\
        TARGET KEYWORDS: {keywords}\n\
        TONE: {tone}\n\
        LANGUAGE: {language}\n\
        {brand}\n\
        REQUIREMENTS:\n\
        - Write benefit-focused, persuasive copy\n\
        - Emphasize how features solve customer problems\n\
        - Use {language} language\n\
        - Maintain a {tone} tone\n\
        - Create scannable content with clear sections\n\
        - Focus on customer benefits, not just features\n\
        - Generate realistic, helpful FAQs (5-7 questions)\n\
        - Suggest complementary products for cross-selling\n\n\
        OUTPUT STRUCTURE (strict JSON):\n\
        {PRODUCT_OUTPUT_SCHEMA}\n\n\
        Generate the complete product content now in strict JSON format:",
        keywords = req.keywords.join(", "),
        tone = req.tone,
        language = req.language,
    );

    PromptPair {
        prompt,
        system: UseCase::Product.system_message(),
    }
}
