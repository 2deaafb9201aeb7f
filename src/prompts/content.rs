use super::{PromptPair, UseCase, or_default, push_line, word_count_for};
use crate::models::{BrandProfile, BrandVoice, ContentRequest};

const CONTENT_OUTPUT_SCHEMA: &str = r#"{
  "title": "Compelling article title (50-60 characters, include primary keyword)",
  "excerpt": "Engaging summary (40-60 words) that hooks the reader",
  "outline": [
    "Introduction",
    "Main Section 1 Title",
    "Main Section 2 Title",
    "Conclusion"
  ],
  "body_html": "<h2>Introduction</h2>\n<p>Opening paragraph...</p>\n<h2>Section 1</h2>\n<p>Content...</p>",
  "meta": {
    "seo_title": "SEO-optimized title (max 60 chars, include primary keyword)",
    "meta_desc": "Compelling meta description (140-160 chars, include keywords, call-to-action)",
    "slug": "url-friendly-slug-with-primary-keyword"
  },
  "headings": ["Introduction", "Main Section 1", "Subsection 1.1", "Main Section 2", "Conclusion"],
  "internal_links": [
    {
      "anchor": "suggested anchor text",
      "suggested_url": "/related-topic/",
      "rationale": "Why this link is relevant"
    }
  ],
  "schema_ld_json": "{\"@context\":\"https://schema.org\",\"@type\":\"Article\",\"headline\":\"...\",...}"
}"#;

fn brand_guidelines(profile: &BrandProfile, tone: &str) -> String {
    let mut block = String::from("BRAND VOICE GUIDELINES:\n");
    push_line(&mut block, Some(format!("- Tone: {}", or_default(&profile.tone, tone))));
    push_line(
        &mut block,
        Some(format!(
            "- Sentence length: {}",
            or_default(&profile.sentence_length, "medium")
        )),
    );
    push_line(
        &mut block,
        Some(format!(
            "- Vocabulary level: {}",
            or_default(&profile.vocabulary_level, "intermediate")
        )),
    );
    push_line(
        &mut block,
        Some(format!(
            "- Writing style: {}",
            or_default(&profile.writing_style, "clear and engaging")
        )),
    );
    push_line(
        &mut block,
        (!profile.common_phrases.is_empty())
            .then(|| format!("- Common phrases to use: {}", profile.common_phrases.join(", "))),
    );
    push_line(
        &mut block,
        profile
            .content_structure
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("- Content structure: {s}")),
    );
    block
}

pub fn build(req: &ContentRequest) -> PromptPair {
    let word_count = word_count_for(&req.length);
    let keywords = req.keywords.join(", ");

    let mut params = String::new();
    push_line(&mut params, Some(format!("TOPIC: {}", req.topic)));
    push_line(&mut params, Some(format!("TARGET KEYWORDS: {keywords}")));
    push_line(&mut params, Some(format!("TONE: {}", req.tone)));
    push_line(&mut params, Some(format!("LENGTH: {word_count}")));
    push_line(&mut params, Some(format!("LANGUAGE: {}", req.language)));
    push_line(
        &mut params,
        req.audience
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .map(|a| format!("Target audience: {a}")),
    );
    if let Some(profile) = BrandVoice::active(req.brand_profile.as_ref()) {
        params.push('\n');
        params.push_str(&brand_guidelines(profile, &req.tone));
    }

    let prompt = format!(
        "Generate a comprehensive blog post/article with the following parameters:\n\n\
        {params}\n\
        REQUIREMENTS:\n\
        - Create an engaging, SEO-optimized article\n\
        - Include H2 and H3 subheadings for structure\n\
        - Write in {language} language\n\
        - Use a {tone} tone\n\
        - Target length: approximately {word_count}\n\
        - Naturally incorporate keywords: {keywords}\n\
        - Include practical examples and actionable tips where appropriate\n\
        - Use short paragraphs (3-4 sentences) for readability\n\
        - Add bullet lists where helpful\n\n\
        OUTPUT STRUCTURE (strict JSON):\n\
        {CONTENT_OUTPUT_SCHEMA}\n\n\
        Generate the complete article now in strict JSON format:",
        language = req.language,
        tone = req.tone,
    );

    PromptPair {
        prompt,
        system: UseCase::Content.system_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::SYSTEM_MESSAGE_BASE;

    fn request(length: &str) -> ContentRequest {
        ContentRequest {
            topic: "Sourdough baking at home".to_string(),
            keywords: vec!["sourdough".to_string(), "starter".to_string()],
            tone: "friendly".to_string(),
            length: length.to_string(),
            language: "en".to_string(),
            audience: None,
            brand_profile: None,
        }
    }

    #[test]
    fn test_short_length_renders_word_range() {
        let pair = build(&request("short"));
        assert!(pair.prompt.contains("LENGTH: 300-500 words"));
        assert!(pair.prompt.contains("Target length: approximately 300-500 words"));
    }

    #[test]
    fn test_unknown_length_falls_back_to_medium() {
        let pair = build(&request("novella"));
        assert!(pair.prompt.contains("LENGTH: 800-1200 words"));
    }

    #[test]
    fn test_optional_blocks_omitted_when_absent() {
        let pair = build(&request("medium"));
        assert!(!pair.prompt.contains("Target audience"));
        assert!(!pair.prompt.contains("BRAND VOICE"));
        assert!(pair.prompt.contains("TARGET KEYWORDS: sourdough, starter"));
        assert!(pair.prompt.contains("\"body_html\""));
        assert_eq!(pair.system, SYSTEM_MESSAGE_BASE);
    }

    #[test]
    fn test_audience_and_brand_voice_rendered() {
        let mut req = request("long");
        req.audience = Some("home bakers".to_string());
        req.brand_profile = Some(BrandVoice {
            enabled: true,
            profile: BrandProfile {
                tone: "warm".to_string(),
                common_phrases: vec!["happy baking".to_string()],
                ..Default::default()
            },
        });

        let pair = build(&req);
        assert!(pair.prompt.contains("Target audience: home bakers"));
        assert!(pair.prompt.contains("BRAND VOICE GUIDELINES:"));
        assert!(pair.prompt.contains("- Tone: warm"));
        assert!(pair.prompt.contains("- Vocabulary level: intermediate"));
        assert!(pair.prompt.contains("- Common phrases to use: happy baking"));
        assert!(!pair.prompt.contains("Content structure"));
    }

    #[test]
    fn test_disabled_brand_voice_is_ignored() {
        let mut req = request("medium");
        req.brand_profile = Some(BrandVoice {
            enabled: false,
            profile: BrandProfile {
                tone: "warm".to_string(),
                ..Default::default()
            },
        });
        assert!(!build(&req).prompt.contains("BRAND VOICE"));
    }
}
