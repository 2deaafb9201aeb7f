use super::{PromptPair, UseCase, truncate_chars};
use crate::models::{BrandSample, BrandTrainRequest};

/// Characters of each sample body kept before concatenation.
pub const MAX_SAMPLE_BODY_CHARS: usize = 500;
/// Characters of the whole concatenation sent to the model.
pub const MAX_SAMPLES_CHARS: usize = 8000;

const SAMPLE_SEPARATOR: &str = "\n---\n";

const BRAND_OUTPUT_SCHEMA: &str = r#"{
  "brand_profile": {
    "tone": "Identified overall tone",
    "sentence_length": "short/medium/long (X-Y words average)",
    "vocabulary_level": "basic/intermediate/advanced",
    "paragraph_structure": "Typical paragraph structure observed",
    "common_phrases": [
      "Recurring phrase 1",
      "Recurring phrase 2",
      "Recurring phrase 3"
    ],
    "writing_style": "Primary writing style description",
    "punctuation_patterns": "Notable punctuation patterns",
    "content_structure": "How content is typically organized"
  },
  "prompt_template": "When writing content, adopt this voice: [tone] tone with [sentence_length] sentences. Use [vocabulary_level] vocabulary. Structure paragraphs as [paragraph_structure]. Incorporate phrases like: [common_phrases]. Follow a [writing_style] style. [Additional specific instructions based on analysis]",
  "analysis": {
    "avg_sentence_length": 17.5,
    "avg_paragraph_length": 3.2,
    "flesch_reading_ease": 62.5,
    "common_words": ["word1", "word2", "word3"]
  }
}"#;

fn render_sample(sample: &BrandSample) -> String {
    let mut text = format!("TITLE: {}\n", sample.title);
    if !sample.excerpt.is_empty() {
        text.push_str(&format!("EXCERPT: {}\n", sample.excerpt));
    }
    text.push_str(&format!(
        "BODY: {}...\n\n",
        truncate_chars(&sample.body, MAX_SAMPLE_BODY_CHARS)
    ));
    text
}

/// Joins the samples into one text block, each body capped and marked with
/// `...`.
pub fn concatenate_samples(samples: &[BrandSample]) -> String {
    samples
        .iter()
        .map(render_sample)
        .collect::<Vec<_>>()
        .join(SAMPLE_SEPARATOR)
}

pub fn build(req: &BrandTrainRequest) -> PromptPair {
    let samples_text = concatenate_samples(&req.samples);
    let samples = truncate_chars(&samples_text, MAX_SAMPLES_CHARS);

    let prompt = format!(
        "Analyze these {count} content samples to extract the brand's unique writing voice and style:\n\n\
        LANGUAGE: {language}\n\
        SAMPLES:\n\
        {samples}\n\n\
        ANALYSIS REQUIREMENTS:\n\
        1. Overall Tone: (professional, casual, friendly, authoritative, enthusiastic, etc.)\n\
        2. Sentence Structure: (average length, complexity, variety)\n\
        3. Vocabulary Level: (basic, intermediate, advanced, technical)\n\
        4. Paragraph Patterns: (length, structure, flow)\n\
        5. Common Phrases: (recurring expressions, transitional phrases, calls-to-action)\n\
        6. Writing Style: (storytelling, instructional, conversational, formal, etc.)\n\
        7. Punctuation Patterns: (use of dashes, semicolons, exclamation marks, etc.)\n\
        8. Content Structure: (how topics are introduced, developed, and concluded)\n\n\
        OUTPUT STRUCTURE (strict JSON):\n\
        {BRAND_OUTPUT_SCHEMA}\n\n\
        Generate the brand voice analysis now in strict JSON format:",
        count = req.samples.len(),
        language = req.language,
    );

    PromptPair {
        prompt,
        system: UseCase::Brand.system_message(),
    }
}
