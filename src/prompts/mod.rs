//! Deterministic rendering of requests into `(prompt, system message)` pairs.
//!
//! Every template embeds a worked JSON skeleton of the expected reply, and
//! optional blocks are left out entirely when their input is absent.

pub mod brand;
pub mod content;
pub mod image;
pub mod product;
pub mod seo;

use std::fmt;

pub const SYSTEM_MESSAGE_BASE: &str = "You are an expert SEO content writer and marketing copywriter for WordPress and WooCommerce.

CRITICAL RULES:
1. Respond ONLY with valid JSON. No markdown code blocks, no explanations, no text outside JSON.
2. Follow the exact JSON structure specified in the prompt.
3. Never invent facts, specifications, or claims not provided in the input.
4. Write naturally - avoid keyword stuffing.
5. Be concise and actionable.
6. Use clear, accessible language appropriate for the target audience.";

pub const DEFAULT_WORD_COUNT: &str = "800-1200 words";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCase {
    Content,
    Product,
    Seo,
    Image,
    Brand,
}

impl UseCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            UseCase::Content => "content",
            UseCase::Product => "product",
            UseCase::Seo => "seo",
            UseCase::Image => "image",
            UseCase::Brand => "brand",
        }
    }

    /// Key used to pick the system message specialization. General content
    /// has none.
    fn system_key(&self) -> &'static str {
        match self {
            UseCase::Content => "general",
            other => other.as_str(),
        }
    }

    pub fn system_message(&self) -> String {
        system_message(self.system_key())
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn specialization(key: &str) -> Option<&'static str> {
    match key {
        "product" => Some(
            "You specialize in e-commerce product descriptions that convert browsers into buyers.",
        ),
        "seo" => Some(
            "You specialize in technical SEO optimization and search engine ranking strategies.",
        ),
        "image" => Some(
            "You specialize in visual analysis and creating accessible image descriptions.",
        ),
        "brand" => Some(
            "You specialize in analyzing writing styles and extracting brand voice patterns.",
        ),
        _ => None,
    }
}

/// Base rules plus the specialization for `key`; unknown keys get the base
/// alone.
pub fn system_message(key: &str) -> String {
    match specialization(key) {
        Some(specific) => format!("{SYSTEM_MESSAGE_BASE}\n\n{specific}"),
        None => SYSTEM_MESSAGE_BASE.to_string(),
    }
}

pub fn word_count_for(length: &str) -> &'static str {
    match length {
        "short" => "300-500 words",
        "medium" => DEFAULT_WORD_COUNT,
        "long" => "1500-2500 words",
        _ => DEFAULT_WORD_COUNT,
    }
}

/// First `max` characters of `s`, cut on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub prompt: String,
    pub system: String,
}

/// Appends `line` and a newline, skipping absent optional lines.
pub(crate) fn push_line(out: &mut String, line: Option<String>) {
    if let Some(line) = line {
        out.push_str(&line);
        out.push('\n');
    }
}

pub(crate) fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}
