use super::{PromptPair, UseCase, push_line, truncate_chars};
use crate::models::SeoRequest;

/// Characters of page content sent to the model.
pub const MAX_SEO_CONTENT_CHARS: usize = 3000;

pub fn schema_type_for(post_type: &str) -> &'static str {
    if post_type == "post" { "Article" } else { "Product" }
}

pub fn build(req: &SeoRequest) -> PromptPair {
    let mut header = String::new();
    push_line(
        &mut header,
        req.current_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| format!("CURRENT TITLE: {t}")),
    );
    push_line(
        &mut header,
        Some(format!("TARGET KEYWORDS: {}", req.keywords.join(", "))),
    );
    push_line(&mut header, Some(format!("LANGUAGE: {}", req.language)));
    push_line(&mut header, Some(format!("CONTENT TYPE: {}", req.post_type)));

    let content = truncate_chars(&req.content_html, MAX_SEO_CONTENT_CHARS);
    let schema_type = schema_type_for(&req.post_type);

    let prompt = format!(
        "Analyze and optimize this content for SEO:\n\n\
        {header}\n\
        CONTENT TO OPTIMIZE:\n\
        {content}\n\n\
        REQUIREMENTS:\n\
        - Generate SEO-optimized title (max 60 characters, include primary keyword)\n\
        - Create compelling meta description (140-160 characters, include keywords + CTA)\n\
        - Generate URL-friendly slug from primary keyword\n\
        - Suggest improved H2/H3 headings for better structure\n\
        - Recommend strategic internal linking opportunities\n\
        - Create appropriate schema.org JSON-LD markup\n\
        - Calculate readability metrics\n\
        - Analyze keyword density\n\
        - Provide actionable SEO improvement suggestions\n\n\
        OUTPUT STRUCTURE (strict JSON):\n\
        {{\n  \
        \"seo_title\": \"Optimized SEO title (max 60 chars)\",\n  \
        \"meta_desc\": \"Compelling meta description (140-160 chars) with CTA\",\n  \
        \"slug\": \"url-friendly-slug-with-keyword\",\n  \
        \"suggested_headings\": [\n    {{\n      \
        \"level\": \"h2\",\n      \
        \"text\": \"Clear, keyword-rich heading\",\n      \
        \"rationale\": \"Why this heading improves SEO and readability\"\n    }}\n  ],\n  \
        \"internal_links\": [\n    {{\n      \
        \"anchor\": \"relevant anchor text\",\n      \
        \"suggested_url\": \"/related-content/\",\n      \
        \"rationale\": \"Why this link adds value\"\n    }}\n  ],\n  \
        \"schema_ld_json\": {{\n    \
        \"@context\": \"https://schema.org\",\n    \
        \"@type\": \"{schema_type}\",\n    \
        \"headline\": \"...\",\n    \
        \"author\": {{\"@type\": \"Person\", \"name\": \"Author\"}},\n    \
        \"datePublished\": \"2024-10-16\"\n  }},\n  \
        \"readability_score\": 65,\n  \
        \"keyword_density\": {{\n    \
        \"keyword1\": 2.3,\n    \
        \"keyword2\": 1.8\n  }},\n  \
        \"suggestions\": [\n    \
        \"Add more subheadings to break up long sections\",\n    \
        \"Reduce keyword density for 'keyword' from 3.5% to 2%\",\n    \
        \"Add internal links to related content\"\n  ]\n}}\n\n\
        Generate the SEO optimization analysis now in strict JSON format:"
    );

    PromptPair {
        prompt,
        system: UseCase::Seo.system_message(),
    }
}
