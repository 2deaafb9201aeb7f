use std::collections::BTreeMap;

use serde_json::Value;

use super::ObjectReader;
use super::content::parse_internal_link;
use crate::error::LlmError;
use crate::models::{SeoData, SeoHeading};

pub const DEFAULT_HEADING_LEVEL: &str = "h2";

fn keyword_density(reader: &ObjectReader<'_>) -> Result<Option<BTreeMap<String, f64>>, LlmError> {
    let Some(map) = reader.opt_object("keyword_density")? else {
        return Ok(None);
    };

    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(keyword, density)| {
            let parsed = match density {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
                _ => None,
            };
            parsed.map(|d| (keyword.clone(), d)).ok_or_else(|| {
                LlmError::malformed(format!(
                    "keyword_density.{keyword}: expected a number"
                ))
            })
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}

pub fn parse_seo(value: &Value) -> Result<SeoData, LlmError> {
    let reader = ObjectReader::root(value)?;

    let suggested_headings = reader
        .objects("suggested_headings")?
        .iter()
        .map(|heading| {
            Ok(SeoHeading {
                level: heading
                    .opt_string("level")?
                    .unwrap_or_else(|| DEFAULT_HEADING_LEVEL.to_string()),
                text: heading.string("text")?,
                rationale: heading.string("rationale")?,
            })
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    let internal_links = reader
        .objects("internal_links")?
        .iter()
        .map(parse_internal_link)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SeoData {
        seo_title: reader.string("seo_title")?,
        meta_desc: reader.string("meta_desc")?,
        slug: reader.string("slug")?,
        suggested_headings,
        internal_links,
        schema_ld_json: reader.opt_object("schema_ld_json")?.cloned(),
        readability_score: reader.opt_i64("readability_score")?,
        keyword_density: keyword_density(&reader)?,
        suggestions: reader.string_list("suggestions")?,
    })
}
