use serde_json::Value;

use super::ObjectReader;
use crate::error::LlmError;
use crate::models::{ContentData, InternalLink, MetaData};

pub(crate) fn parse_internal_link(link: &ObjectReader<'_>) -> Result<InternalLink, LlmError> {
    Ok(InternalLink {
        anchor: link.string("anchor")?,
        suggested_url: link.opt_string("suggested_url")?,
        rationale: link.string("rationale")?,
    })
}

/// JSON-LD comes back either as an escaped string or, despite the template,
/// as a raw object; both end up as a string.
fn schema_ld_string(reader: &ObjectReader<'_>) -> Result<Option<String>, LlmError> {
    match reader.get("schema_ld_json") {
        Some(Value::Object(map)) => Ok(Some(Value::Object(map.clone()).to_string())),
        _ => reader.opt_string("schema_ld_json"),
    }
}

pub fn parse_content(value: &Value) -> Result<ContentData, LlmError> {
    let reader = ObjectReader::root(value)?;

    let meta = reader.object("meta")?;
    let meta = MetaData {
        seo_title: meta.string("seo_title")?,
        meta_desc: meta.string("meta_desc")?,
        slug: meta.string("slug")?,
    };

    let internal_links = reader
        .objects("internal_links")?
        .iter()
        .map(parse_internal_link)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContentData {
        title: reader.string("title")?,
        excerpt: reader.string("excerpt")?,
        outline: reader.string_list("outline")?,
        body_html: reader.string("body_html")?,
        meta,
        headings: reader.string_list("headings")?,
        internal_links,
        schema_ld_json: schema_ld_string(&reader)?,
    })
}
