use serde_json::Value;

use super::ObjectReader;
use crate::error::LlmError;
use crate::models::{CrossSellSuggestion, Faq, ProductData};

pub fn parse_product(value: &Value) -> Result<ProductData, LlmError> {
    let reader = ObjectReader::root(value)?;

    let faqs = reader
        .objects("faqs")?
        .iter()
        .map(|faq| {
            Ok(Faq {
                question: faq.string("question")?,
                answer: faq.string("answer")?,
            })
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    let cross_sell_suggestions = reader
        .objects("cross_sell_suggestions")?
        .iter()
        .map(|item| {
            Ok(CrossSellSuggestion {
                product_type: item.string("product_type")?,
                rationale: item.string("rationale")?,
            })
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    Ok(ProductData {
        seo_title: reader.string("seo_title")?,
        short_desc_html: reader.string("short_desc_html")?,
        long_desc_html: reader.string("long_desc_html")?,
        bullets: reader.string_list("bullets")?,
        faqs,
        meta_desc: reader.string("meta_desc")?,
        tags: reader.string_list("tags")?,
        cross_sell_suggestions,
    })
}
