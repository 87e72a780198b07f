//! URL extraction from arbitrary JSON documents.

use serde_json::Value;

use super::LinkSet;
use super::error::ExtractError;
use super::text::collect_urls;

/// Decodes `body` as JSON and collects every URL found in its string values.
pub(super) fn extract_json_links(body: &[u8]) -> Result<Vec<String>, ExtractError> {
    let value: Value = serde_json::from_slice(body).map_err(ExtractError::json)?;
    Ok(links_in_value(&value))
}

/// Collects URLs from every string scalar in `value`, at any depth.
///
/// Object members are visited in key order.
pub(super) fn links_in_value(value: &Value) -> Vec<String> {
    let mut links = LinkSet::new();
    walk(value, &mut links);
    links.into_links()
}

fn walk(value: &Value, links: &mut LinkSet) {
    match value {
        Value::Object(map) => {
            for member in map.values() {
                walk(member, links);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, links);
            }
        }
        Value::String(text) => collect_urls(text, links),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}
