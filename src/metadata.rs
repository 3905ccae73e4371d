use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// One entry of the blog index. Field order here is the field order written
/// to `blogs.yaml`; keys it does not know about follow them unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostMetadata {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub date: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub thumbnail: String,
    #[serde(flatten)]
    pub extra: Mapping,
}

// Hand-edited indexes may carry unquoted numbers or booleans (`date: 2024`).
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, found {other:?}"
        ))),
    }
}

/// Newest first. Dates are compared as plain strings.
pub(crate) fn sort_post(a: &PostMetadata, b: &PostMetadata) -> Ordering {
    b.date.cmp(&a.date)
}
