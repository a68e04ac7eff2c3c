use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{BambuserError, Result};

/// Query parameters accepted by the list endpoints.
pub const ACCEPTED_QUERY_PARAMETERS: [&str; 8] = [
    "after",
    "byAuthors",
    "createdAfter",
    "createdBefore",
    "hasAllTags",
    "hasAnyTags",
    "limit",
    "titleContains",
];

/// Typed filter for `list` / `paginate`.
///
/// Any `serde::Serialize` mapping is accepted by the list operations as well,
/// so `serde_json::json!({ "limit": 10 })` works too; this struct just keeps
/// the keys spelled correctly.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Comma-separated author names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_authors: Option<String>,
    /// Unix timestamp (seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<i64>,
    /// Unix timestamp (seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<i64>,
    /// Comma-separated tags; all must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_all_tags: Option<String>,
    /// Comma-separated tags; any may match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_any_tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_contains: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn by_authors(mut self, authors: impl Into<String>) -> Self {
        self.by_authors = Some(authors.into());
        self
    }

    pub fn created_after(mut self, ts: i64) -> Self {
        self.created_after = Some(ts);
        self
    }

    pub fn created_before(mut self, ts: i64) -> Self {
        self.created_before = Some(ts);
        self
    }

    pub fn has_all_tags(mut self, tags: impl Into<String>) -> Self {
        self.has_all_tags = Some(tags.into());
        self
    }

    pub fn has_any_tags(mut self, tags: impl Into<String>) -> Self {
        self.has_any_tags = Some(tags.into());
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn title_contains(mut self, text: impl Into<String>) -> Self {
        self.title_contains = Some(text.into());
        self
    }
}

/// Serialize a caller query and check every key against the accepted set.
///
/// Fails with [`BambuserError::UnsupportedQueryParameter`] naming the first
/// offending key, or carrying `None` when the query is not a mapping.
pub(crate) fn validate_query<Q: Serialize + ?Sized>(query: &Q) -> Result<Map<String, Value>> {
    let value = serde_json::to_value(query)
        .map_err(|e| BambuserError::InvalidArgument(format!("query is not serializable: {e}")))?;

    let Value::Object(map) = value else {
        return Err(BambuserError::UnsupportedQueryParameter(None));
    };

    if let Some(key) = map
        .keys()
        .find(|k| !ACCEPTED_QUERY_PARAMETERS.contains(&k.as_str()))
    {
        return Err(BambuserError::UnsupportedQueryParameter(Some(key.clone())));
    }

    Ok(map)
}

/// Flatten a validated query into URL query pairs.
///
/// Nulls are dropped, arrays repeat their key, nested objects are sent as JSON.
pub(crate) fn to_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(query.len());
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        pairs.push((key.clone(), s));
                    }
                }
            }
            other => {
                if let Some(s) = scalar_to_string(other) {
                    pairs.push((key.clone(), s));
                }
            }
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
