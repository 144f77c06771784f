//! Wire and storage model of the referrer counter.
//!
//! `HitResponse` is the only body the counting endpoints ever return; its
//! shape is fixed (`{"referer": string|null, "count": integer}`, the key
//! existing clients read) and parsing rejects unknown fields so tests can
//! validate outgoing bodies against it.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted counter for one referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    /// Store-assigned identifier, opaque to callers.
    pub id: String,
    /// Lookup key, compared byte-for-byte.
    pub referrer: String,
    /// Number of hits recorded for `referrer`, starts at 1.
    pub count: i64,
}

/// Response of `GET /count` and `POST /count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HitResponse {
    #[serde(rename = "referer", alias = "referrer")]
    pub referrer: Option<String>,
    pub count: i64,
}

impl HitResponse {
    /// Response for a request that carried no referrer.
    pub fn anonymous() -> Self {
        Self {
            referrer: None,
            count: 0,
        }
    }

    pub fn counted(record: CounterRecord) -> Self {
        Self {
            referrer: Some(record.referrer),
            count: record.count,
        }
    }
}

/// Body of `POST /count`.
///
/// Canonical form is `{"referer": "<url>"}`; `referrer` is accepted as an
/// alias and a bare JSON string is accepted as shorthand. Any other JSON
/// shape, or an object with other keys, is rejected.
#[derive(Debug, Clone)]
pub enum HitRequest {
    Bare(String),
    Field(RefererField),
}

impl<'de> Deserialize<'de> for HitRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(HitRequest::Bare(s)),
            obj @ Value::Object(_) => RefererField::deserialize(obj)
                .map(HitRequest::Field)
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a string or an object with \"referer\", got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefererField {
    #[serde(default, alias = "referrer")]
    pub referer: Option<String>,
}

impl HitRequest {
    /// Referrer carried by the body, `None` when absent or empty.
    pub fn referrer(&self) -> Option<&str> {
        match self {
            HitRequest::Bare(s) => non_empty(Some(s)),
            HitRequest::Field(f) => non_empty(f.referer.as_deref()),
        }
    }
}

/// Treat an empty string the same as a missing referrer.
pub fn non_empty(referrer: Option<&str>) -> Option<&str> {
    referrer.filter(|r| !r.is_empty())
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
}

impl Default for Welcome {
    fn default() -> Self {
        Self {
            message: "Hello. Welcome to the API.".into(),
        }
    }
}
