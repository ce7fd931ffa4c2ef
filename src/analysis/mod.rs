//! Analysis backend boundary
//!
//! The studio never analyzes source code itself. It hands the full source
//! text to an [`AnalysisBackend`] and gets back an [`AnalysisResult`] with:
//! - `errors`: ordered diagnostics (always present, possibly empty)
//! - `context`: optional backend-defined context (e.g. the type environment)
//! - `inference`: optional backend-defined inference output (e.g. inferred types)
//!
//! Only the presence of `context` and `inference` is interpreted here.

pub mod remote;

pub use remote::HttpAnalysisBackend;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Result record returned by one analysis call
///
/// Payloads are normalized while decoding: strings are kept verbatim,
/// structured JSON is pretty-printed, and `null`, `""`, `{}` and `[]`
/// all decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalysisResult {
    /// Diagnostics in backend order
    #[serde(default, deserialize_with = "diagnostic_list")]
    pub errors: Vec<String>,

    /// Context payload, if the backend produced a non-empty one
    #[serde(default, deserialize_with = "optional_payload")]
    pub context: Option<String>,

    /// Inference payload, if the backend produced a non-empty one
    #[serde(default, deserialize_with = "optional_payload")]
    pub inference: Option<String>,
}

impl AnalysisResult {
    /// Result carrying only diagnostics
    pub fn with_errors<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            errors: errors.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Attach a context payload (empty strings stay absent)
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = non_empty(context.into());
        self
    }

    /// Attach an inference payload (empty strings stay absent)
    pub fn inference(mut self, inference: impl Into<String>) -> Self {
        self.inference = non_empty(inference.into());
        self
    }
}

/// The remote analysis call
///
/// Implementations take the whole source text and resolve once with the
/// backend's result. Failures are reported through the crate error type;
/// callers decide how to surface them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze `source` and return the backend's result record
    async fn analyze(&self, source: &str) -> Result<AnalysisResult>;
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Render a JSON payload as display text, or `None` if it carries nothing
fn payload_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => non_empty(text),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => serde_json::to_string_pretty(&other).ok(),
    }
}

fn optional_payload<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(payload_text))
}

fn diagnostic_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .map(|value| match value {
            Value::String(text) => text,
            other => other.to_string(),
        })
        .collect())
}
