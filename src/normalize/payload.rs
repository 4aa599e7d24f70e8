//! Shapes the backend may answer with.

use serde_json::{Map, Value};

/// The two payload shapes accepted from the backend.
///
/// Collapsed to `(stages, metadata)` right at the boundary so nothing
/// downstream branches on shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// `{ success, data: [...], metadata: {...} }`
    ///
    /// `upstream_total` holds a `total_impact` the backend sent alongside the
    /// stages, either top-level or inside `metadata`. It is never trusted.
    Envelope {
        data: Vec<Value>,
        metadata: Metadata,
        upstream_total: Option<Value>,
    },
    /// Legacy bare array of stages.
    Bare(Vec<Value>),
}

impl From<&Value> for RawPayload {
    fn from(value: &Value) -> Self {
        match value {
            Value::Array(stages) => RawPayload::Bare(stages.clone()),
            Value::Object(obj) => {
                let metadata = obj
                    .get("metadata")
                    .and_then(Value::as_object)
                    .cloned()
                    .map(Metadata)
                    .unwrap_or_default();
                let upstream_total = obj
                    .get("total_impact")
                    .or_else(|| metadata.0.get("total_impact"))
                    .cloned();
                RawPayload::Envelope {
                    data: obj
                        .get("data")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default(),
                    metadata,
                    upstream_total,
                }
            }
            _ => RawPayload::Envelope {
                data: Vec::new(),
                metadata: Metadata::default(),
                upstream_total: None,
            },
        }
    }
}

impl RawPayload {
    /// Processing time reported by the backend, if any.
    pub fn processing_time_ms(&self) -> Option<u64> {
        match self {
            RawPayload::Envelope { metadata, .. } => metadata.processing_time_ms(),
            RawPayload::Bare(_) => None,
        }
    }

    /// Aggregate the backend computed itself, if it sent one.
    pub fn upstream_total(&self) -> Option<&Value> {
        match self {
            RawPayload::Envelope { upstream_total, .. } => upstream_total.as_ref(),
            RawPayload::Bare(_) => None,
        }
    }

    pub fn into_parts(self) -> (Vec<Value>, Metadata) {
        match self {
            RawPayload::Envelope { data, metadata, .. } => (data, metadata),
            RawPayload::Bare(stages) => (stages, Metadata::default()),
        }
    }
}

/// Response metadata. Only a few keys are interpreted; the rest is kept
/// for callers that want it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata(pub Map<String, Value>);

impl Metadata {
    pub fn request_id(&self) -> Option<String> {
        match self.0.get("request_id")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Upstream processing time in ms. Zero, negative and non-numeric values
    /// count as absent.
    pub fn processing_time_ms(&self) -> Option<u64> {
        let ms = match self.0.get("processing_time_ms")? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (ms.is_finite() && ms > 0.0).then(|| ms.round() as u64)
    }
}
