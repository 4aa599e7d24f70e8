//! Backend response normalization.
//!
//! Turns the loosely typed payload of the assessment backend into an
//! [`AssessmentReport`]. Normalization is total: every missing or malformed
//! field degrades to a default instead of failing the report.

mod extract;
mod payload;
mod policy;

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde_json::Value;

use crate::report::{AssessmentReport, ImpactMetrics, LifecycleStage};

pub use extract::NumericExtractor;
pub use payload::{Metadata, RawPayload};
pub use policy::NormalizationPolicy;

/// Verbose upstream key first, canonical key second.
const IMPACT_KEYS: [(&str, &str); 4] = [
    ("carbon_emission", "carbon"),
    ("water_usage", "water"),
    ("energy_consumption", "energy"),
    ("waste", "waste"),
];

/// Converts backend payloads into reports. Immutable and shareable.
#[derive(Debug, Clone)]
pub struct Normalizer {
    extractor: NumericExtractor,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizationPolicy::default()).expect("default unit patterns are valid regexes")
    }
}

impl Normalizer {
    pub fn new(policy: NormalizationPolicy) -> Result<Self, regex::Error> {
        Ok(Self {
            extractor: NumericExtractor::new(policy)?,
        })
    }

    pub fn policy(&self) -> &NormalizationPolicy {
        self.extractor.policy()
    }

    /// See [`NumericExtractor::extract`].
    pub fn extract_numeric_value(&self, value: &Value) -> f64 {
        self.extractor.extract(value)
    }

    /// See [`NormalizationPolicy::filter_placeholders`].
    pub fn filter_placeholders<I, S>(&self, entries: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy().filter_placeholders(entries)
    }

    /// Normalizes a payload using the system clock for defaults.
    pub fn normalize(&self, raw: &Value) -> AssessmentReport {
        self.normalize_at(raw, now_ms())
    }

    /// Normalizes a payload; `now_ms` is used for the default processing
    /// time and generated request id.
    pub fn normalize_at(&self, raw: &Value, now_ms: u64) -> AssessmentReport {
        self.normalize_payload(RawPayload::from(raw), now_ms)
    }

    pub fn normalize_payload(&self, payload: RawPayload, now_ms: u64) -> AssessmentReport {
        if let Some(upstream) = payload.upstream_total() {
            debug!("Ignoring upstream total_impact {}, recomputing from stages", upstream);
        }
        let (data, metadata) = payload.into_parts();

        let stages: Vec<LifecycleStage> = data.iter().map(|s| self.normalize_stage(s)).collect();
        let total_impact = AssessmentReport::sum_stages(&stages);

        debug!(
            "Normalized {} stages, total carbon {}",
            stages.len(),
            total_impact.carbon
        );

        AssessmentReport {
            stages,
            total_impact,
            processing_time: metadata.processing_time_ms().unwrap_or(now_ms),
            request_id: metadata
                .request_id()
                .unwrap_or_else(|| format!("lca_{}", now_ms)),
        }
    }

    fn normalize_stage(&self, stage: &Value) -> LifecycleStage {
        let policy = self.policy();

        LifecycleStage {
            stage: non_empty_str(stage.get("stage")).unwrap_or_else(|| policy.unknown_stage.clone()),
            impact: self.normalize_impact(stage.get("impact")),
            main_cause: non_empty_str(stage.get("main_cause"))
                .unwrap_or_else(|| policy.unspecified_cause.clone()),
            alternative_methods: self.string_list(stage.get("alternative_methods")),
            reduction_suggestions: self.string_list(stage.get("reduction_suggestions")),
            circularity_opportunities: self.string_list(stage.get("circularity_opportunities")),
        }
    }

    fn normalize_impact(&self, impact: Option<&Value>) -> ImpactMetrics {
        let [carbon, water, energy, waste] = IMPACT_KEYS.map(|(alias, canonical)| {
            impact
                .and_then(|i| {
                    i.get(alias)
                        .filter(|v| is_truthy(v))
                        .or_else(|| i.get(canonical))
                })
                .map(|v| self.extractor.extract(v))
                .unwrap_or(0.0)
        });

        ImpactMetrics {
            carbon,
            water,
            energy,
            waste,
        }
    }

    fn string_list(&self, value: Option<&Value>) -> Vec<String> {
        let Some(items) = value.and_then(Value::as_array) else {
            return Vec::new();
        };
        self.filter_placeholders(items.iter().filter_map(Value::as_str))
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
