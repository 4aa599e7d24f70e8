//! Numeric extraction from free-text impact values.
//!
//! The backend is an AI service that returns impact figures either as
//! numbers or as prose such as `"1-5 tCO2e/tonne steel"`. Extraction picks
//! one representative number and degrades to 0 when nothing usable is found.

use log::debug;
use regex::Regex;
use serde_json::Value;

use super::policy::NormalizationPolicy;

/// A decimal with optional thousands separators. Signs are never captured.
const NUMBER: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";

/// Compiled unit patterns for one policy.
#[derive(Debug, Clone)]
pub struct NumericExtractor {
    policy: NormalizationPolicy,
    /// `None` when the policy lists no units; only bare numbers are tried.
    range_re: Option<Regex>,
    unit_re: Option<Regex>,
    bare_re: Regex,
}

impl NumericExtractor {
    pub fn new(policy: NormalizationPolicy) -> Result<Self, regex::Error> {
        let (range_re, unit_re) = match unit_alternation(&policy.unit_tokens) {
            Some(units) => (
                Some(Regex::new(&format!(
                    r"(?i){NUMBER}\s*(?:-|–|to)\s*{NUMBER}\s*(?:{units})"
                ))?),
                Some(Regex::new(&format!(r"(?i){NUMBER}\s*(?:{units})"))?),
            ),
            None => {
                debug!("No unit tokens configured, extracting bare numbers only");
                (None, None)
            }
        };
        let bare_re = Regex::new(NUMBER)?;

        Ok(Self {
            policy,
            range_re,
            unit_re,
            bare_re,
        })
    }

    pub fn policy(&self) -> &NormalizationPolicy {
        &self.policy
    }

    /// Extracts a representative number from a JSON value.
    ///
    /// Numbers pass through unchanged; strings go through [`Self::extract_str`];
    /// anything else yields 0.
    pub fn extract(&self, value: &Value) -> f64 {
        match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => self.extract_str(s),
            _ => 0.0,
        }
    }

    /// Extracts a representative number from text.
    ///
    /// Tries, in order: a range followed by a unit (mean of the bounds), a
    /// single value followed by a unit, then the first number anywhere.
    pub fn extract_str(&self, text: &str) -> f64 {
        if self.policy.is_unquantifiable(text) {
            return 0.0;
        }

        if let Some(caps) = self.range_re.as_ref().and_then(|re| re.captures(text)) {
            if let (Some(low), Some(high)) = (parse_number(&caps[1]), parse_number(&caps[2])) {
                return (low + high) / 2.0;
            }
        }

        if let Some(value) = self
            .unit_re
            .as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|caps| parse_number(&caps[1]))
        {
            return value;
        }

        if let Some(value) = self
            .bare_re
            .captures(text)
            .and_then(|caps| parse_number(&caps[1]))
        {
            return value;
        }

        debug!("No numeric value found in {:?}, using 0", text);
        0.0
    }
}

/// Longest tokens first so `tCO2e` wins over `tCO2`. `None` when no
/// non-empty token is left.
fn unit_alternation(tokens: &[String]) -> Option<String> {
    let mut tokens: Vec<&String> = tokens.iter().filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return None;
    }
    tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    Some(
        tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extractor() -> NumericExtractor {
        NumericExtractor::new(NormalizationPolicy::default()).unwrap()
    }

    #[test]
    fn test_range_with_unit_is_averaged() {
        assert_eq!(extractor().extract(&json!("1-5 tCO2e/tonne steel")), 3.0);
        assert_eq!(extractor().extract_str("10 to 20 MJ per tonne"), 15.0);
        assert_eq!(extractor().extract_str("2.5–3.5 kWh"), 3.0);
    }

    #[test]
    fn test_single_value_with_compound_unit() {
        assert_eq!(extractor().extract(&json!("1000 kg CO2e")), 1000.0);
        assert_eq!(extractor().extract_str("approximately 12.5 tonne of slag"), 12.5);
    }

    #[test]
    fn test_cubic_meter_notations() {
        assert_eq!(extractor().extract_str("5000 m³"), 5000.0);
        assert_eq!(extractor().extract_str("5000 m3"), 5000.0);
        assert_eq!(extractor().extract_str("200-400 M³ of process water"), 300.0);
    }

    #[test]
    fn test_units_are_case_insensitive() {
        assert_eq!(extractor().extract_str("3 KWH"), 3.0);
        assert_eq!(extractor().extract_str("7 TCO2E"), 7.0);
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(extractor().extract_str("1,500 kg CO2e"), 1500.0);
        assert_eq!(extractor().extract_str("1,000-3,000 MJ"), 2000.0);
    }

    #[test]
    fn test_unquantifiable_phrases_yield_zero() {
        assert_eq!(extractor().extract(&json!("Negligible impact")), 0.0);
        assert_eq!(extractor().extract(&json!("Varies greatly by region")), 0.0);
        assert_eq!(extractor().extract_str("Highly variable, 10-100 kg"), 0.0);
    }

    #[test]
    fn test_bare_number_fallback() {
        assert_eq!(extractor().extract_str("around 42 units"), 42.0);
    }

    #[test]
    fn test_unit_value_preferred_over_earlier_bare_number() {
        assert_eq!(extractor().extract_str("Stage 2 emits 800 kg"), 800.0);
    }

    #[test]
    fn test_no_number_yields_zero() {
        assert_eq!(extractor().extract_str("unknown"), 0.0);
        assert_eq!(extractor().extract_str(""), 0.0);
    }

    #[test]
    fn test_numeric_passthrough() {
        assert_eq!(extractor().extract(&json!(0)), 0.0);
        assert_eq!(extractor().extract(&json!(42)), 42.0);
        assert_eq!(extractor().extract(&json!(2.75)), 2.75);
    }

    #[test]
    fn test_non_string_non_number_yields_zero() {
        assert_eq!(extractor().extract(&json!(null)), 0.0);
        assert_eq!(extractor().extract(&json!(true)), 0.0);
        assert_eq!(extractor().extract(&json!(["1 kg"])), 0.0);
        assert_eq!(extractor().extract(&json!({"value": 3})), 0.0);
    }

    #[test]
    fn test_string_results_are_non_negative_and_finite() {
        let overflowing = "9".repeat(400);
        let samples = [
            "-40 kg",
            "between -5 and 3 MJ",
            "1e400",
            overflowing.as_str(),
            "0.000 kg",
        ];
        for sample in samples {
            let value = extractor().extract_str(sample);
            assert!(value >= 0.0 && value.is_finite(), "{:?} -> {}", sample, value);
        }
    }

    #[test]
    fn test_custom_unit_tokens() {
        let policy = NormalizationPolicy {
            unit_tokens: vec!["L".to_string()],
            ..Default::default()
        };
        let extractor = NumericExtractor::new(policy).unwrap();
        assert_eq!(extractor.extract_str("Tank 3 holds 10-20 L"), 15.0);
    }

    #[test]
    fn test_empty_unit_tokens_take_first_bare_number() {
        for unit_tokens in [vec![], vec![String::new()]] {
            let policy = NormalizationPolicy {
                unit_tokens,
                ..Default::default()
            };
            let extractor = NumericExtractor::new(policy).unwrap();
            assert_eq!(extractor.extract_str("Phase 2-4 of the plan"), 2.0);
            assert_eq!(extractor.extract_str("Stage 2 emits 800 kg"), 2.0);
        }
    }
}
