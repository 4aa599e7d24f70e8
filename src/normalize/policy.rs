//! Tunable constants of the normalizer.

/// Product decisions the normalizer applies to backend text.
///
/// Every field has a default matching what the backend produces today;
/// tests and callers may substitute their own.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationPolicy {
    /// Unit tokens that may follow a number, matched case-insensitively.
    pub unit_tokens: Vec<String>,
    /// Phrases meaning the source declined to quantify a value.
    pub unquantifiable_phrases: Vec<String>,
    /// Entries equal to one of these (after trim) are dropped.
    pub placeholder_exact: Vec<String>,
    /// Entries containing one of these (case-insensitive) are dropped.
    pub placeholder_phrases: Vec<String>,
    /// Marker of a disclaimer entry, kept only when long enough.
    pub hypothetical_marker: String,
    /// Entries carrying the marker are kept when longer than this many chars.
    pub hypothetical_min_len: usize,
    pub unknown_stage: String,
    pub unspecified_cause: String,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            unit_tokens: owned(&["tCO2e", "tCO2", "m³", "m3", "MJ", "kWh", "kg", "tonne"]),
            unquantifiable_phrases: owned(&[
                "negligible",
                "minimal",
                "varies greatly",
                "difficult to estimate",
                "depends on application",
                "highly variable",
            ]),
            placeholder_exact: owned(&["N/A"]),
            placeholder_phrases: owned(&["limited direct circularity"]),
            hypothetical_marker: "hypothetical".to_string(),
            hypothetical_min_len: 30,
            unknown_stage: "Unknown Stage".to_string(),
            unspecified_cause: "Not specified".to_string(),
        }
    }
}

impl NormalizationPolicy {
    /// Whether a recommendation entry is worth keeping.
    pub fn keep_entry(&self, entry: &str) -> bool {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.placeholder_exact.iter().any(|p| p == trimmed) {
            return false;
        }

        let lower = entry.to_lowercase();
        if self
            .placeholder_phrases
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
        {
            return false;
        }
        if lower.contains(&self.hypothetical_marker.to_lowercase()) {
            return entry.chars().count() > self.hypothetical_min_len;
        }
        true
    }

    /// Drops empty, "N/A" and short disclaimer entries, preserving order.
    pub fn filter_placeholders<I, S>(&self, entries: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .filter(|e| self.keep_entry(e.as_ref()))
            .map(|e| e.as_ref().to_string())
            .collect()
    }

    pub(crate) fn is_unquantifiable(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.unquantifiable_phrases
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
    }
}
