//! Assessment request submitted to the backend.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http::ApiError;

/// An emission figure supplied by the user, either a number or free text
/// such as `"12 tCO2e"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmissionValue {
    Number(f64),
    Text(String),
}

impl FromStr for EmissionValue {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => EmissionValue::Number(n),
            _ => EmissionValue::Text(trimmed.to_string()),
        })
    }
}

impl fmt::Display for EmissionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmissionValue::Number(n) => write!(f, "{}", n),
            EmissionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parameters of one assessment submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub material: String,
    pub process: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissions: Option<BTreeMap<String, EmissionValue>>,
}

impl AssessmentRequest {
    pub fn new(material: impl Into<String>, process: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            process: process.into(),
            ..Default::default()
        }
    }

    /// Checks required fields and numeric domains before anything is sent.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.material.trim().is_empty() {
            return Err(ApiError::validation("material", "Material is required"));
        }
        if self.process.trim().is_empty() {
            return Err(ApiError::validation("process", "Process is required"));
        }
        if let Some(volume) = self.production_volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(ApiError::validation(
                    "production_volume",
                    format!("Production volume must be a non-negative number, got {}", volume),
                ));
            }
        }
        Ok(())
    }
}
