use anyhow::Result;
use log::warn;

use crate::assessment::{AssessmentRequest, EmissionValue};
use crate::config::Config;
use crate::http::SubmissionState;
use crate::normalize::Normalizer;
use crate::pipeline::Assessor;

use super::render_report;

/// Parses a `KEY=VALUE` emission argument.
pub fn parse_emission(s: &str) -> Result<(String, EmissionValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid emission '{}'. Expected KEY=VALUE.", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid emission '{}'. Key must not be empty.", s));
    }
    let value = value
        .parse::<EmissionValue>()
        .map_err(|e| e.to_string())?;
    Ok((key.to_string(), value))
}

#[tracing::instrument(skip(config, request))]
pub async fn assess(config: Config, request: AssessmentRequest, json: bool) -> Result<()> {
    if !config.catalog.contains_material(&request.material) {
        warn!("Material '{}' is not in the known catalog", request.material);
    }
    if !config.catalog.contains_process(&request.process) {
        warn!("Process '{}' is not in the known catalog", request.process);
    }

    let assessor = Assessor::new(config.lca_client(), Normalizer::default(), config.retry);
    let report = assessor
        .submit_observed(&request, report_progress)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

fn report_progress(state: SubmissionState) {
    if let SubmissionState::Retrying { attempt, delay } = state {
        eprintln!(
            "Attempt {} failed, retrying in {:.1}s...",
            attempt,
            delay.as_secs_f64()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_emission_number() {
        assert_eq!(
            parse_emission("co2=12.5").unwrap(),
            ("co2".to_string(), EmissionValue::Number(12.5))
        );
    }

    #[test]
    fn test_parse_emission_text() {
        assert_eq!(
            parse_emission("so2 = 3 kg per tonne").unwrap(),
            ("so2".to_string(), EmissionValue::Text("3 kg per tonne".to_string()))
        );
    }

    #[test]
    fn test_parse_emission_invalid() {
        assert!(parse_emission("co2").is_err());
        assert!(parse_emission("=5").is_err());
    }
}
