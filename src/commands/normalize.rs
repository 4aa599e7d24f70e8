use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::normalize::Normalizer;

use super::render_report;

/// Normalizes a saved backend payload. `-` reads from stdin.
pub fn normalize_file(path: &Path, json: bool) -> Result<()> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path.display()))?
    };

    let raw: Value = serde_json::from_str(&content).context("Payload is not valid JSON")?;
    let report = Normalizer::default().normalize(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}
