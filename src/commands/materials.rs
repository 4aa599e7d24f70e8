use anyhow::Result;

use crate::api::CatalogSource;
use crate::config::Config;

#[tracing::instrument(skip(config))]
pub async fn materials(config: Config, json: bool) -> Result<()> {
    let client = config.lca_client();
    let (catalog, source) = client.supported_materials_or_fallback().await;

    if source == CatalogSource::Fallback {
        eprintln!(
            "Backend unavailable at {}, showing built-in catalog.",
            client.base_url()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Materials ({}):", catalog.materials.len());
    for material in &catalog.materials {
        println!("  {}", material);
    }
    println!("\nProcesses ({}):", catalog.processes.len());
    for process in &catalog.processes {
        println!("  {}", process);
    }
    Ok(())
}
