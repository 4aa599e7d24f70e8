use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use lca_client::assessment::{AssessmentRequest, EmissionValue};
use lca_client::commands;
use lca_client::config::{Config, ConfigOptions, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, VERSION};
use lca_client::http::{MAX_RETRIES, RETRY_DELAY_MS, RetryPolicy};

/// lca - lifecycle assessment client
///
/// Submit mining and material parameters to the LCA backend and print the
/// normalized environmental-impact report.
///
/// Examples:
///   lca assess --material "Copper ore" --process Smelting
///   lca materials
#[derive(Parser, Debug)]
#[command(author, version = VERSION, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL
    #[arg(
        long = "api-url",
        env = "LCA_API_URL",
        value_name = "URL",
        default_value = DEFAULT_API_URL,
        global = true
    )]
    pub api_url: String,

    /// API key sent as a bearer token
    #[arg(long = "api-key", env = "LCA_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Maximum attempts per submission
    #[arg(long, value_name = "N", default_value_t = MAX_RETRIES, global = true)]
    pub retries: usize,

    /// Base delay between attempts; grows linearly with the attempt number
    #[arg(long = "retry-delay-ms", value_name = "MS", default_value_t = RETRY_DELAY_MS, global = true)]
    pub retry_delay_ms: u64,

    /// Catalog file replacing the built-in materials and processes
    #[arg(long, env = "LCA_CATALOG", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Submit an assessment
    Assess(AssessArgs),

    /// List supported materials and processes
    Materials(MaterialsArgs),

    /// Check backend health
    Health(HealthArgs),

    /// Normalize a saved backend payload without contacting the backend
    Normalize(NormalizeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct AssessArgs {
    /// Material, e.g. "Copper ore"
    #[arg(long, short = 'm')]
    pub material: String,

    /// Process, e.g. "Smelting"
    #[arg(long, short = 'p')]
    pub process: String,

    /// Site or region
    #[arg(long)]
    pub location: Option<String>,

    /// Production volume (non-negative)
    #[arg(long = "volume", value_name = "AMOUNT")]
    pub production_volume: Option<f64>,

    /// Energy source, e.g. "grid", "hydro"
    #[arg(long = "energy-source")]
    pub energy_source: Option<String>,

    /// Known emission, may be repeated
    #[arg(long = "emission", value_name = "KEY=VALUE", value_parser = commands::parse_emission)]
    pub emissions: Vec<(String, EmissionValue)>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AssessArgs {
    fn into_request(self) -> AssessmentRequest {
        AssessmentRequest {
            material: self.material,
            process: self.process,
            location: self.location,
            production_volume: self.production_volume,
            energy_source: self.energy_source,
            emissions: (!self.emissions.is_empty())
                .then(|| self.emissions.into_iter().collect::<BTreeMap<_, _>>()),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct MaterialsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Query /api/lca/health instead of /health
    #[arg(long)]
    pub api: bool,
}

#[derive(clap::Args, Debug)]
pub struct NormalizeArgs {
    /// Payload file, or - for stdin
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        Config::new(ConfigOptions {
            api_url: Some(self.api_url.clone()),
            api_key: self.api_key.clone(),
            timeout: Some(Duration::from_secs(self.timeout)),
            retry: Some(RetryPolicy::new(
                self.retries,
                Duration::from_millis(self.retry_delay_ms),
            )),
            catalog_path: self.catalog.clone(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Assess(args) => {
            commands::assess(cli.config()?, args.clone().into_request(), args.json).await?
        }
        Commands::Materials(args) => commands::materials(cli.config()?, args.json).await?,
        Commands::Health(args) => commands::health(cli.config()?, args.api).await?,
        Commands::Normalize(args) => commands::normalize_file(&args.file, args.json)?,
    }
    Ok(())
}
