//! CLI entry point for the lansweep subnet scanner.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use lansweep_discover::config::DiscoverConfig;
use lansweep_discover::discovery::NmapDiscovery;
use lansweep_discover::enrich::Enricher;
use lansweep_discover::iface::SystemInterfaces;
use lansweep_discover::pipeline::Scanner;
use lansweep_discover::render::{self, OutputFormat};

#[derive(Parser)]
#[command(name = "lansweep")]
#[command(about = "Discover devices on the local /24 subnet")]
struct Cli {
    /// Sweep the /24 containing this address instead of the local one.
    #[arg(long)]
    from: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Path to the nmap binary.
    #[arg(long)]
    nmap_path: Option<String>,

    /// Ask nmap for XML output instead of the text report.
    #[arg(long)]
    xml: bool,

    /// Maximum devices enriched concurrently.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Sweep timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file prefix (default: lansweep).
    #[arg(short, long, default_value = "lansweep")]
    config: String,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = resolve_config(&cli)?;

    let nmap = NmapDiscovery::from_config(&config);
    let version = nmap.verify_installation().await?;
    tracing::info!(nmap_version = %version.lines().next().unwrap_or_default().trim(), "Nmap verified");

    let scanner = Scanner::new(
        Arc::new(SystemInterfaces),
        Arc::new(nmap),
        Enricher::system(config.lookup_timeout()),
        config.max_concurrent_lookups,
    );

    let outcome = scanner.run_scan(cli.from.as_deref()).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render(&outcome, cli.format, &mut out)?;
    out.flush()?;

    Ok(())
}

/// Config file and environment, with command-line flags taking precedence.
fn resolve_config(cli: &Cli) -> anyhow::Result<DiscoverConfig> {
    let mut config = DiscoverConfig::load(&cli.config)?;

    if let Some(path) = &cli.nmap_path {
        config.nmap_path = path.clone();
    }
    if cli.xml {
        config.structured_output = true;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrent_lookups = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.discovery_timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}
