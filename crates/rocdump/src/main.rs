//! ROC Plus diagnostic dump tool
//!
//! Connects to a device, bootstraps the configuration snapshots, and
//! prints them as JSON. Also handy for one-off clock and parameter reads
//! when commissioning a unit.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rocclient::{ClientConfig, RocClient};
use roctlp::TlpInstance;
use std::time::Duration;
use tracing::debug;

#[derive(Parser)]
#[command(name = "rocdump")]
#[command(about = "ROC Plus device configuration dump", long_about = None)]
struct Cli {
    /// Device IP address (numeric)
    #[arg(long, env = "ROC_HOST")]
    host: String,

    /// Device TCP port
    #[arg(long, env = "ROC_PORT", default_value_t = 4000)]
    port: u16,

    /// ROC unit address
    #[arg(long, default_value_t = 240)]
    roc_address: u8,

    /// ROC group
    #[arg(long, default_value_t = 240)]
    roc_group: u8,

    /// Host address to present
    #[arg(long, default_value_t = 1)]
    host_address: u8,

    /// Host group to present
    #[arg(long, default_value_t = 0)]
    host_group: u8,

    /// Per-read deadline in seconds
    #[arg(long, default_value_t = 15.0)]
    read_timeout: f64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the full device configuration as JSON
    Config,
    /// Read the device clock
    Clock,
    /// Read one parameter by its TLP numbers
    Read {
        point_type: u8,
        logical_number: u8,
        parameter: u8,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClientConfig::new(cli.host, cli.port, cli.roc_address, cli.roc_group)
        .with_host_address(cli.host_address, cli.host_group)
        .with_read_timeout(Duration::from_secs_f64(cli.read_timeout));
    let client = RocClient::new(config).context("invalid client configuration")?;

    debug!("connecting to device");
    match cli.command {
        Commands::Config => {
            let json = client
                .with_connection(|| async { client.dump_config_json().await })
                .await
                .context("failed to read device configuration")?;
            println!("{json}");
        }
        Commands::Clock => {
            let time = client
                .with_connection(|| async { client.get_clock_time().await })
                .await
                .context("failed to read device clock")?;
            println!("{time}");
        }
        Commands::Read {
            point_type,
            logical_number,
            parameter,
        } => {
            let value = client
                .with_connection(|| async {
                    client
                        .read_tlp(TlpInstance::new(point_type, logical_number, parameter))
                        .await
                })
                .await
                .context("failed to read parameter")?;
            let name = value.tlp.parameter_def().name.clone();
            println!(
                "({point_type}, {logical_number}, {parameter}) {name} = {}",
                value.value
            );
        }
    }
    Ok(())
}
