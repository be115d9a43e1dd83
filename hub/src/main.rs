use anyhow::Result;
use clap::{Parser, Subcommand};

use hub::config::HubConfig;
use hub::registry::ToolService;
use hub::web;
use hub_common::HealthResponse;

#[derive(Parser)]
#[command(name = "hub")]
#[command(about = "HubApp backend: tool registry, file proxy, chat relay, remote desktop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hub server
    Serve {
        /// Bind address
        #[arg(long, env = "HUB_HOST")]
        host: Option<String>,
        /// Bind port
        #[arg(long, env = "HUB_PORT")]
        port: Option<u16>,
        /// Dev mode: error detail in responses, dev fallback page
        #[arg(long)]
        dev: bool,
    },
    /// Print the effective tool registry without starting the server
    Tools,
    /// Probe a running hub's health endpoint
    Health {
        /// Base URL of the hub
        #[arg(long, env = "HUB_URL", default_value = "http://localhost:3001")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    hub_common::init_tracing("hub")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, dev } => {
            let mut config = HubConfig::load()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            web::serve(config, dev).await?;
        }
        Commands::Tools => {
            run_tools()?;
        }
        Commands::Health { url } => {
            run_health(&url).await?;
        }
    }

    Ok(())
}

/// Handle the `tools` command - print the seeded registry
fn run_tools() -> Result<()> {
    let config = HubConfig::load()?;
    let service = ToolService::from_config(&config.tools);
    let tools = service.registered_tools();

    println!("=== Registered tools ({}) ===\n", tools.len());
    for tool in tools {
        let status = if tool.enabled { "enabled" } else { "disabled" };
        println!("  {} [{}] {} - {}", tool.name, tool.kind, status, tool.url);
        if !tool.description.is_empty() {
            println!("      {}", tool.description);
        }
    }

    Ok(())
}

/// Handle the `health` command - probe a running hub
async fn run_health(url: &str) -> Result<()> {
    let probe_url = format!("{}/health", url.trim_end_matches('/'));
    println!("Probing {} ...", probe_url);

    let response = reqwest::get(&probe_url).await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("health probe failed: {}", status);
    }

    let health: HealthResponse = response.json().await?;
    println!(
        "status: {}\nversion: {}\ntimestamp: {}",
        health.status, health.version, health.timestamp
    );

    Ok(())
}
