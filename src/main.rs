use anyhow::Context;
use db_container::cli::{Args, ConfigDiscovery, ConfigSource, ExecutionMode, exit_code};
use db_container::container::{ContainerLifecycleManager, LifecycleConfig};
use db_container::env;
use db_container::executor::HostExecutor;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the address line
    let default_filter = if args.verbose {
        "db_container=debug"
    } else {
        "db_container=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        error!("{:#}", e);

        let code = exit_code(&e);
        if code == env::EXIT_RUNTIME_UNAVAILABLE {
            eprintln!("container runtime is not running! start docker or podman and retry");
        }
        std::process::exit(code);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let (file_config, source) =
        ConfigDiscovery::load(args.config.as_deref()).context("failed to load configuration")?;
    let config = args.overrides.apply(file_config);

    match args.mode() {
        ExecutionMode::Up => run_up(config).await,
        ExecutionMode::Status { json } => run_status(config, json).await,
        ExecutionMode::ShowConfig => show_config(&config, &source),
    }
}

async fn run_up(config: LifecycleConfig) -> anyhow::Result<()> {
    let manager = ContainerLifecycleManager::new(Arc::new(HostExecutor::new()), config)?;

    let address = manager.ensure_running().await?;

    println!("{};{}", address.host_address, address.host_port);
    Ok(())
}

async fn run_status(config: LifecycleConfig, json: bool) -> anyhow::Result<()> {
    let manager = ContainerLifecycleManager::new(Arc::new(HostExecutor::new()), config)?;
    manager.client().verify_runtime_available().await?;

    let report = manager.status().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}: {}", report.container_name, report.state);
    if let Some(ref record) = report.record {
        println!("  id:      {}", record.id);
        println!("  status:  {}", record.status_raw);
    }
    match report.address {
        Some(address) => println!("  address: {}", address),
        None => println!("  address: not published"),
    }
    Ok(())
}

fn show_config(config: &LifecycleConfig, source: &ConfigSource) -> anyhow::Result<()> {
    ConfigDiscovery::show_discovery_info();

    match source {
        ConfigSource::File(path) => info!("Effective configuration based on {:?}", path),
        ConfigSource::Defaults => info!("Effective configuration based on built-in defaults"),
    }

    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml_string()?);
    Ok(())
}
