use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use ipgeo::cli::{Cli, Commands, ConfigCommands};
use ipgeo::config::{StaticConfig, init_config};
use ipgeo::runtime::modes::{run_lookup, run_server};
use ipgeo::services::GeoIpDb;
use ipgeo::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Config generation does not need a valid config or logging
    if let Some(Commands::Config {
        action: ConfigCommands::Generate { output_path },
    }) = &cli.command
    {
        match output_path {
            Some(path) => {
                StaticConfig::default().save_to_file(path)?;
                println!("{} Sample configuration written to {}", "✓".bold().green(), path);
            }
            None => print!("{}", StaticConfig::generate_sample_config()),
        }
        return Ok(());
    }

    let config = init_config(&cli.config).inspect_err(|e| eprintln!("{}", e.format_colored()))?;
    let log_guard = init_logging(&config.logging)?;
    if std::path::Path::new(&cli.config).exists() {
        debug!("Configuration loaded from {}", cli.config);
    }

    match cli.command {
        None | Some(Commands::Serve) => run_server(&config).await,
        Some(Commands::Lookup { ips, db, json }) => {
            let path = db.unwrap_or_else(|| config.geoip.database_path.clone());
            let db = GeoIpDb::open(&path).inspect_err(|e| eprintln!("{}", e.format_colored()))?;
            if !run_lookup(&db, &ips, json) {
                drop(log_guard);
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Config { .. }) => Ok(()),
    }
}
