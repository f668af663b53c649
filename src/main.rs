//! Meta-transaction relay daemon entrypoint.
//!
//! By default, boots the supervisor and runs until a shutdown signal.
//! A handful of operational subcommands exit after running:
//!
//! - `migrate up|down|up-to <v>|down-to <v>` — drives the request-store schema.
//! - `print-kms-address <key-id>` — resolves the address behind a KMS key, without
//!   starting any worker.

mod config;
mod monitoring;
mod sig_down;
mod supervisor;
mod telemetry;

use clap::Parser;
use dotenvy::dotenv;

use crate::config::{CliArgs, Command, MigrateDirection};
use crate::telemetry::Telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _telemetry = Telemetry::new();

    let args = CliArgs::parse();

    match args.command {
        Some(Command::Migrate { direction }) => run_migration(&args.settings, direction).await,
        Some(Command::PrintKmsAddress { key_id }) => print_kms_address(&args.settings, key_id).await,
        None => Ok(supervisor::run(args.settings).await?),
    }
}

async fn run_migration(
    settings: &config::Settings,
    direction: MigrateDirection,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = sqlx::postgres::PgPoolOptions::new().max_connections(1).connect(&settings.database_url).await?;
    match direction {
        MigrateDirection::Up => relay_store::migrate_up(&pool).await?,
        MigrateDirection::Down => relay_store::migrate_down_to(&pool, 0).await?,
        MigrateDirection::UpTo { version } => {
            tracing::warn!(version, "migrate up-to is not separately tracked, running all pending migrations");
            relay_store::migrate_up(&pool).await?
        }
        MigrateDirection::DownTo { version } => relay_store::migrate_down_to(&pool, version).await?,
    }
    tracing::info!("migration complete");
    Ok(())
}

async fn print_kms_address(
    settings: &config::Settings,
    key_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    use relay_signer::RemoteSigner;

    let region_provider = aws_config::meta::region::RegionProviderChain::first_try(
        settings.aws_region.clone().map(aws_config::Region::new),
    )
    .or_default_provider();
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region_provider);
    if let Some(endpoint) = settings.aws_endpoint.clone() {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;
    let client = aws_sdk_kms::Client::new(&sdk_config);

    let signer = relay_signer::KmsSigner::new(client, key_id).await?;
    println!("{}", signer.address());
    Ok(())
}
