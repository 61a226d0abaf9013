// ABOUTME: Seeds the default specialization catalog
// ABOUTME: Inserts each default specialization that does not exist yet
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Specialization seeder
//!
//! ```bash
//! cargo run --bin seed-specializations
//! cargo run --bin seed-specializations -- --database-url sqlite:./data/trainee.db
//! ```

use clap::Parser;
use tracing::info;

use trainee_api::config::DatabaseConfig;
use trainee_api::constants::defaults;
use trainee_api::database::{Database, DEFAULT_SPECIALIZATIONS};

#[derive(Parser)]
#[command(
    name = "seed-specializations",
    about = "Trainee API Specialization Seeder",
    long_about = "Insert the default specialization catalog, skipping names that already exist"
)]
struct SeedArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = defaults::DATABASE_URL)]
    database_url: String,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SeedArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    info!("=== Trainee API Specialization Seeder ===");

    let database = Database::new(&DatabaseConfig {
        url: args.database_url,
        max_connections: 1,
    })
    .await?;

    let inserted = database.specializations().seed_defaults().await?;
    info!(
        inserted,
        skipped = (DEFAULT_SPECIALIZATIONS.len() as u64).saturating_sub(inserted),
        "Seeding complete"
    );
    Ok(())
}
