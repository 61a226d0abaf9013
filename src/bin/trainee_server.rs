// ABOUTME: Trainee API server binary
// ABOUTME: Loads environment configuration, opens the database and serves HTTP until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Trainee API server
//!
//! ```bash
//! JWT_SECRET=... cargo run --bin trainee-server
//! JWT_SECRET=... cargo run --bin trainee-server -- --port 9000 --database-url sqlite::memory:
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use trainee_api::config::ServerConfig;
use trainee_api::database::Database;
use trainee_api::email::create_mailer;
use trainee_api::logging::init_logging;
use trainee_api::resources::ServerResources;
use trainee_api::server::run_server;
use trainee_api::storage::create_image_store;

#[derive(Parser)]
#[command(
    name = "trainee-server",
    version,
    about = "Trainee fitness-trainer marketplace API"
)]
struct Args {
    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    init_logging(&config.logging)?;
    info!("{}", config.summary());

    let database = Database::new(&config.database)
        .await
        .context("Failed to open database")?;
    let image_store = create_image_store(&config.storage)
        .await
        .context("Failed to create image store")?;

    let mailer = create_mailer(&config.email).context("Failed to create mailer")?;

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        Arc::new(config),
        image_store,
        mailer,
    ));

    run_server(resources, port).await?;
    Ok(())
}
