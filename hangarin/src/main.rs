// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::process::ExitCode;

use chrono::Local;
use hangarin::cli::{self, Command, USAGE};
use hangarin::config::Config;
use hangarin::database;
use hangarin::error::SeedError;
use hangarin::seed;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Seed(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pool = match database::establish_connection_pool(&config.database_url).await {
        Ok(pool) => {
            tracing::info!("Database connection was made successfully.");
            pool
        }
        Err(e) => {
            tracing::error!("Failed to connect with the database: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut rng = match args.seed {
        Some(seed) => {
            tracing::debug!("Using fixed random seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let outcome = seed::seed_database(&pool, &mut rng, &Local::now(), args.tasks).await;
    pool.close().await;

    match outcome {
        Ok(summary) => {
            tracing::info!("{}", summary);
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(SeedError::MissingReferenceData {
            categories,
            priorities,
        }) => {
            tracing::error!(
                "Refusing to seed: {} categories and {} priorities available.",
                categories,
                priorities
            );
            eprintln!("Please add Categories and Priorities first.");
            ExitCode::FAILURE
        }
        Err(SeedError::Persistence(e)) => {
            tracing::error!("Seeding failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
