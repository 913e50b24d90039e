use std::path::Path;
use std::process;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::task;
use tracing_subscriber::EnvFilter;

pub mod bots;
pub mod config;
pub mod services;

use crate::bots::perfume_bot::{run_bot, BotContext};
use crate::config::AppConfig;
use crate::services::openai::OpenAiClient;
use crate::services::recommendation::RecommendationService;
use crate::services::scheduler::run_daily_scheduler;
use crate::services::sheets::SheetsClient;
use parfumbot::catalog::import_products_from_csv;
use parfumbot::db::{create_pool, run_migrations};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url) {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!("Failed to create database pool: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        tracing::error!("Failed to run migrations: {}", e);
        process::exit(1);
    }

    let catalog_path = Path::new(&config.catalog_csv_path);
    if catalog_path.exists() {
        match import_products_from_csv(&pool, catalog_path) {
            Ok(count) => tracing::info!("Imported {} products from {}", count, config.catalog_csv_path),
            Err(e) => tracing::error!("Catalog import failed: {}", e),
        }
    } else {
        tracing::warn!(
            "Catalog file {} not found, keeping existing products",
            config.catalog_csv_path
        );
    }

    let openai = OpenAiClient::new(config.openai_api_key.clone());
    let recommender = Arc::new(RecommendationService::new(pool.clone(), openai));

    let sheets = match (&config.google_sheets_token, &config.google_sheets_id) {
        (Some(token), Some(id)) => Some(SheetsClient::new(token.clone(), id.clone())),
        _ => {
            tracing::warn!("Google Sheets credentials not set, analytics export disabled");
            None
        }
    };

    task::spawn(run_daily_scheduler(
        pool.clone(),
        recommender.clone(),
        config.telegram_token.clone(),
        sheets,
    ));

    let ctx = Arc::new(BotContext {
        pool,
        admin_user_ids: config.admin_user_ids.clone(),
        recommender,
    });

    run_bot(ctx, config.telegram_token).await;
}
