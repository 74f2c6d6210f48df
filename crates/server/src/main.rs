use anyhow::Context;
use std::sync::Arc;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use moonwallet_advisor::OpenAiChat;
use moonwallet_plaid::{PlaidClient, PlaidCredentials};

mod auth;
mod config;
mod error;
mod routes;

use config::Config;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("load configuration")?;

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("create data directory")?;
        }
    }
    let db = moonwallet_storage::create_db(&config.db_path)
        .await
        .context("open document store")?;

    let plaid = Arc::new(PlaidClient::new(
        PlaidCredentials {
            client_id: config.plaid_client_id.clone(),
            secret: config.plaid_secret.clone(),
        },
        config.plaid_env,
    ));
    let chat = Arc::new(OpenAiChat::new(config.openai_api_key.clone()));

    let state = AppState {
        db,
        plaid,
        chat,
        jwt_secret: config.jwt_secret.clone(),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, env = ?config.plaid_env, "listening");

    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer =
        BunyanFormattingLayer::new("moonwallet-server".to_string(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber).expect("install tracing subscriber");
}
