use anyhow::{Context, Result};
use moonwallet_plaid::Environment;
use std::path::PathBuf;

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub plaid_client_id: String,
    pub plaid_secret: String,
    pub plaid_env: Environment,
    pub openai_api_key: String,
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let plaid_env = std::env::var("PLAID_ENV")
            .unwrap_or_else(|_| "sandbox".to_string())
            .parse::<Environment>()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Config {
            plaid_client_id: require("PLAID_CLIENT_ID")?,
            plaid_secret: require("PLAID_SECRET")?,
            plaid_env,
            openai_api_key: require("OPENAI_API_KEY")?,
            jwt_secret: require("MOONWALLET_JWT_SECRET")?,
            db_path: std::env::var("MOONWALLET_DB")
                .unwrap_or_else(|_| "moonwallet.db".to_string())
                .into(),
            bind_addr: std::env::var("MOONWALLET_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}

fn require(name: &'static str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}
