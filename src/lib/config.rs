use anyhow::Context;
use dotenv::dotenv;
use std::env;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
    pub log_filter: String,
}

impl Config {
    /// Reads configuration from the environment, after loading a `.env` file when one exists.
    pub fn from_env() -> anyhow::Result<Config> {
        if let Err(e) = dotenv() {
            if !e.not_found() {
                return Err(e).context("failed to load .env file");
            }
        }

        let server_port = load_env("SERVER_PORT")?;
        let database_url = load_env("DATABASE_URL")?;
        let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            server_port,
            database_url,
            log_filter,
        })
    }
}

fn load_env(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("failed to load environment variable {}", key))
}
