use anyhow::Context;
use dotenv::dotenv;
use std::env;

const DEFAULT_SERVER_PORT: &str = "8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_port: String,
    pub database_url: String,
}

impl Config {
    /// Reads configuration from the environment, after loading a `.env` file if one exists.
    /// `SERVER_PORT` defaults to 8080; `DATABASE_URL` is required.
    pub fn from_env() -> anyhow::Result<Config> {
        if let Err(e) = dotenv() {
            tracing::debug!("no .env file loaded: {}", e);
        }

        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string());
        let database_url = load_env("DATABASE_URL")?;

        Ok(Config {
            server_port,
            database_url,
        })
    }
}

fn load_env(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("failed to load environment variable {}", key))
}
