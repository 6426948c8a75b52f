use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";

const DEFAULT_PORT: u16 = 3000;

/// The single credential pair the whole application authenticates against.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Exact string comparison, not constant-time.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Loaded once at startup and passed around explicitly; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub port: u16,
}

impl Config {
    /// Reads the credential file and the `PORT` environment variable
    /// (default 3000). Any failure here is fatal: the process must not serve
    /// traffic without credentials to check against.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;
        let credentials: Credentials = serde_json::from_str(&data)
            .context("Failed to parse config file")?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self { credentials, port })
    }
}
