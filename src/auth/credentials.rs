use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::auth::token_store;
use crate::config::Config;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Layout of the client secret JSON downloaded from the Google console.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecretEntry>,
    web: Option<ClientSecretEntry>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretEntry {
    client_id: String,
    client_secret: Option<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl ClientCredentials {
    pub fn from_json(s: &str) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_str(s)?;
        let entry = file
            .installed
            .or(file.web)
            .ok_or_else(|| anyhow!("client secret has neither 'installed' nor 'web' section"))?;
        Ok(Self {
            client_id: entry.client_id,
            client_secret: entry.client_secret,
            auth_uri: entry.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_uri: entry.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading client secret {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("parsing client secret {}", path.display()))
    }

    /// Client secret file if configured, otherwise `client_id` with the
    /// secret from the keyring or `OAUTH_CLIENT_SECRET`.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        if let Some(path) = &cfg.client_secret_file {
            return Self::from_file(Path::new(path));
        }
        let client_secret = token_store::load_client_secret(&cfg.client_id)?
            .or_else(|| std::env::var("OAUTH_CLIENT_SECRET").ok());
        Ok(Self {
            client_id: cfg.client_id.clone(),
            client_secret,
            auth_uri: DEFAULT_AUTH_URL.to_string(),
            token_uri: DEFAULT_TOKEN_URL.to_string(),
        })
    }
}
