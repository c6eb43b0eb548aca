use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::auth::ServiceType;
use crate::config::config_dir;

/// Non-secret token metadata, one file per API:
/// ~/.config/gmail_report/tokens_<service>.json
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokensFile {
    pub access_token: Option<String>,
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

impl TokensFile {
    pub fn valid_access_token(&self, now: i64) -> Option<&str> {
        match (&self.access_token, self.expires_at_epoch) {
            (Some(at), Some(exp)) if now < exp => Some(at),
            _ => None,
        }
    }
}

fn tokens_path(service: ServiceType) -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push(format!("tokens_{}.json", service.name()));
    Ok(p)
}

pub fn save_tokens(
    service: ServiceType,
    access_token: Option<&str>,
    expires_at_epoch: Option<i64>,
) -> Result<()> {
    let p = tokens_path(service)?;
    let tf = TokensFile {
        access_token: access_token.map(|s| s.to_string()),
        expires_at_epoch,
    };
    fs::write(&p, serde_json::to_string_pretty(&tf)?)?;
    Ok(())
}

pub fn load_tokens(service: ServiceType) -> Result<Option<TokensFile>> {
    let p = tokens_path(service)?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p)?;
    Ok(Some(serde_json::from_str(&s)?))
}
