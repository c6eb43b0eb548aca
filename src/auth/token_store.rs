use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};

use crate::auth::ServiceType;

const SERVICE: &str = "gmail_report";

fn refresh_token_user(username: &str, service: ServiceType) -> String {
    format!("{username}/{}", service.name())
}

fn load(user: &str) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE, user);
    match entry?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

fn save(user: &str, secret: &str) -> Result<()> {
    let entry = Entry::new(SERVICE, user);
    entry?
        .set_password(secret)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

/// Save a refresh token into the OS keyring for the given user and API
pub fn save_refresh_token(username: &str, service: ServiceType, refresh_token: &str) -> Result<()> {
    save(&refresh_token_user(username, service), refresh_token)
}

pub fn load_refresh_token(username: &str, service: ServiceType) -> Result<Option<String>> {
    load(&refresh_token_user(username, service))
}

/// Client secret, keyed by client_id
pub fn load_client_secret(client_id: &str) -> Result<Option<String>> {
    load(client_id)
}
