use anyhow::Result;
use log::{debug, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::credentials::ClientCredentials;
use crate::auth::{ServiceType, oauth, token_store, tokens_file};

// used when the provider does not send expires_in
const FALLBACK_LIFETIME_SECS: i64 = 3500;

#[derive(Debug, Clone)]
pub struct TokenManager {
    pub service: ServiceType,
    pub credentials: ClientCredentials,
    pub redirect_uri: String,
    pub user_email: String,
}

impl TokenManager {
    pub fn new(
        service: ServiceType,
        credentials: ClientCredentials,
        redirect_uri: impl Into<String>,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            service,
            credentials,
            redirect_uri: redirect_uri.into(),
            user_email: user_email.into(),
        }
    }

    /// Returns a valid access token; refreshes/PKCE if needed.
    pub fn get_access_token(&self) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        // 1) cached & not expired
        if let Some(tf) = tokens_file::load_tokens(self.service)?
            && let Some(at) = tf.valid_access_token(now)
        {
            return Ok(at.to_string());
        }

        // 2) refresh if possible
        if let Some(rt) = token_store::load_refresh_token(&self.user_email, self.service)? {
            debug!("Refreshing {} access token", self.service.name());
            match oauth::refresh_access_token(&self.credentials, &rt) {
                Ok(t) => return self.persist(t, now),
                Err(e) => warn!("Refresh failed: {e}, falling back to interactive auth"),
            }
        }

        // 3) otherwise PKCE
        info!(
            "No usable {} token; running interactive PKCE auth flow...",
            self.service.name()
        );
        let t = oauth::perform_pkce_flow(
            &self.credentials,
            &self.redirect_uri,
            self.service.scope(),
        )?;
        self.persist(t, now)
    }

    fn persist(&self, t: oauth::Tokens, now: i64) -> Result<String> {
        if let Some(ref_token) = &t.refresh_token
            && let Err(e) =
                token_store::save_refresh_token(&self.user_email, self.service, ref_token)
        {
            warn!("Couldn't save refresh token to keyring: {e}");
        }
        let exp = t
            .expires_in
            .map(|s| now + s as i64)
            .unwrap_or(now + FALLBACK_LIFETIME_SECS);
        tokens_file::save_tokens(self.service, Some(&t.access_token), Some(exp))?;
        Ok(t.access_token)
    }
}
