use anyhow::{Result, anyhow};
use log::{info, warn};
use oauth2::TokenResponse;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, PkceCodeChallenge, RedirectUrl,
    RefreshToken, Scope, TokenUrl,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tiny_http::{Response, Server};
use url::Url;

use crate::auth::credentials::ClientCredentials;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Tokens returned by the oauth flow (in-memory)
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

fn basic_client(creds: &ClientCredentials) -> Result<BasicClient> {
    let client_id = ClientId::new(creds.client_id.clone());
    let client_secret = creds.client_secret.clone().map(ClientSecret::new);
    let auth_url = AuthUrl::new(creds.auth_uri.clone())?;
    let token_url = TokenUrl::new(creds.token_uri.clone())?;
    Ok(BasicClient::new(
        client_id,
        client_secret,
        auth_url,
        Some(token_url),
    ))
}

fn into_tokens(token: &BasicTokenResponse) -> Tokens {
    Tokens {
        access_token: token.access_token().secret().to_string(),
        refresh_token: token.refresh_token().map(|r| r.secret().to_string()),
        expires_in: token.expires_in().map(|d| d.as_secs()),
    }
}

/// Exchange a refresh token for a new access token
pub fn refresh_access_token(creds: &ClientCredentials, refresh_token: &str) -> Result<Tokens> {
    let rt = RefreshToken::new(refresh_token.to_string());
    let token = basic_client(creds)?
        .exchange_refresh_token(&rt)
        .request(http_client)?;
    Ok(into_tokens(&token))
}

/// Authorization Code + PKCE flow. Opens the system browser and captures the
/// code on a loopback listener bound to the redirect uri.
pub fn perform_pkce_flow(
    creds: &ClientCredentials,
    redirect_uri: &str,
    scope: &str,
) -> Result<Tokens> {
    let redirect = Url::parse(redirect_uri)
        .map_err(|e| anyhow!("Invalid redirect_uri '{redirect_uri}': {e}"))?;
    let host = redirect
        .host_str()
        .ok_or_else(|| anyhow!("redirect_uri missing host: {redirect_uri}"))?;
    let port = redirect
        .port_or_known_default()
        .ok_or_else(|| anyhow!("redirect_uri missing/unknown port: {redirect_uri}"))?;

    let bind_ip: IpAddr = match host {
        "localhost" | "127.0.0.1" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        other => other.parse::<IpAddr>().map_err(|_| {
            anyhow!("redirect_uri host must be localhost/127.0.0.1 or an IP: {other}")
        })?,
    };
    let bind_addr = SocketAddr::new(bind_ip, port);

    // listen before the browser is opened
    let server = Server::http(bind_addr)
        .map_err(|e| anyhow!("Failed to bind OAuth callback server on {bind_addr}: {e:?}"))?;

    let oauth_client =
        basic_client(creds)?.set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?);
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let (auth_url, _csrf_token) = oauth_client
        .authorize_url(oauth2::CsrfToken::new_random)
        .add_scope(Scope::new(scope.to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    info!("Open this URL in your browser:\n{auth_url}");
    if let Err(e) = open::that(auth_url.as_str()) {
        warn!("Could not open browser automatically: {e}");
    }

    let mut code_opt: Option<String> = None;
    let wait_until = Instant::now() + CALLBACK_TIMEOUT;

    while Instant::now() < wait_until {
        let Ok(maybe_request) = server.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        let Some(request) = maybe_request else {
            continue;
        };

        // request.url() is only path+query
        let full = format!("http://{}:{}{}", host, port, request.url());
        match Url::parse(&full) {
            Ok(parsed) => {
                code_opt = parsed
                    .query_pairs()
                    .find(|(k, _)| k == "code")
                    .map(|(_, v)| v.into_owned());
                if code_opt.is_some() {
                    let _ = request.respond(Response::from_string(
                        "Authorization received. You can close this tab.",
                    ));
                    break;
                }
                let _ = request.respond(Response::from_string(
                    "No code found in redirect. You can close this tab.",
                ));
            }
            Err(_) => {
                let _ = request.respond(Response::from_string("Bad redirect"));
            }
        }
    }

    let code = code_opt.ok_or_else(|| anyhow!("No code received within timeout"))?;
    let token = oauth_client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request(http_client)
        .map_err(|e| anyhow!("Token exchange failed: {e:?}"))?;

    Ok(into_tokens(&token))
}
