//! Refresh-token exchange against the Zoho accounts server.
//!
//! Only the `refresh_token` grant is implemented; obtaining the initial grant
//! is the application's concern.

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Configuration;
use crate::error::{Error, Result};

/// Fields returned by a successful token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub api_domain: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Performs the refresh-token → access-token exchange.
pub struct TokenAuthority {
    client: Client,
    accounts_domain: String,
    client_id: String,
    client_secret: String,
}

impl TokenAuthority {
    pub fn new(config: &Configuration) -> Self {
        Self {
            client: Client::new(),
            accounts_domain: config.api_domain.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_domain)
    }

    /// Exchange `refresh_token` for a new access token. Fails with
    /// [`Error::Authentication`] on any non-2xx or malformed response; the
    /// caller does not retry this call.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        debug!("requesting access token refresh");

        let response = self
            .client
            .post(self.token_url())
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Authentication(format!("malformed token response: {e}")))?;

        if !status.is_success() {
            return Err(Error::Authentication(format!(
                "token refresh failed with status {status}: {body}"
            )));
        }

        // The accounts server reports grant problems with a 200 and an
        // `error` field instead of a status code.
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(Error::Authentication(format!(
                "token refresh rejected: {error}"
            )));
        }

        let token_set: TokenSet = serde_json::from_value(body)
            .map_err(|e| Error::Authentication(format!("malformed token response: {e}")))?;

        debug!("access token refreshed, expires in {}s", token_set.expires_in);
        Ok(token_set)
    }
}
