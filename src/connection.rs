//! Authorized access to the CRM data API.
//!
//! A [`Connection`] owns one credential, attaches the OAuth header to every
//! request, detects token expiry from the response body and recovers it with
//! a single refresh-and-retry. It is the only layer that talks to the
//! transport; everything above funnels through the verbs here.

use log::debug;
use once_cell::sync::OnceCell;
use reqwest::{ClientBuilder, Method, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::{TokenAuthority, TokenSet};
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::response::ResponseEnvelope;
use crate::token::TokenSource;

pub const DEFAULT_DOMAIN: &str = "https://www.zohoapis.eu";
const BASE_PATH: &str = "crm";
const SERVER_ERRORS: [u16; 4] = [500, 502, 503, 504];
const DEFAULT_EXPIRES_IN: u64 = 3600;

type RefreshHook = Box<dyn Fn(&TokenSet) + Send + Sync>;
type InitHook = Box<dyn Fn(ClientBuilder) -> ClientBuilder + Send + Sync>;

/// Token material owned by one connection. Mutable in place on refresh.
#[derive(Debug)]
pub struct Credential {
    pub access_token: TokenSource,
    pub refresh_token: Option<String>,
    /// Data-API domain. Inferred from the accounts domain when absent.
    pub api_domain: Option<String>,
    /// Overrides the configured API version when set.
    pub api_version: Option<String>,
    pub expires_in: u64,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            access_token: TokenSource::none(),
            refresh_token: None,
            api_domain: None,
            api_version: None,
            expires_in: DEFAULT_EXPIRES_IN,
        }
    }
}

impl Credential {
    pub fn with_token(token: impl Into<TokenSource>) -> Self {
        Self {
            access_token: token.into(),
            ..Self::default()
        }
    }

    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    pub fn api_domain(mut self, domain: impl Into<String>) -> Self {
        self.api_domain = Some(domain.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }
}

/// One re-issuable exchange against the data API. Kept as plain data so the
/// refresh protocol can send it a second time.
#[derive(Debug, Clone)]
struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

pub struct Connection {
    api_domain: String,
    api_version: String,
    token: TokenSource,
    refresh_token: Option<String>,
    expires_in: u64,
    authority: TokenAuthority,
    on_refresh: Option<RefreshHook>,
    on_initialize: Option<InitHook>,
    adapter: OnceCell<reqwest::Client>,
    refresh_lock: Mutex<()>,
    debug: bool,
}

impl Connection {
    /// Map an accounts domain onto the data-API domain it serves.
    pub fn infer_api_domain(accounts_domain: &str) -> &'static str {
        match accounts_domain {
            "https://accounts.zoho.com" => "https://www.zohoapis.com",
            "https://accounts.zoho.com.cn" => "https://www.zohoapis.com.cn",
            "https://accounts.zoho.in" => "https://www.zohoapis.in",
            "https://accounts.zoho.eu" => "https://www.zohoapis.eu",
            _ => DEFAULT_DOMAIN,
        }
    }

    pub fn new(config: &Configuration, credential: Credential) -> Self {
        let api_domain = credential
            .api_domain
            .unwrap_or_else(|| Self::infer_api_domain(&config.api_domain).to_string());
        let api_version = credential
            .api_version
            .unwrap_or_else(|| config.api_version.clone());

        Self {
            api_domain,
            api_version,
            token: credential.access_token,
            refresh_token: credential.refresh_token,
            expires_in: credential.expires_in,
            authority: TokenAuthority::new(config),
            on_refresh: None,
            on_initialize: None,
            adapter: OnceCell::new(),
            refresh_lock: Mutex::new(()),
            debug: config.debug,
        }
    }

    /// Run `hook` with every refreshed token set, so the owner can persist or
    /// rotate token material externally.
    pub fn on_refresh(mut self, hook: impl Fn(&TokenSet) + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Box::new(hook));
        self
    }

    /// Customize the transport before first use. Invoked exactly once, when
    /// the memoized client is built.
    pub fn on_initialize(
        mut self,
        hook: impl Fn(ClientBuilder) -> ClientBuilder + Send + Sync + 'static,
    ) -> Self {
        self.on_initialize = Some(Box::new(hook));
        self
    }

    pub fn api_domain(&self) -> &str {
        &self.api_domain
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// Current access token, evaluated through the source.
    pub fn access_token(&self) -> Option<String> {
        self.token.get()
    }

    pub fn has_access_token(&self) -> bool {
        self.token.is_configured()
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        self.request(ApiRequest {
            method: Method::GET,
            path: path.to_string(),
            query,
            body: None,
        })
        .await
    }

    pub async fn post(&self, path: &str, query: Vec<(String, String)>, body: Value) -> Result<Value> {
        self.request(ApiRequest {
            method: Method::POST,
            path: path.to_string(),
            query,
            body: Some(body),
        })
        .await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(ApiRequest {
            method: Method::PUT,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        })
        .await
    }

    pub async fn delete(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
        self.request(ApiRequest {
            method: Method::DELETE,
            path: path.to_string(),
            query,
            body: None,
        })
        .await
    }

    /// The refresh protocol: issue once, refresh-and-retry exactly once on
    /// token expiry, fail fast on any other authentication failure.
    async fn request(&self, request: ApiRequest) -> Result<Value> {
        if self.debug {
            debug!(
                "{} {} with {:?}",
                request.method, request.path, request.query
            );
        } else {
            debug!("{} {}", request.method, request.path);
        }

        let (status, body) = self.send(&request).await?;
        let envelope = ResponseEnvelope::new(body);

        let (status, body) = if envelope.invalid_token() && self.has_refresh_token() {
            debug!("access token rejected, refreshing");
            self.refresh_access_token().await?;
            self.send(&request).await?
        } else if envelope.authentication_failure() {
            return Err(Error::Authentication(envelope.message()));
        } else {
            (status, envelope.into_inner())
        };

        if SERVER_ERRORS.contains(&status.as_u16()) {
            return Err(Error::Internal(body.to_string()));
        }

        Ok(body)
    }

    /// Refresh the access token, at most once concurrently per connection.
    ///
    /// A caller that finds the lock held does not perform a second exchange:
    /// it returns and retries with whatever token is current by then. That
    /// retry may still race the in-flight refresh and see one more
    /// authorization failure; callers tolerate it.
    async fn refresh_access_token(&self) -> Result<()> {
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            debug!("refresh already in flight, skipping");
            return Ok(());
        };

        let refresh_token = self
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::Configuration("no refresh token configured".to_string()))?;

        let token_set = self.authority.refresh(refresh_token).await?;

        if let Some(hook) = &self.on_refresh {
            hook(&token_set);
        }
        self.token.store(&token_set.access_token);

        Ok(())
    }

    /// One raw exchange. Attaches the authorization header when a token is
    /// configured and normalizes the body: empty → `Null`, non-JSON → the
    /// text itself.
    async fn send(&self, request: &ApiRequest) -> Result<(StatusCode, Value)> {
        let url = format!(
            "{}/{}/{}/{}",
            self.api_domain, BASE_PATH, self.api_version, request.path
        );

        let mut builder = self
            .adapter()?
            .request(request.method.clone(), &url)
            .query(&request.query);
        if let Some(token) = self.access_token() {
            builder = builder.header("Authorization", format!("Zoho-oauthtoken {token}"));
        }
        if let Some(body) = request.body.as_ref().filter(|b| !b.is_null()) {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok((status, body))
    }

    /// Transport handle, built lazily and memoized for the connection's
    /// lifetime. The initialization hook runs exactly once, here.
    fn adapter(&self) -> Result<&reqwest::Client> {
        self.adapter.get_or_try_init(|| {
            let mut builder = reqwest::Client::builder().user_agent("zoho-hub/0.1");
            if let Some(hook) = &self.on_initialize {
                builder = hook(builder);
            }
            builder.build().map_err(Error::from)
        })
    }
}
