//! Client configuration.
//!
//! A `Configuration` is built once at startup and handed to [`Connection`]
//! constructors explicitly; there is no process-wide singleton. `api_domain`
//! holds the Zoho *accounts* domain (the token-exchange host), from which the
//! data-API domain is inferred unless one is supplied on the credential.
//!
//! [`Connection`]: crate::Connection

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Configuration {
    /// Accounts domain, e.g. `https://accounts.zoho.eu`.
    pub api_domain: String,
    /// CRM API version segment, e.g. `v2`.
    pub api_version: String,
    pub client_id: String,
    pub client_secret: String,
    /// Log request and response details at debug level.
    pub debug: bool,
}

pub const DEFAULT_ACCOUNTS_DOMAIN: &str = "https://accounts.zoho.eu";
pub const DEFAULT_API_VERSION: &str = "v2";

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_domain: DEFAULT_ACCOUNTS_DOMAIN.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            debug: false,
        }
    }
}

impl Configuration {
    /// Load configuration from the environment, reading a `.env` file first if
    /// one exists. `ZOHO_CLIENT_ID` and `ZOHO_CLIENT_SECRET` are required;
    /// `ZOHO_API_DOMAIN`, `ZOHO_API_VERSION` and `ZOHO_DEBUG` are optional.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let client_id = required_var("ZOHO_CLIENT_ID")?;
        let client_secret = required_var("ZOHO_CLIENT_SECRET")?;

        let api_domain = optional_var("ZOHO_API_DOMAIN")
            .unwrap_or_else(|| DEFAULT_ACCOUNTS_DOMAIN.to_string());
        let api_version =
            optional_var("ZOHO_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let debug = std::env::var("ZOHO_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            api_domain,
            api_version,
            client_id,
            client_secret,
            debug,
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name)
        .ok_or_else(|| Error::Configuration(format!("missing environment variable {name}")))
}
