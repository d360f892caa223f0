//! Error taxonomy for the Zoho CRM API client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The resource is absent or the server answered with `RESOURCE_NOT_FOUND`.
    #[error("record not found in {resource}: {id}")]
    RecordNotFound { resource: String, id: String },

    /// A structured error code the client does not classify further.
    #[error("{code}: {message}")]
    Unknown { code: String, message: String },

    /// Non-expiry authentication failure. Fatal, never retried.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Upstream 5xx. Carries the raw response body for diagnostics.
    #[error("server error: {0}")]
    Internal(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An instance-level operation was invoked on a record without an id.
    #[error("record has no id")]
    MissingId,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub fn unknown(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unknown {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether this failure came back from the server as a structured API
    /// error, as opposed to transport or decoding trouble on our side.
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound { .. }
                | Self::Unknown { .. }
                | Self::Authentication(_)
                | Self::Internal(_)
        )
    }
}
