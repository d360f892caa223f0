//! Access-token sources.
//!
//! A connection either owns its token outright (a string we overwrite after a
//! refresh) or reads it through a caller-supplied accessor that stays
//! authoritative. The accessor variant is for owners that persist token
//! material externally and rotate it through the refresh callback.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

type Accessor = dyn Fn() -> String + Send + Sync;

pub enum TokenSource {
    /// A fixed token, replaced in place when a refresh succeeds.
    Static(ArcSwapOption<String>),
    /// A live accessor evaluated on every request. Refreshes never write back.
    Dynamic(Arc<Accessor>),
}

impl TokenSource {
    pub fn fixed(token: impl Into<String>) -> Self {
        Self::Static(ArcSwapOption::from_pointee(token.into()))
    }

    /// A static source with no token yet. Requests go out unauthorized until
    /// a refresh lands one.
    pub fn none() -> Self {
        Self::Static(ArcSwapOption::empty())
    }

    pub fn dynamic(accessor: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(accessor))
    }

    /// Current token value, if any.
    pub fn get(&self) -> Option<String> {
        match self {
            Self::Static(cell) => cell.load_full().map(|token| (*token).clone()),
            Self::Dynamic(accessor) => Some(accessor()),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self {
            Self::Static(cell) => cell.load().is_some(),
            Self::Dynamic(_) => true,
        }
    }

    /// Install a refreshed token. No-op for [`TokenSource::Dynamic`]: the
    /// accessor remains authoritative.
    pub fn store(&self, token: &str) {
        if let Self::Static(cell) = self {
            cell.store(Some(Arc::new(token.to_string())));
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("TokenSource::Static"),
            Self::Dynamic(_) => f.write_str("TokenSource::Dynamic"),
        }
    }
}

impl From<&str> for TokenSource {
    fn from(token: &str) -> Self {
        Self::fixed(token)
    }
}

impl From<String> for TokenSource {
    fn from(token: String) -> Self {
        Self::fixed(token)
    }
}
