//! API client for Zoho CRM.
//!
//! The crate covers the OAuth bearer-token lifecycle (refresh-token exchange,
//! safe refresh under concurrent use, single retry on expiry) and a generic
//! record engine: CRUD, search, batched bulk operations and the bidirectional
//! mapping between snake_case attributes and Zoho's capitalized field names.
//!
//! ```no_run
//! use std::sync::Arc;
//! use zoho_hub::{Configuration, Connection, Credential, RecordEngine};
//!
//! zoho_hub::zoho_record! {
//!     pub struct Lead("Leads") {
//!         id: String => "id",
//!         full_name: String,
//!         email: String,
//!     }
//! }
//!
//! # async fn run() -> zoho_hub::Result<()> {
//! let config = Configuration::from_env()?;
//! let credential = Credential::with_token("1000.xxx").refresh_token("1000.yyy");
//! let connection = Arc::new(Connection::new(&config, credential));
//!
//! let leads: RecordEngine<Lead> = RecordEngine::new(connection);
//! let lead = leads.find("3000000001").await?;
//! let matches = leads.search(&[("email", "lead@example.com")]).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod connection;
pub mod error;
pub mod records;
pub mod response;
pub mod token;

pub use auth::{TokenAuthority, TokenSet};
pub use config::Configuration;
pub use connection::{Connection, Credential};
pub use error::{Error, Result};
pub use records::{AttributeMapper, Note, RecordEngine, RecordType};
pub use response::ResponseEnvelope;
pub use token::TokenSource;
