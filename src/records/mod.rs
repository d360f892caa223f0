//! The record layer: attribute mapping, identifier batching, static schemas
//! and the generic operation engine built on top of a [`Connection`].
//!
//! [`Connection`]: crate::Connection

mod attributes;
mod batch;
mod engine;
mod note;
mod schema;

pub use attributes::AttributeMapper;
pub use batch::{BATCH_WINDOW, windows};
pub use engine::RecordEngine;
pub use note::Note;
pub use schema::{RecordType, read_field};
