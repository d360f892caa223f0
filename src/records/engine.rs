//! Generic record operations.
//!
//! A `RecordEngine<R>` is a thin handle over a shared [`Connection`]: it
//! builds paths, queries and bodies for one resource kind, funnels every
//! exchange through the connection's refresh protocol, and materializes
//! typed records from the response envelope.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::records::batch;
use crate::records::note::Note;
use crate::records::schema::RecordType;
use crate::response::{CODE_SUCCESS, ResponseEnvelope};

/// Criteria keys the search endpoint accepts as dedicated query parameters.
/// Everything else becomes a `Field:equals:value` criteria term.
const BUILT_IN_CRITERIA: [&str; 4] = ["criteria", "email", "phone", "word"];

pub struct RecordEngine<R: RecordType> {
    connection: Arc<Connection>,
    _record: PhantomData<R>,
}

impl<R: RecordType> RecordEngine<R> {
    pub fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Fetch a single record by id.
    pub async fn find(&self, id: &str) -> Result<R> {
        let path = format!("{}/{}", R::resource(), id);
        let envelope = ResponseEnvelope::new(self.connection.get(&path, Vec::new()).await?);

        if let Some((code, message)) = envelope.error() {
            return Err(if envelope.not_found() {
                self.not_found(id)
            } else {
                Error::Unknown { code, message }
            });
        }

        let data = envelope.data();
        let entry = data.first().ok_or_else(|| self.not_found(id))?;
        R::from_remote(entry)
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        match self.find(id).await {
            Ok(_) => Ok(true),
            Err(Error::RecordNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch several records by id, batching oversized sequences. Results are
    /// concatenated in input order across batch boundaries.
    pub async fn find_all<T: AsRef<str>>(&self, ids: &[T]) -> Result<Vec<R>> {
        let mut records = Vec::with_capacity(ids.len());

        for window in batch::windows(ids) {
            let envelope = ResponseEnvelope::new(
                self.connection
                    .get(R::resource(), vec![("ids".to_string(), window)])
                    .await?,
            );

            if let Some((code, message)) = envelope.error() {
                if envelope.not_found() {
                    continue;
                }
                return Err(Error::Unknown { code, message });
            }

            for entry in envelope.data() {
                records.push(R::from_remote(&entry)?);
            }
        }

        Ok(records)
    }

    /// Search by criteria. Built-in keys map to dedicated query parameters;
    /// any other key is translated into a `Field:equals:value` term, terms
    /// conjoined with `and` when there is more than one. Zero matches is an
    /// empty result, not an error.
    pub async fn search(&self, criteria: &[(&str, &str)]) -> Result<Vec<R>> {
        let mapper = R::mapper();
        let mut query: Vec<(String, String)> = Vec::new();
        let mut terms: Vec<String> = Vec::new();

        for (key, value) in criteria {
            if BUILT_IN_CRITERIA.contains(key) {
                query.push((key.to_string(), value.to_string()));
            } else {
                terms.push(format!("{}:equals:{}", mapper.local_to_remote(key), value));
            }
        }

        match terms.as_slice() {
            [] => {}
            [term] => query.push(("criteria".to_string(), term.clone())),
            many => query.push((
                "criteria".to_string(),
                many.iter()
                    .map(|t| format!("({t})"))
                    .collect::<Vec<_>>()
                    .join("and"),
            )),
        }

        let path = format!("{}/search", R::resource());
        let envelope = ResponseEnvelope::new(self.connection.get(&path, query).await?);

        if let Some((code, message)) = envelope.error() {
            if envelope.not_found() {
                return Ok(Vec::new());
            }
            return Err(Error::Unknown { code, message });
        }

        envelope
            .data()
            .iter()
            .map(R::from_remote)
            .collect()
    }

    /// Create a record. Returns the server-assigned id.
    pub async fn create(&self, record: &R) -> Result<String> {
        let body = json!({ "data": [record.to_remote()?] });
        let envelope = ResponseEnvelope::new(
            self.connection.post(R::resource(), Vec::new(), body).await?,
        );

        if let Some((code, message)) = envelope.error() {
            return Err(Error::Unknown { code, message });
        }

        let data = envelope.data();
        let entry = data
            .first()
            .ok_or_else(|| Error::unknown("EMPTY_RESPONSE", "create returned no entry"))?;
        let entry = entry_success(entry)?;

        entry["details"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::unknown("EMPTY_RESPONSE", "create entry carried no id"))
    }

    /// Update a record in place. The record must carry its id.
    pub async fn update(&self, record: &R) -> Result<()> {
        let id = record.id().ok_or(Error::MissingId)?;
        let path = format!("{}/{}", R::resource(), id);
        let body = json!({ "data": [record.to_remote()?] });
        let envelope = ResponseEnvelope::new(self.connection.put(&path, body).await?);

        if let Some((code, message)) = envelope.error() {
            return Err(Error::Unknown { code, message });
        }
        if let Some(entry) = envelope.data().first() {
            entry_success(entry)?;
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = format!("{}/{}", R::resource(), id);
        let envelope = ResponseEnvelope::new(self.connection.delete(&path, Vec::new()).await?);

        if let Some((code, message)) = envelope.error() {
            return Err(if envelope.not_found() {
                self.not_found(id)
            } else {
                Error::Unknown { code, message }
            });
        }
        Ok(())
    }

    /// Delete several records by id, batched like [`find_all`].
    ///
    /// [`find_all`]: RecordEngine::find_all
    pub async fn delete_all<T: AsRef<str>>(&self, ids: &[T]) -> Result<()> {
        for window in batch::windows(ids) {
            let envelope = ResponseEnvelope::new(
                self.connection
                    .delete(R::resource(), vec![("ids".to_string(), window)])
                    .await?,
            );
            if let Some((code, message)) = envelope.error() {
                return Err(Error::Unknown { code, message });
            }
        }
        Ok(())
    }

    /// Tag several records at once, batched like [`find_all`].
    ///
    /// [`find_all`]: RecordEngine::find_all
    pub async fn add_tags<T: AsRef<str>>(&self, ids: &[T], tag_names: &[&str]) -> Result<()> {
        let tags = tag_names.join(",");
        let path = format!("{}/actions/add_tags", R::resource());

        for window in batch::windows(ids) {
            let query = vec![
                ("ids".to_string(), window),
                ("tag_names".to_string(), tags.clone()),
            ];
            let envelope =
                ResponseEnvelope::new(self.connection.post(&path, query, Value::Null).await?);
            if let Some((code, message)) = envelope.error() {
                return Err(Error::Unknown { code, message });
            }
        }
        Ok(())
    }

    /// Tag one record.
    pub async fn add_tags_to(&self, record: &R, tag_names: &[&str]) -> Result<()> {
        let id = record.id().ok_or(Error::MissingId)?;
        let path = format!("{}/{}/actions/add_tags", R::resource(), id);
        let query = vec![("tag_names".to_string(), tag_names.join(","))];
        let envelope =
            ResponseEnvelope::new(self.connection.post(&path, query, Value::Null).await?);

        if let Some((code, message)) = envelope.error() {
            return Err(Error::Unknown { code, message });
        }
        Ok(())
    }

    /// Wrap a raw body the way every operation here does. Seam for validating
    /// field-level coercion without a live connection.
    pub fn build_response(&self, body: Value) -> ResponseEnvelope {
        ResponseEnvelope::new(body)
    }

    /// Walk a record through the blueprint transition named by
    /// `next_field_value`: fetch the blueprint to resolve the transition id,
    /// then apply it with an empty data map.
    pub async fn blueprint_transition(&self, record: &R, transition_name: &str) -> Result<()> {
        let id = record.id().ok_or(Error::MissingId)?;
        let path = format!("{}/{}/actions/blueprint", R::resource(), id);

        let body = self.connection.get(&path, Vec::new()).await?;
        let transition_id = body["blueprint"]["transitions"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|t| t["next_field_value"] == transition_name)
            .and_then(|t| t["id"].as_str())
            .ok_or_else(|| {
                Error::unknown(
                    "TRANSITION_NOT_FOUND",
                    format!("no blueprint transition named {transition_name}"),
                )
            })?;

        let payload = json!({
            "blueprint": [{ "transition_id": transition_id, "data": {} }]
        });
        let envelope = ResponseEnvelope::new(self.connection.put(&path, payload).await?);

        if let Some((code, message)) = envelope.error() {
            return Err(Error::Unknown { code, message });
        }
        Ok(())
    }

    /// Notes attached to a record. An empty or absent payload is an empty
    /// list, not an error.
    pub async fn notes(&self, record: &R) -> Result<Vec<Note>> {
        let id = record.id().ok_or(Error::MissingId)?;
        let path = format!("{}/{}/Notes", R::resource(), id);
        let envelope = ResponseEnvelope::new(self.connection.get(&path, Vec::new()).await?);

        envelope.data().iter().map(Note::from_remote).collect()
    }

    /// Attach a note to the record with the given id.
    pub async fn add_note(&self, id: &str, title: &str, content: &str) -> Result<()> {
        let path = format!("{}/{}/Notes", R::resource(), id);
        let body = json!({
            "data": [{ "Note_Title": title, "Note_Content": content }]
        });
        let envelope =
            ResponseEnvelope::new(self.connection.post(&path, Vec::new(), body).await?);

        if let Some((code, message)) = envelope.error() {
            return Err(Error::Unknown { code, message });
        }
        if let Some(entry) = envelope.data().first() {
            entry_success(entry)?;
        }
        Ok(())
    }

    fn not_found(&self, id: &str) -> Error {
        Error::RecordNotFound {
            resource: R::resource().to_string(),
            id: id.to_string(),
        }
    }
}

/// Per-entry outcome of a bulk write: `SUCCESS` passes the entry through,
/// anything else (validation errors included) carries its code and message.
fn entry_success(entry: &Value) -> Result<&Value> {
    match entry.get("code").and_then(Value::as_str) {
        None | Some(CODE_SUCCESS) => Ok(entry),
        Some(code) => Err(Error::unknown(
            code,
            entry
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        )),
    }
}
