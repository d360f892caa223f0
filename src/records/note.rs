//! The Note record type, served through a parent record's nested `Notes`
//! sub-resource.

use serde_json::Value;

crate::zoho_record! {
    pub struct Note("Notes") {
        id: String => "id",
        note_title: String,
        note_content: String,
        parent_id: Value,
        created_by: Value,
        modified_by: Value,
        owner: Value,
        created_time: String,
        voice_note: bool,
    }
}

impl Note {
    pub fn title(&self) -> Option<&str> {
        self.note_title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.note_content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::schema::RecordType;
    use serde_json::json;

    #[test]
    fn materializes_from_remote_field_names() {
        let note = Note::from_remote(&json!({
            "Note_Title": "Title",
            "Note_Content": "content",
            "id": "note-1"
        }))
        .unwrap();

        assert_eq!(note.title(), Some("Title"));
        assert_eq!(note.content(), Some("content"));
        assert_eq!(note.id(), Some("note-1"));
    }
}
