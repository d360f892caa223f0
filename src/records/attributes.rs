//! Translation between local attribute names and remote field names.
//!
//! Zoho fields follow a capitalized underscore convention (`Note_Title`);
//! local attributes are snake_case (`note_title`). An explicit per-type
//! override table takes precedence in both directions; everything else goes
//! through the convention. Pure functions over a static table.

#[derive(Debug, Clone, Copy)]
pub struct AttributeMapper {
    translation: &'static [(&'static str, &'static str)],
}

impl AttributeMapper {
    pub const fn new(translation: &'static [(&'static str, &'static str)]) -> Self {
        Self { translation }
    }

    /// Local attribute name → remote field name. Override table first, then
    /// the convention: split on `_`, capitalize each segment, rejoin.
    pub fn local_to_remote(&self, name: &str) -> String {
        if let Some((_, remote)) = self.translation.iter().find(|(local, _)| *local == name) {
            return (*remote).to_string();
        }

        name.split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Remote field name → local attribute name. Fields without an explicit
    /// reverse mapping pass through unchanged.
    pub fn remote_to_local(&self, field: &str) -> String {
        match self.translation.iter().find(|(_, remote)| *remote == field) {
            Some((local, _)) => (*local).to_string(),
            None => field.to_string(),
        }
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
