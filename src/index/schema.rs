//! Declared field mappings for indices
//!
//! A mapping is the per-field type schema an index enforces. Every
//! document in an index conforms to its mapping; heterogeneous schemas
//! within one index are not supported (separate indices exist per source
//! instead).

use tantivy::schema::{Schema, INDEXED, STORED, STRING, TEXT};

/// Declared type of one mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Tokenized and searchable full text
    Text,
    /// Untokenized exact-match string (URLs, identifiers)
    Keyword,
    /// Timestamp
    Date,
}

/// An ordered set of (field name, kind) declarations
#[derive(Debug, Clone)]
pub struct FieldMapping {
    fields: Vec<(String, FieldKind)>,
}

impl FieldMapping {
    pub fn new(fields: Vec<(String, FieldKind)>) -> Self {
        Self { fields }
    }

    /// The mapping shared by every document index in this service:
    /// searchable title and body, exact-match url, stored snippet,
    /// and the scrape timestamp.
    pub fn documents() -> Self {
        Self::new(vec![
            ("title".to_string(), FieldKind::Text),
            ("body_text".to_string(), FieldKind::Text),
            ("url".to_string(), FieldKind::Keyword),
            ("snippet".to_string(), FieldKind::Text),
            ("scraped_at".to_string(), FieldKind::Date),
        ])
    }

    pub fn fields(&self) -> &[(String, FieldKind)] {
        &self.fields
    }

    /// Build the engine schema for this mapping. All fields are stored so
    /// query results can return display fields without a second lookup.
    pub fn build_schema(&self) -> Schema {
        let mut builder = Schema::builder();
        for (name, kind) in &self.fields {
            match kind {
                FieldKind::Text => {
                    builder.add_text_field(name, TEXT | STORED);
                }
                FieldKind::Keyword => {
                    builder.add_text_field(name, STRING | STORED);
                }
                FieldKind::Date => {
                    builder.add_date_field(name, INDEXED | STORED);
                }
            }
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_mapping_declares_expected_fields() {
        let mapping = FieldMapping::documents();
        let names: Vec<&str> = mapping.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["title", "body_text", "url", "snippet", "scraped_at"]);
    }

    #[test]
    fn schema_contains_every_mapped_field() {
        let mapping = FieldMapping::documents();
        let schema = mapping.build_schema();
        for (name, _) in mapping.fields() {
            assert!(schema.get_field(name).is_ok(), "schema missing field {name}");
        }
    }
}
