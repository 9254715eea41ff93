//! Field metadata for the project's data dictionary.

use serde::{Deserialize, Serialize};

/// Field types whose values form a small closed set and can be itemized.
pub const BUCKETABLE_FIELD_TYPES: &[&str] = &["radio", "dropdown", "truefalse", "yesno"];

/// Returns `true` if fields of the given type can be used for `bucketBy`.
pub fn is_bucketable_type(field_type: &str) -> bool {
    BUCKETABLE_FIELD_TYPES.contains(&field_type)
}

/// Capability to test whether a field exists and resolve its display label.
///
/// `field_label` is only called after `field_exists` returned `true`.
pub trait FieldLookup {
    fn field_exists(&self, field_name: &str) -> bool;
    fn field_label(&self, field_name: &str) -> String;
}

/// One raw data dictionary entry as exported by the backing system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub form_name: String,
    pub field_name: String,
    pub field_label: String,
    pub field_type: String,
}

/// A field that can be offered in the "count by" picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketableField {
    pub form_name: String,
    pub field_name: String,
    pub field_label: String,
}

/// The bucketable subset of a project's data dictionary, in dictionary order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataDictionary {
    fields: Vec<BucketableField>,
}

impl DataDictionary {
    /// Build from raw entries, keeping only bucketable field types.
    pub fn from_entries(entries: impl IntoIterator<Item = DictionaryEntry>) -> Self {
        let fields = entries
            .into_iter()
            .filter(|e| is_bucketable_type(&e.field_type))
            .map(|e| BucketableField {
                form_name: e.form_name,
                field_name: e.field_name,
                field_label: e.field_label,
            })
            .collect();
        Self { fields }
    }

    pub fn bucketable_fields(&self) -> &[BucketableField] {
        &self.fields
    }

    fn find(&self, field_name: &str) -> Option<&BucketableField> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }
}

impl FieldLookup for DataDictionary {
    fn field_exists(&self, field_name: &str) -> bool {
        self.find(field_name).is_some()
    }

    fn field_label(&self, field_name: &str) -> String {
        self.find(field_name)
            .map(|f| f.field_label.clone())
            .unwrap_or_else(|| field_name.to_string())
    }
}
