// crates/testcorpus-core/src/core/record.rs
// ============================================================================
// Module: Corpus Records and Containers
// Description: Opaque test records and the containers that hold them.
// Purpose: Parse and render container files without losing unknown fields.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Record`] is one test-case entry held as its raw JSON value. The engine
//! only reads the metadata header (`function`, `meta`, `variants`); every
//! other field is payload and passes through untouched, in its original key
//! order.
//!
//! A [`Container`] is one corpus file: an ordered list of records plus a
//! `$schema` reference, an optional description, and any extra top-level
//! fields. Containers are identified by their file stem for reporting and by
//! their location relative to the corpus root for rewriting.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::CorpusError;

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// Top-level schema reference field.
const SCHEMA_FIELD: &str = "$schema";
/// Top-level description field.
const DESCRIPTION_FIELD: &str = "description";
/// Top-level records field.
const RECORDS_FIELD: &str = "tests";
/// Record metadata header field.
const META_FIELD: &str = "meta";
/// Record variant tag list field.
const VARIANTS_FIELD: &str = "variants";
/// Record function name field.
const FUNCTION_FIELD: &str = "function";
/// Legacy record feature list field.
const FEATURES_FIELD: &str = "features";

// ============================================================================
// SECTION: Variant Tags
// ============================================================================

/// Named variant tag (for example `proposed_behavior`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantTag(String);

impl VariantTag {
    /// Creates a variant tag from a string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VariantTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Opaque test record.
///
/// # Invariants
/// - The wrapped JSON value is never modified by the engine.
/// - The variant tag set is the string entries of the `variants` array; a
///   missing or non-array `variants` field means the record is untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Wraps a raw JSON value as a record.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the raw JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the record and returns the raw JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns the identifying function name, when present.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        self.0.get(FUNCTION_FIELD).and_then(Value::as_str)
    }

    /// Returns a string field from the `meta` header.
    #[must_use]
    pub fn meta_str(&self, field: &str) -> Option<&str> {
        self.0.get(META_FIELD).and_then(|meta| meta.get(field)).and_then(Value::as_str)
    }

    /// Returns the first entry of the legacy `features` list.
    #[must_use]
    pub fn first_listed_feature(&self) -> Option<&str> {
        self.0
            .get(FEATURES_FIELD)
            .and_then(Value::as_array)
            .and_then(|features| features.first())
            .and_then(Value::as_str)
    }

    /// Iterates the record's variant tags in declaration order.
    pub fn variant_tags(&self) -> impl Iterator<Item = &str> {
        self.0
            .get(VARIANTS_FIELD)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Returns true when the record carries the tag.
    #[must_use]
    pub fn has_variant(&self, tag: &VariantTag) -> bool {
        self.variant_tags().any(|candidate| candidate == tag.as_str())
    }

    /// Returns true when the record carries no variant tags.
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        self.variant_tags().next().is_none()
    }
}

// ============================================================================
// SECTION: Containers
// ============================================================================

/// On-disk shape of a container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerLayout {
    /// Object with a `tests` array.
    Suite,
    /// Bare array of records.
    List,
    /// No recognized records field; contributes zero records.
    Unrecognized,
}

/// Named, ordered sequence of records.
///
/// # Invariants
/// - `name` is the file stem of `location`.
/// - `schema` is copied verbatim into every derived container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// File-derived container name (stem without extension).
    pub name: String,
    /// Location relative to the corpus root.
    pub location: PathBuf,
    /// Opaque schema reference.
    pub schema: Option<String>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Ordered records.
    pub records: Vec<Record>,
    /// Additional top-level fields, passed through unchanged.
    pub extra: Map<String, Value>,
    /// Layout the container was read from.
    pub layout: ContainerLayout,
}

impl Container {
    /// Creates an empty suite container at the given relative location.
    #[must_use]
    pub fn new(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        Self {
            name: container_name(&location),
            location,
            schema: None,
            description: None,
            records: Vec::new(),
            extra: Map::new(),
            layout: ContainerLayout::Suite,
        }
    }

    /// Sets the schema reference.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the records.
    #[must_use]
    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Moves the container to a new relative location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        self.name = container_name(&location);
        self.location = location;
        self
    }

    /// Parses container bytes read from `location`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Parse`] when the bytes are not UTF-8 JSON or the
    /// `$schema` / `description` fields are not strings.
    pub fn from_json_bytes(location: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, CorpusError> {
        let mut container = Self::new(location);
        let label = container.location.display().to_string();
        let text = std::str::from_utf8(bytes).map_err(|_| CorpusError::Parse {
            container: label.clone(),
            message: String::from("container must be utf-8"),
        })?;
        let value: Value = serde_json::from_str(text).map_err(|err| CorpusError::Parse {
            container: label.clone(),
            message: err.to_string(),
        })?;
        match value {
            Value::Array(items) => {
                container.layout = ContainerLayout::List;
                container.records = items.into_iter().map(Record::new).collect();
            }
            Value::Object(mut fields) => {
                container.schema = take_string(&mut fields, SCHEMA_FIELD, &label)?;
                container.description = take_string(&mut fields, DESCRIPTION_FIELD, &label)?;
                match fields.remove(RECORDS_FIELD) {
                    Some(Value::Array(items)) => {
                        container.records = items.into_iter().map(Record::new).collect();
                    }
                    Some(other) => {
                        fields.insert(String::from(RECORDS_FIELD), other);
                        container.layout = ContainerLayout::Unrecognized;
                    }
                    None => container.layout = ContainerLayout::Unrecognized,
                }
                container.extra = fields;
            }
            _ => container.layout = ContainerLayout::Unrecognized,
        }
        Ok(container)
    }

    /// Renders the container as pretty JSON with a trailing newline.
    ///
    /// List containers render as a bare array; all others render as an
    /// object with `$schema`, `description`, extra fields, then `tests`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Serialization`] when rendering fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CorpusError> {
        let value = match self.layout {
            ContainerLayout::List => {
                Value::Array(self.records.iter().map(|record| record.as_value().clone()).collect())
            }
            ContainerLayout::Suite | ContainerLayout::Unrecognized => {
                let mut fields = Map::new();
                if let Some(schema) = &self.schema {
                    fields.insert(String::from(SCHEMA_FIELD), Value::String(schema.clone()));
                }
                if let Some(description) = &self.description {
                    fields.insert(
                        String::from(DESCRIPTION_FIELD),
                        Value::String(description.clone()),
                    );
                }
                for (key, value) in &self.extra {
                    fields.insert(key.clone(), value.clone());
                }
                if self.layout == ContainerLayout::Suite {
                    let records =
                        self.records.iter().map(|record| record.as_value().clone()).collect();
                    fields.insert(String::from(RECORDS_FIELD), Value::Array(records));
                }
                Value::Object(fields)
            }
        };
        let mut bytes = serde_json::to_vec_pretty(&value)
            .map_err(|err| CorpusError::Serialization(err.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Builds a derived container at `location` holding `records`.
    ///
    /// Schema, description, extra fields, and layout are copied verbatim.
    #[must_use]
    pub fn derive(&self, location: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        let location = location.into();
        Self {
            name: container_name(&location),
            location,
            schema: self.schema.clone(),
            description: self.description.clone(),
            records,
            extra: self.extra.clone(),
            layout: self.layout,
        }
    }

    /// Returns the file name (with extension) of the container location.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.location
            .file_name()
            .map_or_else(|| self.name.clone(), |name| name.to_string_lossy().into_owned())
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the container holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the file stem used as the container name.
fn container_name(location: &Path) -> String {
    location.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Removes an optional string field, failing on non-string values.
fn take_string(
    fields: &mut Map<String, Value>,
    key: &str,
    container: &str,
) -> Result<Option<String>, CorpusError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(CorpusError::Parse {
            container: container.to_string(),
            message: format!("{key} must be a string"),
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
