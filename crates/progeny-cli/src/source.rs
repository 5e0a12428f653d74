//! JSON record dumps on disk.
//!
//! A dump is either a bare array of rows or an object with a `records`
//! array. Rows are [`RawRecord`]s; unknown keys are ignored. A row that
//! cannot be read (a boolean count, an unparseable timestamp) is handed on
//! as [`RawRow::Malformed`] naming the offending field, so the rest of the
//! file still loads.

use crate::error::{CliError, Result};
use progeny_domain::traits::RecordSource;
use progeny_domain::{MalformedRow, PoliticianRecord, RawRecord, RawRow, RawValue, SourceTag};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A dataset stored as a JSON file, labelled by its file stem
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    label: String,
    default_source: SourceTag,
}

impl JsonFileSource {
    /// Create a source for a file; nothing is read until [`RecordSource::raw_records`]
    pub fn new(path: impl Into<PathBuf>, default_source: SourceTag) -> Self {
        let path = path.into();
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            label,
            default_source,
        }
    }

    /// File backing this source
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn row_values(&self, document: Value) -> Result<Vec<Value>> {
        let found = match document {
            Value::Array(rows) => return Ok(rows),
            Value::Object(mut root) => match root.remove("records") {
                Some(Value::Array(rows)) => return Ok(rows),
                Some(other) => format!("`records` holding {}", describe_kind(&other)),
                None => "an object without a `records` key".to_string(),
            },
            other => describe_kind(&other).to_string(),
        };
        Err(CliError::UnexpectedShape {
            path: self.path.clone(),
            found,
        })
    }
}

impl RecordSource for JsonFileSource {
    type Error = CliError;

    fn dataset_label(&self) -> &str {
        &self.label
    }

    fn default_source(&self) -> SourceTag {
        self.default_source
    }

    fn raw_records(&self) -> Result<Vec<RawRow>> {
        let contents = fs::read_to_string(&self.path).map_err(|source| CliError::Read {
            path: self.path.clone(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&contents).map_err(|source| CliError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        let rows: Vec<RawRow> = self.row_values(document)?.into_iter().map(read_row).collect();
        debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

fn read_row(value: Value) -> RawRow {
    let Value::Object(fields) = &value else {
        return RawRow::Malformed(MalformedRow {
            name: None,
            message: format!("expected an object, found {}", describe_kind(&value)),
        });
    };
    match RawRecord::deserialize(&value) {
        Ok(raw) => RawRow::Record(raw),
        Err(err) => RawRow::Malformed(MalformedRow {
            name: readable_name(fields),
            message: locate_error(fields).unwrap_or_else(|| err.to_string()),
        }),
    }
}

/// Re-read the row one key at a time to name the field that broke it
fn locate_error(fields: &Map<String, Value>) -> Option<String> {
    fields.iter().find_map(|(key, value)| {
        let mut single = Map::new();
        single.insert(key.clone(), value.clone());
        RawRecord::deserialize(&Value::Object(single))
            .err()
            .map(|err| format!("field `{}`: {}", key, err))
    })
}

fn readable_name(fields: &Map<String, Value>) -> Option<String> {
    ["name", "names"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

fn describe_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Turn a validated record back into a row that re-validates to the same record
pub fn to_raw(record: &PoliticianRecord) -> RawRecord {
    RawRecord {
        name: Some(record.name.clone()),
        party: record.party.clone(),
        state: record.state.clone(),
        constituency: record.constituency.clone(),
        session_or_assembly: record.session_or_assembly.clone().map(RawValue::Text),
        sons: record.sons.map(RawValue::from),
        daughters: record.daughters.map(RawValue::from),
        source: Some(record.provenance.source.as_str().to_string()),
        collected_at: record.provenance.collected_at,
    }
}

/// Write records as a JSON dump readable by every command
pub fn write_dump(path: &Path, records: &[PoliticianRecord]) -> Result<()> {
    let rows: Vec<RawRecord> = records.iter().map(to_raw).collect();
    fs::write(path, serde_json::to_string_pretty(&rows)?)?;
    debug!("Wrote {} records to {}", rows.len(), path.display());
    Ok(())
}
