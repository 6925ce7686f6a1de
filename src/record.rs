//! Materialized records: typed field values, per-field errors, raw views.
//!
//! A [`Record`] is the user-facing result of reading one grid row through a
//! bound schema. It is an immutable value holder: it keeps no reference to
//! the grid, and a coercion failure for one field never prevents the rest
//! of the record from being read.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::field::FieldValue;

/// Key suffix under which a field's pre-transformed value is cached.
const TRANSFORM_SUFFIX: &str = "__transform";

// =============================================================================
// Raw Row
// =============================================================================

/// The raw cell strings of one row, keyed both positionally (0-based) and by
/// header name.
///
/// Also carries the per-field transform cache: once a field has run its
/// pre-transform pipeline over a cell, the normalized value is stored under
/// the derived key `<name>__transform` so repeated coercion reads the cached
/// value instead of re-running the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    by_index: HashMap<usize, String>,
    by_name: HashMap<String, String>,
    transformed: HashMap<String, Option<String>>,
}

impl RawRow {
    /// Build the positional and name-keyed views of a row.
    ///
    /// Rows shorter than the header list read as empty cells for the
    /// missing positions.
    pub fn from_row(headers: &[String], cells: &[String]) -> Self {
        let by_index = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (i, cell.clone()))
            .collect();
        let by_name = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect();

        Self {
            by_index,
            by_name,
            transformed: HashMap::new(),
        }
    }

    /// Raw cell by header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Raw cell by 0-based position.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Read the cached pre-transformed value for a field, if one was stored.
    ///
    /// The outer `Option` distinguishes "never transformed" from a cached
    /// absent result.
    pub(crate) fn cached_transform(&self, name: &str) -> Option<Option<String>> {
        self.transformed
            .get(&format!("{name}{TRANSFORM_SUFFIX}"))
            .cloned()
    }

    /// Cache a pre-transformed value under the derived key. First write wins.
    pub(crate) fn cache_transform(&mut self, name: &str, value: Option<String>) {
        self.transformed
            .entry(format!("{name}{TRANSFORM_SUFFIX}"))
            .or_insert(value);
    }
}

// =============================================================================
// Record
// =============================================================================

/// One materialized, typed row.
#[derive(Debug, Clone)]
pub struct Record {
    id: usize,
    values: BTreeMap<String, FieldValue>,
    errors: BTreeMap<String, String>,
    raw: RawRow,
}

impl Record {
    pub(crate) fn new(
        id: usize,
        values: BTreeMap<String, FieldValue>,
        errors: BTreeMap<String, String>,
        raw: RawRow,
    ) -> Self {
        Self {
            id,
            values,
            errors,
            raw,
        }
    }

    /// 1-based row identifier, stable until the underlying grid is reloaded.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Typed value of a bound field, absent if its coercion failed.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn get_int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_int)
    }

    pub fn get_float(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_float)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    pub fn get_date(&self, field: &str) -> Option<NaiveDate> {
        self.get(field).and_then(FieldValue::as_date)
    }

    pub fn get_list(&self, field: &str) -> Option<&[FieldValue]> {
        self.get(field).and_then(FieldValue::as_list)
    }

    /// All typed values.
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Per-field coercion errors captured during materialization.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// The raw cell strings of this row.
    pub fn raw(&self) -> &RawRow {
        &self.raw
    }

    /// Raw cell by the column's header name, bypassing coercion.
    pub fn raw_value(&self, column: &str) -> Option<&str> {
        self.raw.get(column)
    }

    /// Serialize to JSON: the row id plus one entry per bound field, with
    /// `null` for fields whose coercion failed.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(self.id as u64));
        for (field, value) in &self.values {
            map.insert(
                field.clone(),
                serde_json::to_value(value).unwrap_or(Value::Null),
            );
        }
        for field in self.errors.keys() {
            map.entry(field.clone()).or_insert(Value::Null);
        }
        Value::Object(map)
    }
}
