//! Record type configuration and the schema binder.
//!
//! Binding resolves a record type's declared fields against the actual
//! header row of its grid, once per type. Fields that fail to resolve are
//! collected into an error map instead of aborting the bind; they are
//! simply unusable in later queries.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::GridResult;
use crate::field::Field;
use crate::grid::TabularGrid;

// =============================================================================
// Configuration
// =============================================================================

/// When binding runs relative to record-type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Bind when the record manager is constructed.
    Eager,
    /// Bind on first use.
    #[default]
    Lazy,
}

/// Per-record-type configuration: which grid backs it and where its header
/// row sits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Name or handle of the backing data source.
    pub sheet: String,
    /// Sub-table (worksheet) name.
    pub tab: String,
    /// 1-based row holding column names; rows strictly below are data rows.
    #[serde(default = "default_header_row")]
    pub header_row: usize,
    #[serde(default)]
    pub load_policy: LoadPolicy,
}

fn default_header_row() -> usize {
    1
}

impl SheetConfig {
    pub fn new(sheet: &str, tab: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            tab: tab.to_string(),
            header_row: default_header_row(),
            load_policy: LoadPolicy::default(),
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn eager(mut self) -> Self {
        self.load_policy = LoadPolicy::Eager;
        self
    }
}

// =============================================================================
// Binding
// =============================================================================

/// The result of binding one record type against its grid.
///
/// Created wholesale by [`Binding::bind`] and replaced wholesale on reload;
/// never partially mutated in between.
#[derive(Debug, Clone)]
pub struct Binding {
    headers: Vec<String>,
    fields: BTreeMap<String, Field>,
    errors: BTreeMap<String, String>,
}

impl Binding {
    /// Read the header row and validate every declared field against it.
    ///
    /// Transport failures reading the header row are fatal; individual field
    /// resolution failures land in the error map.
    pub fn bind(
        config: &SheetConfig,
        declared: &[(String, Field)],
        grid: &dyn TabularGrid,
    ) -> GridResult<Self> {
        let headers = grid.row_values(config.header_row)?;

        let mut fields = BTreeMap::new();
        let mut errors = BTreeMap::new();
        for (attr, field) in declared {
            let mut field = field.clone();
            match field.validate(&headers) {
                Ok(()) => {
                    fields.insert(attr.clone(), field);
                }
                Err(err) => {
                    errors.insert(attr.clone(), err.to_string());
                }
            }
        }

        debug!(
            "bound '{}/{}': {} fields, {} errors",
            config.sheet,
            config.tab,
            fields.len(),
            errors.len()
        );

        Ok(Self {
            headers,
            fields,
            errors,
        })
    }

    /// Header row as read at bind time.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The bound field for a declared attribute, if it resolved.
    pub fn field(&self, attr: &str) -> Option<&Field> {
        self.fields.get(attr)
    }

    /// All bound fields, keyed by attribute name.
    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    /// Per-field binding errors, keyed by attribute name.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}
