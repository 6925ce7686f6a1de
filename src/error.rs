//! Error types for the rowbind schema-binding and query layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`GridError`] - Transport and structural failures at the grid boundary
//! - [`BindError`] - Schema binding failures (per declared field)
//! - [`ValueError`] - Per-field coercion failures during record materialization
//! - [`QueryError`] - Top-level query and usage errors
//!
//! Binding and materialization follow a "collect, don't abort" policy: a
//! [`BindError`] or [`ValueError`] for one field becomes an entry in an error
//! map and never aborts the surrounding operation. [`QueryError`] values are
//! fail-fast and stop the call in progress.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Grid Errors (transport)
// =============================================================================

/// Failures from the tabular grid collaborator.
///
/// These propagate unmodified through the query layer: the core does not
/// retry or translate store-level failures.
#[derive(Debug, Error)]
pub enum GridError {
    /// Requested row does not exist in the grid.
    #[error("Row {row} out of range (grid has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    /// Requested column does not exist in the grid.
    #[error("Column {col} out of range (grid has {cols} columns)")]
    ColOutOfRange { col: usize, cols: usize },

    /// Failed to read the backing source.
    #[error("Failed to read grid source: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the backing source's bytes.
    #[error("Failed to decode grid source: {0}")]
    EncodingError(String),

    /// The grid has no rows at all.
    #[error("Grid is empty")]
    EmptyGrid,

    /// Failure reported by the remote store itself.
    #[error("Store error: {0}")]
    StoreError(String),
}

// =============================================================================
// Binding Errors
// =============================================================================

/// A declared field could not be resolved against the header row.
///
/// Recorded per field in the binder's error map; never aborts binding of
/// the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Neither a name nor an index was declared for the field.
    #[error("No identifying attributes: field declares neither name nor index")]
    NoAttributes,

    /// Both identifying routes failed to resolve against the headers.
    #[error("Unresolvable field: {name_problem}; {index_problem}")]
    Unresolvable {
        name_problem: String,
        index_problem: String,
    },
}

// =============================================================================
// Value Errors (coercion)
// =============================================================================

/// A cell value could not be coerced to the field's declared kind.
///
/// Recorded per field in a record's error map during materialization;
/// never aborts construction of the rest of the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The cell was absent after pre-transforms and the field has no default.
    #[error("Absent value and no default is set")]
    AbsentWithoutDefault,

    /// The cell is not parseable as a number.
    #[error("Not a number: {0}")]
    NotANumber(String),

    /// The cell does not match the configured date format.
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// A list item failed coercion to the configured item type.
    #[error("List item '{value}' is not a valid {item_type}")]
    ListItem { value: String, item_type: String },

    /// Failure reported by a custom field's coercion function.
    #[error("{0}")]
    Custom(String),
}

// =============================================================================
// Query Errors (top-level)
// =============================================================================

/// Top-level query and usage errors.
///
/// This is the main error type returned by [`crate::manager::RecordManager`]
/// operations. It wraps grid failures and adds query-specific variants.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Grid transport or structural failure.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// `get` matched zero rows.
    #[error("No record matches [{constraints}] in '{model}'")]
    NotFound { model: String, constraints: String },

    /// A filter constraint referenced an undeclared or unbound field.
    #[error("Unknown or unbound field: {0}")]
    UnknownField(String),

    /// A constraint key carried an operator suffix outside the fixed set.
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),

    /// No grid is registered for the configured sheet and tab.
    #[error("No grid registered for sheet '{sheet}', tab '{tab}'")]
    UnknownSheet { sheet: String, tab: String },

    /// Positional access past the end of a result set.
    #[error("Index {index} out of range (result set has {size} rows)")]
    IndexOutOfRange { index: usize, size: usize },

    /// Operation requires a bound record type.
    #[error("Record type '{0}' is not bound")]
    Unbound(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for per-field coercion.
pub type ValueResult<T> = Result<T, ValueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // GridError -> QueryError
        let grid_err = GridError::RowOutOfRange { row: 12, rows: 4 };
        let query_err: QueryError = grid_err.into();
        assert!(query_err.to_string().contains("Row 12"));
    }

    #[test]
    fn test_bind_error_format() {
        let err = BindError::Unresolvable {
            name_problem: "name attribute [Age] was not found in header list".into(),
            index_problem: "index attribute was out of range. [given: 9], [header_size: 3]".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("[Age]"));
        assert!(msg.contains("header_size: 3"));
    }

    #[test]
    fn test_value_error_format() {
        let err = ValueError::ListItem {
            value: "abc".into(),
            item_type: "int".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc"));
        assert!(msg.contains("int"));
    }
}
