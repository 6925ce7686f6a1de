//! # rowbind - typed records over spreadsheet-shaped grids
//!
//! rowbind binds a declared schema (a set of typed field descriptors) to the
//! rows of a tabular grid and offers typed retrieval, validation and filtered
//! querying, so spreadsheet rows behave like typed records instead of raw
//! string cells.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Tabular Grid │────▶│Schema Binder │────▶│ RecordManager│────▶│    Record    │
//! │ (rows/cols)  │     │ (headers →   │     │ (filter/get, │     │ (typed values│
//! │              │     │  field map)  │     │  AND chains) │     │  + errors)   │
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rowbind::{
//!     Constraint, Field, GridRegistry, MemoryGrid, RecordManager, SheetConfig,
//! };
//!
//! let mut registry = GridRegistry::new();
//! registry.insert(
//!     "Test Sheet",
//!     "Users",
//!     MemoryGrid::from_rows(&[
//!         &["Name", "Age", "Family"],
//!         &["Devendra", "29", "yes"],
//!         &["Asha", "34", "no"],
//!     ]),
//! );
//!
//! let mut users = RecordManager::new(
//!     "Users",
//!     SheetConfig::new("Test Sheet", "Users"),
//!     vec![
//!         ("name".to_string(), Field::string().named("Name")),
//!         ("age".to_string(), Field::integer().named("Age")),
//!         ("is_family".to_string(), Field::boolean().named("Family")),
//!     ],
//!     &registry,
//! )
//! .unwrap();
//!
//! let record = users
//!     .get(&[Constraint::parse("age__lt", 30).unwrap()])
//!     .unwrap();
//! assert_eq!(record.get_str("name"), Some("Devendra"));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`transform`] - Pre/post cell-string transforms
//! - [`field`] - Field descriptors, kinds, coercion and predicates
//! - [`grid`] - Tabular grid boundary, registry, memory and CSV grids
//! - [`schema`] - Record type configuration and the schema binder
//! - [`manager`] - Record manager: binding lifecycle, filter/get
//! - [`iter`] - Result sets over resolved row identifiers
//! - [`record`] - Materialized records with per-field error capture

// Core modules
pub mod error;
pub mod transform;

// Schema
pub mod field;
pub mod schema;

// Grid access
pub mod grid;

// Querying
pub mod iter;
pub mod manager;
pub mod record;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BindError, GridError, GridResult, QueryError, QueryResult, ValueError, ValueResult,
};

// =============================================================================
// Re-exports - Fields
// =============================================================================

pub use field::{CoerceFn, DateFormat, Field, FieldKind, FieldValue, ItemType, Op};

// =============================================================================
// Re-exports - Transforms
// =============================================================================

pub use transform::{standard_pre_transforms, Transform};

// =============================================================================
// Re-exports - Grid access
// =============================================================================

pub use grid::csv::CsvGrid;
pub use grid::memory::MemoryGrid;
pub use grid::{GridRegistry, TabularGrid};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{Binding, LoadPolicy, SheetConfig};

// =============================================================================
// Re-exports - Querying
// =============================================================================

pub use iter::RecordSet;
pub use manager::{Constraint, RecordManager};
pub use record::{RawRow, Record};
