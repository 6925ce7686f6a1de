//! Record manager: schema-bound access to one grid-backed record type.
//!
//! A [`RecordManager`] owns the binding lifecycle for one record type and
//! offers `filter`, `get` and `get_by_row` over it. Filtering evaluates
//! column-scoped predicates per constraint and intersects the matches: the
//! result satisfies every constraint (logical AND), never just the last one.

use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::field::{Field, FieldValue, Op};
use crate::grid::{GridRegistry, TabularGrid};
use crate::iter::RecordSet;
use crate::record::{RawRow, Record};
use crate::schema::{Binding, LoadPolicy, SheetConfig};

// =============================================================================
// Constraints
// =============================================================================

/// One keyword filter constraint: field, operator, comparison value.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub field_key: String,
    pub op: Op,
    pub value: FieldValue,
}

impl Constraint {
    pub fn new(field_key: &str, op: Op, value: impl Into<FieldValue>) -> Self {
        Self {
            field_key: field_key.to_string(),
            op,
            value: value.into(),
        }
    }

    /// Equality constraint.
    pub fn eq(field_key: &str, value: impl Into<FieldValue>) -> Self {
        Self::new(field_key, Op::Eq, value)
    }

    /// Parse a keyword key of the form `field` or `field__operator`.
    ///
    /// Without an operator suffix the constraint defaults to equality. A
    /// suffix outside the fixed operator set is a usage error; field keys
    /// containing `__` must go through [`Constraint::new`].
    pub fn parse(key: &str, value: impl Into<FieldValue>) -> QueryResult<Self> {
        match key.rsplit_once("__") {
            Some((field_key, suffix)) => match Op::from_suffix(suffix) {
                Some(op) => Ok(Self::new(field_key, op, value)),
                None => Err(QueryError::UnknownOperator(suffix.to_string())),
            },
            None => Ok(Self::new(key, Op::Eq, value)),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.op == Op::Eq {
            write!(f, "{}={}", self.field_key, self.value)
        } else {
            write!(f, "{}__{}={}", self.field_key, self.op, self.value)
        }
    }
}

fn format_constraints(constraints: &[Constraint]) -> String {
    constraints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Record Manager
// =============================================================================

/// Schema-bound access to one record type.
pub struct RecordManager {
    model: String,
    config: SheetConfig,
    declared: Vec<(String, Field)>,
    grid: Arc<dyn TabularGrid>,
    binding: Option<Binding>,
}

impl RecordManager {
    /// Construct a manager, resolving the backing grid from the registry.
    ///
    /// Under the eager load policy binding runs here; per-field binding
    /// failures are collected, not fatal, but a transport failure reading
    /// the header row is.
    pub fn new(
        model: &str,
        config: SheetConfig,
        fields: Vec<(String, Field)>,
        registry: &GridRegistry,
    ) -> QueryResult<Self> {
        let grid =
            registry
                .get(&config.sheet, &config.tab)
                .ok_or_else(|| QueryError::UnknownSheet {
                    sheet: config.sheet.clone(),
                    tab: config.tab.clone(),
                })?;
        Self::with_grid(model, config, fields, grid)
    }

    /// Construct a manager over an explicit grid handle.
    pub fn with_grid(
        model: &str,
        config: SheetConfig,
        fields: Vec<(String, Field)>,
        grid: Arc<dyn TabularGrid>,
    ) -> QueryResult<Self> {
        let mut manager = Self {
            model: model.to_string(),
            config,
            declared: fields,
            grid,
            binding: None,
        };
        if manager.config.load_policy == LoadPolicy::Eager {
            manager.ensure_bound(false)?;
        }
        Ok(manager)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// The current binding, if one exists.
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// Per-field binding errors from the last bind, if bound.
    pub fn binding_errors(&self) -> Option<&BTreeMap<String, String>> {
        self.binding.as_ref().map(Binding::errors)
    }

    /// Run the schema binder unless already bound.
    ///
    /// Idempotent: a no-op when bound and not forced. Forcing replaces the
    /// headers, field map and error map wholesale.
    pub fn ensure_bound(&mut self, force: bool) -> QueryResult<()> {
        if self.binding.is_some() && !force {
            return Ok(());
        }
        let binding = Binding::bind(&self.config, &self.declared, self.grid.as_ref())?;
        self.binding = Some(binding);
        Ok(())
    }

    /// Bind now if the lazy policy deferred it; otherwise a no-op.
    pub fn initialize(&mut self) -> QueryResult<()> {
        self.ensure_bound(false)
    }

    /// Re-read headers and re-validate every declared field.
    pub fn reload(&mut self) -> QueryResult<()> {
        self.ensure_bound(true)
    }

    /// Filter data rows by chained constraints (logical AND).
    ///
    /// Issues one column read per constraint and intersects the per-column
    /// matches with the running candidate set. The returned set holds the
    /// final ascending 1-based row identifiers, fixed at construction.
    pub fn filter(&mut self, constraints: &[Constraint]) -> QueryResult<RecordSet<'_>> {
        self.ensure_bound(false)?;
        let binding = self.binding_ref()?;

        let row_count = self.grid.row_count()?;
        let first_data_row = self.config.header_row + 1;
        let mut candidates: Vec<usize> = (first_data_row..=row_count).collect();

        for constraint in constraints {
            let field = binding
                .field(&constraint.field_key)
                .ok_or_else(|| QueryError::UnknownField(constraint.field_key.clone()))?;
            let Some(index) = field.index() else {
                return Err(QueryError::UnknownField(constraint.field_key.clone()));
            };

            let column = self.grid.col_values(index + 1)?;
            candidates.retain(|&row| {
                column
                    .get(row - 1)
                    .is_some_and(|cell| field.matches(&constraint.value, cell, constraint.op))
            });
        }

        debug!(
            "filter '{}' [{}]: {} of {} data rows match",
            self.model,
            format_constraints(constraints),
            candidates.len(),
            row_count.saturating_sub(self.config.header_row)
        );

        Ok(RecordSet::new(self, candidates))
    }

    /// Materialize the first row matching the constraints.
    ///
    /// Zero matches is a lookup error naming the record type and the
    /// constraints; with several matches the lowest row id wins.
    pub fn get(&mut self, constraints: &[Constraint]) -> QueryResult<Record> {
        let row_ids = self.filter(constraints)?.row_ids().to_vec();
        match row_ids.first() {
            Some(&row_id) => self.materialize(row_id),
            None => Err(QueryError::NotFound {
                model: self.model.clone(),
                constraints: format_constraints(constraints),
            }),
        }
    }

    /// Materialize one row directly by its 1-based identifier.
    pub fn get_by_row(&mut self, row_id: usize) -> QueryResult<Record> {
        self.ensure_bound(false)?;
        self.materialize(row_id)
    }

    /// Read one row and coerce every bound field, capturing failures.
    ///
    /// Construction always succeeds even if every field fails coercion;
    /// only the grid read itself is fatal.
    pub(crate) fn materialize(&self, row_id: usize) -> QueryResult<Record> {
        let binding = self.binding_ref()?;
        let cells = self.grid.row_values(row_id)?;
        let mut raw = RawRow::from_row(binding.headers(), &cells);

        let mut values = BTreeMap::new();
        let mut errors = BTreeMap::new();
        for (attr, field) in binding.fields() {
            match field.get_value(&mut raw) {
                Ok(value) => {
                    values.insert(attr.clone(), value);
                }
                Err(err) => {
                    errors.insert(attr.clone(), err.to_string());
                }
            }
        }

        Ok(Record::new(row_id, values, errors, raw))
    }

    fn binding_ref(&self) -> QueryResult<&Binding> {
        self.binding
            .as_ref()
            .ok_or_else(|| QueryError::Unbound(self.model.clone()))
    }
}

impl fmt::Debug for RecordManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordManager")
            .field("model", &self.model)
            .field("config", &self.config)
            .field("declared", &self.declared)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
