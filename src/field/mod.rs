//! Field descriptors: one per schema attribute.
//!
//! A [`Field`] declares where a column lives (header name and/or 0-based
//! index), what kind of value it holds, how absent cells are handled, and
//! which transforms run around coercion. Binding resolves the declared
//! location against the actual header row; after binding, name and index are
//! both set and mutually consistent.

pub mod kind;

pub use kind::{CoerceFn, DateFormat, FieldKind, FieldValue, ItemType, Op};

use crate::error::{BindError, ValueError, ValueResult};
use crate::record::RawRow;
use crate::transform::{standard_pre_transforms, Transform};

/// Descriptor of one schema column.
#[derive(Debug, Clone)]
pub struct Field {
    name: Option<String>,
    index: Option<usize>,
    allow_absent: bool,
    default: Option<FieldValue>,
    pre_transforms: Vec<Transform>,
    post_transforms: Vec<Transform>,
    kind: FieldKind,
}

impl Field {
    fn new(kind: FieldKind) -> Self {
        Self {
            name: None,
            index: None,
            allow_absent: false,
            default: None,
            pre_transforms: Vec::new(),
            post_transforms: Vec::new(),
            kind,
        }
    }

    /// A string column.
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// An integer column. Cells parse as floating point, then truncate.
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    /// A decimal column.
    pub fn decimal() -> Self {
        Self::new(FieldKind::Decimal)
    }

    /// A boolean column; true iff the cell is one of `t,true,ok,yes,y,1`.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// A date column parsed against the given format.
    pub fn date(format: DateFormat) -> Self {
        Self::new(FieldKind::Date { format })
    }

    /// A list column: bracketed tag lists are extracted, items split on the
    /// delimiter and coerced to the item type.
    pub fn list(delimiter: &str, item_type: ItemType) -> Self {
        Self::new(FieldKind::List {
            delimiter: delimiter.to_string(),
            item_type,
        })
    }

    /// A custom column whose value is produced from the full raw row.
    pub fn custom(coerce: CoerceFn) -> Self {
        Self::new(FieldKind::Custom { coerce })
    }

    /// Declare the column's header name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Declare the column's 0-based index.
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Allow absent cells; `get_value` then yields the default.
    pub fn optional(mut self) -> Self {
        self.allow_absent = true;
        self
    }

    /// Value returned for absent cells when the field is optional.
    pub fn with_default(mut self, default: impl Into<FieldValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Append a pre-transform, run after the standard pipeline.
    pub fn with_pre_transform(mut self, transform: Transform) -> Self {
        self.pre_transforms.push(transform);
        self
    }

    /// Append a post-transform, run over string values after coercion.
    pub fn with_post_transform(mut self, transform: Transform) -> Self {
        self.post_transforms.push(transform);
        self
    }

    /// Resolved (post-binding) header name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolved (post-binding) 0-based column index.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.allow_absent
    }

    // =========================================================================
    // Binding validation
    // =========================================================================

    /// Resolve the declared name/index against the header row.
    ///
    /// Name resolution wins when both identifying attributes are declared;
    /// the other attribute is overwritten for consistency. Validation fails
    /// only when every declared identifying route fails, with an error
    /// listing both problems.
    pub fn validate(&mut self, headers: &[String]) -> Result<(), BindError> {
        // Custom fields produce their value from the raw row; a typed fn
        // pointer is callable by construction, nothing to resolve.
        if matches!(self.kind, FieldKind::Custom { .. }) {
            return Ok(());
        }

        if self.name.is_none() && self.index.is_none() {
            return Err(BindError::NoAttributes);
        }

        let mut name_problem = String::new();
        let mut resolved: Option<(String, usize)> = None;

        match &self.name {
            Some(name) => match headers.iter().position(|h| h == name) {
                Some(i) => resolved = Some((name.clone(), i)),
                None => {
                    name_problem =
                        format!("name attribute [{name}] was not found in header list");
                }
            },
            None => name_problem = "name attribute was not declared".to_string(),
        }

        if resolved.is_none() {
            let index_problem = match self.index {
                Some(i) if i < headers.len() => {
                    resolved = Some((headers[i].clone(), i));
                    String::new()
                }
                Some(i) => format!(
                    "index attribute was out of range. [given: {i}], [header_size: {}]",
                    headers.len()
                ),
                None => "index attribute was not declared".to_string(),
            };

            if resolved.is_none() {
                return Err(BindError::Unresolvable {
                    name_problem,
                    index_problem,
                });
            }
        }

        let (name, index) = resolved.unwrap_or_default();
        self.name = Some(name);
        self.index = Some(index);
        Ok(())
    }

    // =========================================================================
    // Value coercion
    // =========================================================================

    /// Read this field's typed value from a raw row.
    ///
    /// Pre-transforms run once per row and field; the normalized value is
    /// cached in the row under the derived transform key, so repeated reads
    /// see the already-normalized value.
    pub fn get_value(&self, raw: &mut RawRow) -> ValueResult<FieldValue> {
        if let FieldKind::Custom { coerce } = self.kind {
            return coerce(raw);
        }

        let Some(name) = self.name.clone() else {
            return Err(ValueError::Custom("field is not bound".to_string()));
        };

        let value = match raw.cached_transform(&name) {
            Some(cached) => cached,
            None => {
                let cell = raw.get(&name).map(str::to_string);
                let normalized = Transform::apply_all(&self.pre_pipeline(), cell.as_deref());
                raw.cache_transform(&name, normalized.clone());
                normalized
            }
        };

        let Some(value) = value else {
            return self.absent_value();
        };

        let coerced = self.kind.coerce(&value)?;

        // Post-transforms operate on cell strings; only string-typed
        // coercions pass through them.
        match coerced {
            FieldValue::Str(s) => {
                match Transform::apply_all(&self.post_transforms, Some(&s)) {
                    Some(s) => Ok(FieldValue::Str(s)),
                    None => self.absent_value(),
                }
            }
            other => Ok(other),
        }
    }

    /// Evaluate a filter predicate against one raw cell of this column.
    ///
    /// The cell runs through the pre-transform pipeline first, so `NA` and
    /// `#REF!` cells never match.
    pub fn matches(&self, query: &FieldValue, cell: &str, op: Op) -> bool {
        match Transform::apply_all(&self.pre_pipeline(), Some(cell)) {
            Some(normalized) => self.kind.matches(query, &normalized, op),
            None => false,
        }
    }

    fn absent_value(&self) -> ValueResult<FieldValue> {
        if self.allow_absent {
            Ok(self.default.clone().unwrap_or(FieldValue::Null))
        } else {
            Err(ValueError::AbsentWithoutDefault)
        }
    }

    /// Standard pre-transforms, then the declared ones. A list field with no
    /// declared pre-transforms gets the tag-list extraction.
    fn pre_pipeline(&self) -> Vec<Transform> {
        let mut pipeline = Vec::from(standard_pre_transforms());
        if self.pre_transforms.is_empty() {
            if matches!(self.kind, FieldKind::List { .. }) {
                pipeline.push(Transform::ExtractTagList);
            }
        } else {
            pipeline.extend(self.pre_transforms.iter().copied());
        }
        pipeline
    }
}
