//! Field kinds: per-kind coercion and predicate semantics.
//!
//! Each schema column declares one [`FieldKind`]. The kind owns the raw
//! cell-string to [`FieldValue`] coercion and the comparison semantics used
//! by column filtering. Kinds are a closed variant set dispatched by match,
//! never open-ended subtyping.

use chrono::NaiveDate;
use log::warn;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::{ValueError, ValueResult};
use crate::record::RawRow;

/// Tokens recognized as `true` by boolean coercion, compared lower-case.
static TRUTHY_TOKENS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["t", "true", "ok", "yes", "y", "1"]));

// =============================================================================
// Field Values
// =============================================================================

/// A typed cell value produced by coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<FieldValue>),
    Null,
}

impl FieldValue {
    /// Get the string value if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{s}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Date(d) => write!(f, "{d}"),
            FieldValue::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join(","))
            }
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        FieldValue::Date(v)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(v: Vec<FieldValue>) -> Self {
        FieldValue::List(v)
    }
}

// =============================================================================
// Predicate Operators
// =============================================================================

/// Comparison operator of a filter constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    /// Exact equality.
    Eq,
    /// Numeric less-than.
    Lt,
    /// Numeric less-than-or-equal.
    Lte,
    /// Numeric greater-than.
    Gt,
    /// Numeric greater-than-or-equal.
    Gte,
    /// Substring containment (string fields).
    Ct,
}

impl Op {
    /// Parse a constraint-key suffix (`"lt"` in `age__lt`).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "eq" => Some(Op::Eq),
            "lt" => Some(Op::Lt),
            "lte" => Some(Op::Lte),
            "gt" => Some(Op::Gt),
            "gte" => Some(Op::Gte),
            "ct" => Some(Op::Ct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Ct => "ct",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Kind-specific Options
// =============================================================================

/// Date parsing format for date fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `%m/%d/%Y` (default).
    #[default]
    MonthDayYear,
    /// `%d/%m/%Y`.
    DayMonthYear,
    /// Any chrono format string.
    Custom(String),
}

impl DateFormat {
    pub fn as_str(&self) -> &str {
        match self {
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::Custom(fmt) => fmt,
        }
    }
}

/// Item type of a list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemType {
    #[default]
    Str,
    Int,
    Float,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Str => write!(f, "str"),
            ItemType::Int => write!(f, "int"),
            ItemType::Float => write!(f, "float"),
        }
    }
}

/// Coercion function of a custom field: full raw row in, typed value out.
pub type CoerceFn = fn(&RawRow) -> ValueResult<FieldValue>;

// =============================================================================
// Field Kinds
// =============================================================================

/// The declared kind of a schema column.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Date { format: DateFormat },
    List { delimiter: String, item_type: ItemType },
    Custom { coerce: CoerceFn },
}

impl FieldKind {
    /// Short kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Boolean => "boolean",
            FieldKind::Date { .. } => "date",
            FieldKind::List { .. } => "list",
            FieldKind::Custom { .. } => "custom",
        }
    }

    /// Coerce a pre-transformed, present cell string to a typed value.
    ///
    /// Custom kinds never reach this point: their coercion runs over the
    /// full raw row in [`crate::field::Field::get_value`].
    pub fn coerce(&self, value: &str) -> ValueResult<FieldValue> {
        match self {
            FieldKind::String | FieldKind::Custom { .. } => {
                Ok(FieldValue::Str(value.to_string()))
            }
            FieldKind::Integer => parse_int(value)
                .map(FieldValue::Int)
                .ok_or_else(|| ValueError::NotANumber(value.to_string())),
            FieldKind::Decimal => parse_float(value)
                .map(FieldValue::Float)
                .ok_or_else(|| ValueError::NotANumber(value.to_string())),
            FieldKind::Boolean => Ok(FieldValue::Bool(truthy(value))),
            FieldKind::Date { format } => {
                NaiveDate::parse_from_str(value, format.as_str())
                    .map(FieldValue::Date)
                    .map_err(|_| ValueError::InvalidDate(value.to_string()))
            }
            FieldKind::List { delimiter, item_type } => {
                if value.is_empty() {
                    return Ok(FieldValue::List(Vec::new()));
                }
                let items: ValueResult<Vec<FieldValue>> = value
                    .split(delimiter.as_str())
                    .map(crate::transform::strip_item)
                    .map(|item| coerce_item(item, *item_type))
                    .collect();
                Ok(FieldValue::List(items?))
            }
        }
    }

    /// Evaluate a filter predicate against a raw (already pre-transformed)
    /// cell string.
    ///
    /// An operator outside the kind's supported set is diagnosed and treated
    /// as non-matching; it never fails the query.
    pub fn matches(&self, query: &FieldValue, cell: &str, op: Op) -> bool {
        match self {
            FieldKind::String => match op {
                Op::Eq => query.to_string() == cell,
                Op::Ct => cell.contains(&query.to_string()),
                _ => unsupported(self, op),
            },
            FieldKind::Integer => {
                let (Some(cell_val), Some(query_val)) = (parse_int(cell), query_int(query))
                else {
                    return false;
                };
                compare(cell_val, query_val, op).unwrap_or_else(|| unsupported(self, op))
            }
            FieldKind::Decimal => {
                let (Some(cell_val), Some(query_val)) = (parse_float(cell), query_float(query))
                else {
                    return false;
                };
                compare(cell_val, query_val, op).unwrap_or_else(|| unsupported(self, op))
            }
            FieldKind::Boolean => match (op, query_bool(query)) {
                (Op::Eq, Some(query_val)) => truthy(cell) == query_val,
                (Op::Eq, None) => false,
                _ => unsupported(self, op),
            },
            // Predicates are not defined for these kinds: fall back to
            // base string equality.
            FieldKind::Date { .. } | FieldKind::List { .. } | FieldKind::Custom { .. } => {
                match op {
                    Op::Eq => query.to_string() == cell,
                    _ => unsupported(self, op),
                }
            }
        }
    }
}

/// Diagnose an unsupported operator/kind combination; never fatal.
fn unsupported(kind: &FieldKind, op: Op) -> bool {
    warn!(
        "operator '{op}' is not supported for {} fields; treating as non-matching",
        kind.name()
    );
    false
}

fn compare<T: PartialOrd>(cell: T, query: T, op: Op) -> Option<bool> {
    match op {
        Op::Eq => Some(cell == query),
        Op::Lt => Some(cell < query),
        Op::Lte => Some(cell <= query),
        Op::Gt => Some(cell > query),
        Op::Gte => Some(cell >= query),
        Op::Ct => None,
    }
}

/// Parse as floating point, then truncate. Matches integer-field coercion.
fn parse_int(value: &str) -> Option<i64> {
    parse_float(value).map(|f| f as i64)
}

fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

fn truthy(value: &str) -> bool {
    TRUTHY_TOKENS.contains(value.to_lowercase().as_str())
}

fn query_int(query: &FieldValue) -> Option<i64> {
    match query {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(f) => Some(*f as i64),
        FieldValue::Str(s) => parse_int(s),
        _ => None,
    }
}

fn query_float(query: &FieldValue) -> Option<f64> {
    match query {
        FieldValue::Int(i) => Some(*i as f64),
        FieldValue::Float(f) => Some(*f),
        FieldValue::Str(s) => parse_float(s),
        _ => None,
    }
}

fn query_bool(query: &FieldValue) -> Option<bool> {
    match query {
        FieldValue::Bool(b) => Some(*b),
        FieldValue::Str(s) => Some(truthy(s)),
        _ => None,
    }
}

fn coerce_item(item: &str, item_type: ItemType) -> ValueResult<FieldValue> {
    match item_type {
        ItemType::Str => Ok(FieldValue::Str(item.to_string())),
        ItemType::Int => parse_int(item)
            .map(FieldValue::Int)
            .ok_or_else(|| ValueError::ListItem {
                value: item.to_string(),
                item_type: item_type.to_string(),
            }),
        ItemType::Float => parse_float(item)
            .map(FieldValue::Float)
            .ok_or_else(|| ValueError::ListItem {
                value: item.to_string(),
                item_type: item_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion_truncates() {
        let kind = FieldKind::Integer;
        assert_eq!(kind.coerce("29").unwrap(), FieldValue::Int(29));
        assert_eq!(kind.coerce("29.9").unwrap(), FieldValue::Int(29));
        assert!(matches!(
            kind.coerce("abc"),
            Err(ValueError::NotANumber(_))
        ));
    }

    #[test]
    fn test_decimal_coercion() {
        let kind = FieldKind::Decimal;
        assert_eq!(kind.coerce("3.25").unwrap(), FieldValue::Float(3.25));
        assert!(kind.coerce("x").is_err());
    }

    #[test]
    fn test_boolean_coercion_truthy_tokens() {
        let kind = FieldKind::Boolean;
        for token in ["t", "TRUE", "ok", "Yes", "y", "1"] {
            assert_eq!(kind.coerce(token).unwrap(), FieldValue::Bool(true), "{token}");
        }
        assert_eq!(kind.coerce("no").unwrap(), FieldValue::Bool(false));
        assert_eq!(kind.coerce("0").unwrap(), FieldValue::Bool(false));
    }

    #[test]
    fn test_date_coercion() {
        let kind = FieldKind::Date {
            format: DateFormat::MonthDayYear,
        };
        assert_eq!(
            kind.coerce("03/15/2024").unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!(matches!(
            kind.coerce("2024-03-15"),
            Err(ValueError::InvalidDate(_))
        ));

        let dmy = FieldKind::Date {
            format: DateFormat::DayMonthYear,
        };
        assert_eq!(
            dmy.coerce("15/03/2024").unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_list_coercion() {
        let kind = FieldKind::List {
            delimiter: ",".into(),
            item_type: ItemType::Int,
        };
        assert_eq!(
            kind.coerce("1, 2,3").unwrap(),
            FieldValue::List(vec![
                FieldValue::Int(1),
                FieldValue::Int(2),
                FieldValue::Int(3)
            ])
        );
        // The offending value is named in the error.
        match kind.coerce("1,x,3") {
            Err(ValueError::ListItem { value, item_type }) => {
                assert_eq!(value, "x");
                assert_eq!(item_type, "int");
            }
            other => panic!("expected ListItem error, got {other:?}"),
        }
    }

    #[test]
    fn test_string_predicates() {
        let kind = FieldKind::String;
        let query = FieldValue::Str("Devendra".into());
        assert!(kind.matches(&query, "Devendra", Op::Eq));
        assert!(!kind.matches(&query, "devendra", Op::Eq));
        assert!(kind.matches(&FieldValue::Str("ven".into()), "Devendra", Op::Ct));
        // Numeric operators are not supported on strings: non-matching.
        assert!(!kind.matches(&query, "Devendra", Op::Lt));
    }

    #[test]
    fn test_integer_predicates() {
        let kind = FieldKind::Integer;
        let thirty = FieldValue::Int(30);
        assert!(kind.matches(&thirty, "29", Op::Lt));
        assert!(!kind.matches(&thirty, "30", Op::Lt));
        assert!(kind.matches(&thirty, "30", Op::Lte));
        assert!(kind.matches(&thirty, "31", Op::Gt));
        assert!(kind.matches(&thirty, "30", Op::Eq));
        // Property 4 round-trip: "29" -> 29 -> eq against the raw cell.
        assert!(kind.matches(&FieldValue::Int(29), "29", Op::Eq));
        // Non-numeric cells never match numeric predicates.
        assert!(!kind.matches(&thirty, "abc", Op::Lt));
    }

    #[test]
    fn test_boolean_predicate_normalizes_both_sides() {
        let kind = FieldKind::Boolean;
        assert!(kind.matches(&FieldValue::Bool(true), "YES", Op::Eq));
        assert!(kind.matches(&FieldValue::Str("true".into()), "1", Op::Eq));
        assert!(kind.matches(&FieldValue::Bool(false), "no", Op::Eq));
        assert!(!kind.matches(&FieldValue::Bool(true), "no", Op::Eq));
    }

    #[test]
    fn test_date_predicate_falls_back_to_base_equality() {
        let kind = FieldKind::Date {
            format: DateFormat::MonthDayYear,
        };
        let query = FieldValue::Str("03/15/2024".into());
        assert!(kind.matches(&query, "03/15/2024", Op::Eq));
        assert!(!kind.matches(&query, "03/15/2024", Op::Lt));
    }

    #[test]
    fn test_op_from_suffix() {
        assert_eq!(Op::from_suffix("lt"), Some(Op::Lt));
        assert_eq!(Op::from_suffix("ct"), Some(Op::Ct));
        assert_eq!(Op::from_suffix("between"), None);
    }
}
