//! Cell-string transforms applied before and after type coercion.
//!
//! A transform is a total function from `string|absent` to `string|absent`.
//! Every field runs the standard pre-transforms (`#REF!` and `NA`
//! normalization) before its declared pre-transforms; list-kind fields
//! additionally extract bracketed tag lists. Post-transforms run over the
//! coerced value where it is still a string.

/// A single cell-string transform.
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// Normalize case-insensitive `#ref!` (and empty cells) to absent.
    InvalidRefToNone,

    /// Normalize case-insensitive `na` (and empty cells) to absent.
    NaToNone,

    /// Extract the comma-joined items between the first `[` and last `]`.
    ///
    /// Each item is stripped of surrounding whitespace and quotes; empty
    /// items are dropped. Without a bracket pair the value passes through
    /// unchanged.
    ExtractTagList,

    /// Lower-case the value.
    Lowercase,

    /// Strip surrounding whitespace.
    Trim,

    /// Caller-supplied transform.
    Custom(fn(Option<&str>) -> Option<String>),
}

/// Pre-transforms that run for every field, in order, before any declared
/// pre-transforms.
pub fn standard_pre_transforms() -> [Transform; 2] {
    [Transform::InvalidRefToNone, Transform::NaToNone]
}

impl Transform {
    /// Apply this transform to a possibly-absent cell value.
    pub fn apply(&self, value: Option<&str>) -> Option<String> {
        match self {
            Transform::InvalidRefToNone => normalize_token(value, "#ref!"),
            Transform::NaToNone => normalize_token(value, "na"),
            Transform::ExtractTagList => extract_tag_list(value),
            Transform::Lowercase => value.map(str::to_lowercase),
            Transform::Trim => value.map(|v| v.trim().to_string()),
            Transform::Custom(f) => f(value),
        }
    }

    /// Run an ordered pipeline over a value.
    pub fn apply_all(transforms: &[Transform], value: Option<&str>) -> Option<String> {
        let mut current = value.map(str::to_string);
        for transform in transforms {
            current = transform.apply(current.as_deref());
        }
        current
    }
}

/// Map empty cells and a case-insensitive marker token to absent.
fn normalize_token(value: Option<&str>, token: &str) -> Option<String> {
    let value = value?;
    if value.is_empty() || value.to_lowercase() == token {
        None
    } else {
        Some(value.to_string())
    }
}

/// Extract the bracketed tag list from a cell like `Family: ["A", "b" , ]`.
fn extract_tag_list(value: Option<&str>) -> Option<String> {
    let value = value?;

    let start = value.find('[');
    let end = value.rfind(']');
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) if s < e => (s, e),
        // No bracket pair: pass through unchanged.
        _ => return Some(value.to_string()),
    };

    let body = &value[start + 1..end];
    let items: Vec<&str> = body
        .split(',')
        .map(strip_item)
        .filter(|item| !item.is_empty())
        .collect();

    Some(items.join(","))
}

/// Strip surrounding whitespace and quote characters from a list item.
pub(crate) fn strip_item(item: &str) -> &str {
    item.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
}
