//! Cell value decoding.
//!
//! The application stores a cell's value under field `"3"` of its payload
//! object, in one of several shapes depending on whether the cell holds a
//! literal or formatted text:
//!
//! | Shape                       | Meaning                         |
//! |-----------------------------|---------------------------------|
//! | `"text"` / `42`             | scalar literal                  |
//! | `[2, "text"]`               | pre-decoded string              |
//! | `[{"3": "a"}, "b", ...]`    | rich-text runs, concatenated    |
//! | `{"3": ...}`                | wrapper around another value    |
//!
//! Decoding is total: unknown shapes become the empty string.

use serde_json::Value;

/// Field index holding a cell's raw value.
pub const VALUE_FIELD: &str = "3";

/// Leading tag of a pre-decoded `[2, "text"]` value.
const PRE_DECODED_TAG: u64 = 2;

/// Runs and wrappers nest; anything deeper than this is treated as empty.
const MAX_NESTING: usize = 32;

/// Classified raw cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Empty,
    /// A string or number literal.
    Scalar(&'a Value),
    /// `[2, "text"]`.
    PreDecoded(&'a str),
    /// Ordered rich-text runs.
    Runs(&'a [Value]),
    /// The value found under a nested object's own `"3"` field.
    Wrapper(&'a Value),
}

impl<'a> CellValue<'a> {
    /// Classify the value stored under a payload's `"3"` field.
    pub fn classify(raw: &'a Value) -> Self {
        match raw {
            Value::String(_) | Value::Number(_) => Self::Scalar(raw),
            Value::Array(items) if items.is_empty() => Self::Empty,
            Value::Array(items) => match (items.first(), items.get(1)) {
                (Some(tag), Some(Value::String(text))) if tag.as_u64() == Some(PRE_DECODED_TAG) => {
                    Self::PreDecoded(text)
                }
                _ => Self::Runs(items),
            },
            Value::Object(map) => map.get(VALUE_FIELD).map_or(Self::Empty, Self::Wrapper),
            _ => Self::Empty,
        }
    }

    /// Classify a whole cell payload object.
    pub fn of_payload(payload: Option<&'a Value>) -> Self {
        payload
            .and_then(Value::as_object)
            .and_then(|fields| fields.get(VALUE_FIELD))
            .map_or(Self::Empty, Self::classify)
    }

    pub fn to_text(&self) -> String {
        self.text_at(0)
    }

    fn text_at(&self, depth: usize) -> String {
        if depth > MAX_NESTING {
            return String::new();
        }
        match *self {
            Self::Empty => String::new(),
            Self::Scalar(value) => scalar_text(value).unwrap_or_default(),
            Self::PreDecoded(text) => text.to_string(),
            Self::Runs(runs) => runs.iter().map(|run| run_text(run, depth + 1)).collect(),
            Self::Wrapper(inner) => Self::classify(inner).text_at(depth + 1),
        }
    }
}

fn run_text(run: &Value, depth: usize) -> String {
    match run {
        Value::Object(fields) => fields
            .get(VALUE_FIELD)
            .map(|inner| CellValue::classify(inner).text_at(depth))
            .unwrap_or_default(),
        other => scalar_text(other).unwrap_or_default(),
    }
}

/// String or number rendered as text; `None` for any other value.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(if let Some(i) = n.as_i64() {
            i.to_string()
        } else if let Some(u) = n.as_u64() {
            u.to_string()
        } else {
            n.as_f64().map(js_number).unwrap_or_default()
        }),
        _ => None,
    }
}

/// Format a float the way the page's `Number#toString` does: positional
/// from `1e-6` up to `1e21`, exponent notation (`1.5e+21`, `1e-7`) outside.
fn js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Decode one cell payload to text.
pub fn decode_cell(payload: Option<&Value>) -> String {
    CellValue::of_payload(payload).to_text()
}

/// Decode a column block: a payload object, or a list of candidates whose
/// first non-empty object is authoritative.
pub fn decode_block(block: &Value) -> String {
    match block {
        Value::Object(_) => decode_cell(Some(block)),
        Value::Array(candidates) => candidates
            .iter()
            .find(|c| c.as_object().is_some_and(|fields| !fields.is_empty()))
            .map(|payload| decode_cell(Some(payload)))
            .unwrap_or_default(),
        _ => String::new(),
    }
}
