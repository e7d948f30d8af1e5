//! Extraction of the snapshot object from the bootstrap script.
//!
//! Two serialization idioms are seen in the wild:
//!
//! ```text
//! bootstrapData = {"changes": {...}};            // object literal
//! bootstrapData = JSON.parse("{\"changes\":...}"); // string literal
//! ```
//!
//! Each idiom is an [`ExtractStrategy`]. The parser tries them in order and
//! takes the first object that parses.

use std::borrow::Cow;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::SnapshotError;

/// Outcome of one strategy: `None` when its idiom is absent from the script.
pub type Extracted = Option<Result<Value, serde_json::Error>>;

/// One way of pulling the snapshot JSON out of script text.
pub trait ExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_extract(&self, source: &str, variable: &str) -> Extracted;
}

/// `name = { ... };`
pub struct ObjectLiteral;

/// `name = JSON.parse("...");`
pub struct JsonParseCall;

impl ExtractStrategy for ObjectLiteral {
    fn name(&self) -> &'static str {
        "object-literal"
    }

    fn try_extract(&self, source: &str, variable: &str) -> Extracted {
        let re = assignment_regex(variable, r"\{")?;
        let mut last_err = None;

        for m in re.find_iter(source) {
            // The match ends just past the opening brace.
            let open = m.end() - 1;
            let Some(close) = matching_brace(source, open) else {
                continue;
            };
            match serde_json::from_str(&source[open..=close]) {
                Ok(value) => return Some(Ok(value)),
                Err(e) => last_err = Some(e),
            }
        }

        last_err.map(Err)
    }
}

impl ExtractStrategy for JsonParseCall {
    fn name(&self) -> &'static str {
        "json-parse-call"
    }

    fn try_extract(&self, source: &str, variable: &str) -> Extracted {
        let re = assignment_regex(variable, r#"JSON\.parse\(\s*['"]"#)?;
        let mut last_err = None;

        for m in re.find_iter(source) {
            let quote_at = m.end() - 1;
            let quote = source[quote_at..].chars().next()?;
            let Some(literal) = unescape_js_string(&source[quote_at + 1..], quote) else {
                continue;
            };
            match serde_json::from_str(&literal) {
                Ok(value) => return Some(Ok(value)),
                Err(e) => last_err = Some(e),
            }
        }

        last_err.map(Err)
    }
}

fn assignment_regex(variable: &str, rhs: &str) -> Option<Regex> {
    let pattern = format!(r"(?:^|[^\w$]){}\s*=\s*{}", regex::escape(variable), rhs);
    Regex::new(&pattern).ok()
}

/// Index of the brace closing the one at `open`, skipping string contents.
fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == quote {
                in_string = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => in_string = Some(b),
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (b == b'}').then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode a JS string literal body up to its closing `quote`.
fn unescape_js_string(body: &str, quote: char) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c == quote {
            return Some(out);
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let code = take_hex(&mut chars, 2)?;
                out.push(char::from_u32(code)?);
            }
            'u' => {
                let high = take_hex(&mut chars, 4)?;
                if (0xD800..0xDC00).contains(&high) {
                    let rest = chars.as_str();
                    if rest.starts_with("\\u") {
                        let mut lookahead = rest[2..].chars();
                        let low = take_hex(&mut lookahead, 4)?;
                        if (0xDC00..0xE000).contains(&low) {
                            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                            out.push(char::from_u32(code)?);
                            chars = lookahead;
                            continue;
                        }
                    }
                    out.push(char::REPLACEMENT_CHARACTER);
                } else {
                    out.push(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            // Line continuation.
            '\n' => {}
            other => out.push(other),
        }
    }
    None
}

fn take_hex(chars: &mut std::str::Chars<'_>, len: usize) -> Option<u32> {
    let mut code = 0u32;
    for _ in 0..len {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}

/// Produces the raw snapshot object from the page.
pub struct BootstrapParser {
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl Default for BootstrapParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapParser {
    /// Parser with the built-in strategies, object literal first.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(ObjectLiteral), Box::new(JsonParseCall)],
        }
    }

    /// Append another extraction strategy, tried after the existing ones.
    pub fn with_strategy(mut self, strategy: Box<dyn ExtractStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Resolve the snapshot.
    ///
    /// A live snapshot object wins over re-parsing the script.
    pub fn parse<'a>(
        &self,
        script: Option<&str>,
        live: Option<&'a Value>,
        variable: &str,
    ) -> Result<Cow<'a, Value>, SnapshotError> {
        if let Some(value) = live.filter(|v| v.is_object()) {
            debug!("using live snapshot object");
            return Ok(Cow::Borrowed(value));
        }

        let script = script.ok_or(SnapshotError::ScriptNotFound)?;
        let mut json_error = None;

        for strategy in &self.strategies {
            match strategy.try_extract(script, variable) {
                Some(Ok(value)) if value.is_object() => {
                    debug!(strategy = strategy.name(), "snapshot extracted");
                    return Ok(Cow::Owned(value));
                }
                Some(Ok(_)) => {
                    debug!(strategy = strategy.name(), "extracted value is not an object");
                }
                Some(Err(e)) => {
                    debug!(strategy = strategy.name(), error = %e, "snapshot JSON rejected");
                    json_error = Some(e);
                }
                None => {}
            }
        }

        Err(json_error.map_or(SnapshotError::AssignmentNotFound, SnapshotError::InvalidJson))
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
