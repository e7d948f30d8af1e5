//! A1-style cell references.

use once_cell::sync::Lazy;
use regex::Regex;

static A1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?([A-Za-z]{1,4})\$?([0-9]{1,7})$").expect("valid regex"));

/// Column letters for a 1-based column index (`1 -> "A"`, `27 -> "AA"`).
pub fn column_letters(col: u32) -> Option<String> {
    if col == 0 {
        return None;
    }
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).ok()
}

/// 1-based column index for column letters (case-insensitive).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, c| {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(c as u32 - 'A' as u32 + 1)
    })
}

/// A1 reference for a 1-based row/column pair.
pub fn to_a1(row: u32, col: u32) -> Option<String> {
    if row == 0 {
        return None;
    }
    Some(format!("{}{}", column_letters(col)?, row))
}

/// Parse `B12` or `$B$12` into a 1-based `(row, col)` pair.
pub fn parse_a1(reference: &str) -> Option<(u32, u32)> {
    let caps = A1_RE.captures(reference.trim())?;
    let col = column_index(&caps[1])?;
    let row: u32 = caps[2].parse().ok()?;
    (row > 0).then_some((row, col))
}
