//! Row normalization for compact display.

/// Trim every cell, map missing cells to `""`, and drop trailing empties.
/// Interior gaps are kept so columns stay aligned.
pub fn normalize_row<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut row: Vec<String> = cells
        .into_iter()
        .map(|cell| cell.map(|c| c.as_ref().trim().to_string()).unwrap_or_default())
        .collect();

    while row.last().is_some_and(String::is_empty) {
        row.pop();
    }
    row
}
