//! Markdown table rendering.

/// Shown in place of an empty header cell so column boundaries stay visible.
pub const EMPTY_HEADER: &str = "(empty)";

/// Render rows as a pipe table; the first row is the header.
///
/// Rows are padded to the widest row. Returns `""` for no rows.
pub fn render_markdown(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(table_line(header, width, EMPTY_HEADER));
    lines.push(format!("|{}", "---|".repeat(width)));
    for row in body {
        lines.push(table_line(row, width, ""));
    }
    lines.join("\n")
}

fn table_line(row: &[String], width: usize, empty: &str) -> String {
    let mut line = String::from("|");
    for i in 0..width {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        line.push(' ');
        if cell.is_empty() {
            line.push_str(empty);
        } else {
            line.push_str(&escape_cell(cell));
        }
        line.push_str(" |");
    }
    line
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(&[]), "");
    }

    #[test]
    fn test_header_and_body() {
        let out = render_markdown(&rows(&[&["A", "B"], &["", "2"]]));
        assert_eq!(out, "| A | B |\n|---|---|\n|  | 2 |");
        assert!(out.contains("---|---"));
    }

    #[test]
    fn test_pads_to_widest_row() {
        let out = render_markdown(&rows(&[&["H"], &["1", "2", "3"]]));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "| H | (empty) | (empty) |");
        assert_eq!(lines[1], "|---|---|---|");
        assert_eq!(lines[2], "| 1 | 2 | 3 |");
    }

    #[test]
    fn test_escapes_pipes_and_newlines() {
        let out = render_markdown(&rows(&[&["a|b"], &["line1\nline2"]]));
        assert!(out.contains("a\\|b"));
        assert!(out.contains("line1 line2"));
    }
}
