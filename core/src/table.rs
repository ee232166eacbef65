//! Bordered plain-text tables.

use std::fmt;

/// A table with one header row and any number of body rows, rendered with a
/// border around every cell and a separator line after every row.
///
/// ```text
/// +----------+--------------+---------------------+
/// |          | LINEAR RETRY |                     |
/// +----------+--------------+---------------------+
/// | Attempts | Duration     | Cumulative Duration |
/// +----------+--------------+---------------------+
/// | 0        | 1h0m0s       | 1h0m0s              |
/// +----------+--------------+---------------------+
/// ```
///
/// Header cells are upper-cased and centred; body cells are left-aligned.
/// Rows shorter than the header are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of columns, the widest of the header and every row.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = vec![0; self.column_count()];
        for row in std::iter::once(&self.header).chain(&self.rows) {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

fn write_separator(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    f.write_str("+")?;
    for width in widths {
        write!(f, "{}+", "-".repeat(width + 2))?;
    }
    f.write_str("\n")
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    widths: &[usize],
    row: &[String],
    header: bool,
) -> fmt::Result {
    f.write_str("|")?;
    for (index, width) in widths.iter().enumerate() {
        let cell = row.get(index).map(String::as_str).unwrap_or_default();
        if header {
            write!(f, " {:^width$} |", cell.to_uppercase())?;
        } else {
            write!(f, " {cell:<width$} |")?;
        }
    }
    f.write_str("\n")
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        if widths.is_empty() {
            return Ok(());
        }

        write_separator(f, &widths)?;
        write_row(f, &widths, &self.header, true)?;
        write_separator(f, &widths)?;
        for row in &self.rows {
            write_row(f, &widths, row, false)?;
            write_separator(f, &widths)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_render_bordered_table() {
        let mut table = Table::new(row(&["", "Linear Retry", ""]));
        table.push_row(row(&["Attempts", "Duration", "Cumulative Duration"]));
        table.push_row(row(&["0", "1h0m0s", "1h0m0s"]));

        let expected = "\
+----------+--------------+---------------------+
|          | LINEAR RETRY |                     |
+----------+--------------+---------------------+
| Attempts | Duration     | Cumulative Duration |
+----------+--------------+---------------------+
| 0        | 1h0m0s       | 1h0m0s              |
+----------+--------------+---------------------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(row(&["a", "b"]));
        table.push_row(row(&["1"]));

        assert_eq!(table.column_count(), 2);
        assert_eq!(
            table.to_string().lines().nth(3),
            Some("| 1 |   |")
        );
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(Table::default().to_string(), "");
    }
}
