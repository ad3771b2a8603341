//! Visual table structure
//!
//! This is the span-annotated, flattened form of a table as the host renders
//! it: rows of concrete cells, each carrying optional row/column spans. Slots
//! covered by a span have no cell of their own. The dense logical form lives
//! in [`crate::models::grid`].

use serde::{Deserialize, Serialize};

use super::style::InlineStyle;

/// A single `<td>`/`<th>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Formatted content blob (inner HTML)
    pub content: String,

    /// `<th>` rather than `<td>`
    #[serde(default)]
    pub header: bool,

    #[serde(default = "one")]
    pub row_span: usize,

    #[serde(default = "one")]
    pub col_span: usize,

    #[serde(default)]
    pub style: InlineStyle,
}

fn one() -> usize {
    1
}

impl TableCell {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            header: false,
            row_span: 1,
            col_span: 1,
            style: InlineStyle::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn header(content: impl Into<String>) -> Self {
        Self {
            header: true,
            ..Self::new(content)
        }
    }

    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span.max(1);
        self.col_span = col_span.max(1);
        self
    }

    /// Covers more than one grid slot
    pub fn is_spanning(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

/// A single `<tr>` element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,

    #[serde(default)]
    pub style: InlineStyle,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            style: InlineStyle::new(),
        }
    }
}

/// Vertical alignment of cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl VAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Some(VAlign::Top),
            "middle" | "center" => Some(VAlign::Middle),
            "bottom" => Some(VAlign::Bottom),
            _ => None,
        }
    }
}

/// Border preset applied to a whole table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBorders {
    pub width_px: f64,
    /// CSS line style (`solid`, `dashed`, `dotted`, `none`)
    pub line: String,
    pub color: String,
}

impl TableBorders {
    pub fn none() -> Self {
        Self {
            width_px: 0.0,
            line: "none".to_string(),
            color: "transparent".to_string(),
        }
    }

    pub fn to_css(&self) -> String {
        if self.line == "none" || self.width_px <= 0.0 {
            return "none".to_string();
        }
        format!("{}px {} {}", self.width_px, self.line, self.color)
    }
}

impl Default for TableBorders {
    fn default() -> Self {
        Self {
            width_px: 1.0,
            line: "solid".to_string(),
            color: "#ccc".to_string(),
        }
    }
}

/// A `<table>` element: ordered rows plus table-level inline style
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,

    #[serde(default)]
    pub style: InlineStyle,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            style: InlineStyle::new(),
        }
    }

    /// Plain `rows × cols` table of empty cells
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self::new(
            (0..rows)
                .map(|_| TableRow::new((0..cols).map(|_| TableCell::empty()).collect()))
                .collect(),
        )
    }

    /// Build a span-free table from rows of text, handy for hosts and tests
    pub fn from_text<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| TableRow::new(row.into_iter().map(TableCell::new).collect()))
                .collect(),
        )
    }

    pub fn cell(&self, row: usize, index: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(index)
    }

    pub fn cell_mut(&mut self, row: usize, index: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(index)
    }

    /// Replace the whole row set in one step
    pub fn replace_rows(&mut self, rows: Vec<TableRow>) {
        self.rows = rows;
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text() {
        let table = Table::from_text([["a", "b"], ["c", "d"]]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(1, 0).map(|c| c.content.as_str()), Some("c"));
        assert_eq!(table.cell_count(), 4);
    }

    #[test]
    fn test_span_floor() {
        let cell = TableCell::new("x").with_span(0, 3);
        assert_eq!((cell.row_span, cell.col_span), (1, 3));
        assert!(cell.is_spanning());
    }

    #[test]
    fn test_cell_deserialize_defaults() {
        let cell: TableCell = serde_json::from_str(r#"{ "content": "hi" }"#).unwrap();
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.col_span, 1);
        assert!(!cell.header);
    }

    #[test]
    fn test_borders_css() {
        assert_eq!(TableBorders::default().to_css(), "1px solid #ccc");
        assert_eq!(TableBorders::none().to_css(), "none");
    }
}
