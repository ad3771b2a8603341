//! Logical grid model
//!
//! Converts a span-annotated [`Table`] into a dense, rectangular grid where
//! every slot is filled, and back again. Structural operations (row/column
//! insertion and deletion, merge, split) are expressed on the grid because
//! coordinates there are unambiguous; the visual table is then rebuilt from
//! the origin slots.
//!
//! A grid is transient: it is built from the current table when an operation
//! runs and discarded once it has been materialized.

use serde::{Deserialize, Serialize};

use super::table::{Table, TableCell, TableRow};

/// A slot coordinate in the logical grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Normalized, inclusive rectangle of grid slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionBounds {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl SelectionBounds {
    /// Build from two corners given in any order
    pub fn from_corners(a: GridPos, b: GridPos) -> Self {
        Self {
            min_row: a.row.min(b.row),
            max_row: a.row.max(b.row),
            min_col: a.col.min(b.col),
            max_col: a.col.max(b.col),
        }
    }

    pub fn single(pos: GridPos) -> Self {
        Self::from_corners(pos, pos)
    }

    pub fn row_count(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        (self.min_row..=self.max_row).contains(&pos.row)
            && (self.min_col..=self.max_col).contains(&pos.col)
    }

    pub fn top_left(&self) -> GridPos {
        GridPos::new(self.min_row, self.min_col)
    }

    /// Iterate every slot row-major
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |r| (self.min_col..=self.max_col).map(move |c| GridPos::new(r, c)))
    }
}

/// One slot of the logical grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub content: String,
    pub is_header: bool,
    pub row_span: usize,
    pub col_span: usize,
    /// Top-left slot of its logical cell
    pub is_origin: bool,
    /// Position of the origin slot this slot belongs to
    pub origin: GridPos,
}

impl GridCell {
    fn empty_at(pos: GridPos) -> Self {
        Self {
            content: String::new(),
            is_header: false,
            row_span: 1,
            col_span: 1,
            is_origin: true,
            origin: pos,
        }
    }
}

/// A logical cell reduced to its origin and extent
///
/// This is the unit structural edits move around; the dense grid is
/// re-stamped from a list of these afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalCell {
    pub pos: GridPos,
    pub row_span: usize,
    pub col_span: usize,
    pub content: String,
    pub is_header: bool,
}

impl LogicalCell {
    fn last_row(&self) -> usize {
        self.pos.row + self.row_span - 1
    }

    fn last_col(&self) -> usize {
        self.pos.col + self.col_span - 1
    }

    fn intersects(&self, b: &SelectionBounds) -> bool {
        self.pos.row <= b.max_row
            && self.last_row() >= b.min_row
            && self.pos.col <= b.max_col
            && self.last_col() >= b.min_col
    }
}

/// Largest `colspan` honoured, as in browsers
pub const MAX_COL_SPAN: usize = 1000;

/// Largest `rowspan` honoured, as in browsers
pub const MAX_ROW_SPAN: usize = 65534;

/// Dense, rectangular, span-expanded table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalGrid {
    slots: Vec<Vec<GridCell>>,
}

impl LogicalGrid {
    /// Build the grid from a visual table
    ///
    /// Each cell lands on the first unoccupied column of its row (earlier
    /// row spans may have reserved some) and is stamped over its span
    /// rectangle. A row span reaching past the last row adds the rows it
    /// needs, filled with empty cells. Ragged rows are padded with empty
    /// cells. Spans are capped at the browser limits.
    pub fn from_table(table: &Table) -> Self {
        let mut slots: Vec<Vec<Option<GridCell>>> = vec![Vec::new(); table.rows.len()];

        for (r, row) in table.rows.iter().enumerate() {
            let mut col = 0;
            for cell in &row.cells {
                while matches!(slots[r].get(col), Some(Some(_))) {
                    col += 1;
                }
                let row_span = cell.row_span.clamp(1, MAX_ROW_SPAN);
                let col_span = cell.col_span.clamp(1, MAX_COL_SPAN);
                let origin = GridPos::new(r, col);
                stamp(
                    &mut slots,
                    origin,
                    row_span,
                    col_span,
                    &cell.content,
                    cell.header,
                );
                col += col_span;
            }
        }

        Self::normalize(slots)
    }

    /// Re-stamp a grid of `rows × cols` from logical cells; gaps become empty cells
    pub fn from_logical_cells(rows: usize, cols: usize, cells: &[LogicalCell]) -> Self {
        let mut slots: Vec<Vec<Option<GridCell>>> = vec![vec![None; cols]; rows];
        for cell in cells {
            if cell.pos.row >= rows || cell.pos.col >= cols {
                continue;
            }
            let row_span = cell.row_span.max(1).min(rows - cell.pos.row);
            let col_span = cell.col_span.max(1).min(cols - cell.pos.col);
            stamp(
                &mut slots,
                cell.pos,
                row_span,
                col_span,
                &cell.content,
                cell.is_header,
            );
        }
        Self::normalize(slots)
    }

    // Pad every row to the widest row and fill holes with empty origins
    fn normalize(slots: Vec<Vec<Option<GridCell>>>) -> Self {
        let max_cols = slots.iter().map(Vec::len).max().unwrap_or(0);
        let slots = slots
            .into_iter()
            .enumerate()
            .map(|(r, mut row)| {
                row.resize(max_cols, None);
                row.into_iter()
                    .enumerate()
                    .map(|(c, slot)| slot.unwrap_or_else(|| GridCell::empty_at(GridPos::new(r, c))))
                    .collect()
            })
            .collect();
        Self { slots }
    }

    /// Rebuild visual rows: one cell per origin slot, nothing for covered slots
    pub fn to_rows(&self) -> Vec<TableRow> {
        self.slots
            .iter()
            .map(|row| {
                TableRow::new(
                    row.iter()
                        .filter(|slot| slot.is_origin)
                        .map(|slot| TableCell {
                            content: slot.content.clone(),
                            header: slot.is_header,
                            ..TableCell::empty()
                        }
                        .with_span(slot.row_span, slot.col_span))
                        .collect(),
                )
            })
            .collect()
    }

    /// Replace the table's rows with this grid's materialization
    ///
    /// Callers must not materialize an empty grid; remove the table instead.
    pub fn materialize_into(&self, table: &mut Table) {
        debug_assert!(!self.is_empty(), "empty grid must remove the table instead");
        table.replace_rows(self.to_rows());
    }

    pub fn rows(&self) -> usize {
        self.slots.len()
    }

    pub fn cols(&self) -> usize {
        self.slots.first().map_or(0, Vec::len)
    }

    /// Zero rows or zero columns
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn is_rectangular(&self) -> bool {
        let cols = self.cols();
        self.slots.iter().all(|row| row.len() == cols)
    }

    pub fn get(&self, pos: GridPos) -> Option<&GridCell> {
        self.slots.get(pos.row)?.get(pos.col)
    }

    pub fn row(&self, r: usize) -> Option<&[GridCell]> {
        self.slots.get(r).map(Vec::as_slice)
    }

    /// Origin slot of the logical cell covering `pos`
    pub fn origin_of(&self, pos: GridPos) -> Option<&GridCell> {
        let slot = self.get(pos)?;
        self.get(slot.origin)
    }

    /// All logical cells in row-major order of their origins
    pub fn logical_cells(&self) -> Vec<LogicalCell> {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.is_origin)
            .map(|slot| LogicalCell {
                pos: slot.origin,
                row_span: slot.row_span,
                col_span: slot.col_span,
                content: slot.content.clone(),
                is_header: slot.is_header,
            })
            .collect()
    }

    /// Insert `count` empty rows before row `at` (`at == rows()` appends)
    ///
    /// Spans crossing the insertion boundary are extended.
    pub fn insert_rows(&mut self, at: usize, count: usize) {
        let at = at.min(self.rows());
        let cells: Vec<LogicalCell> = self
            .logical_cells()
            .into_iter()
            .map(|mut cell| {
                if cell.pos.row >= at {
                    cell.pos.row += count;
                } else if cell.last_row() >= at {
                    cell.row_span += count;
                }
                cell
            })
            .collect();
        *self = Self::from_logical_cells(self.rows() + count, self.cols(), &cells);
    }

    /// Remove rows `first..=last`, shrinking spans that cross the range
    pub fn delete_rows(&mut self, first: usize, last: usize) {
        if first >= self.rows() || first > last {
            return;
        }
        let last = last.min(self.rows() - 1);
        let removed = last - first + 1;
        let cells: Vec<LogicalCell> = self
            .logical_cells()
            .into_iter()
            .filter_map(|mut cell| {
                let overlap = overlap(cell.pos.row, cell.last_row(), first, last);
                cell.row_span -= overlap;
                if cell.row_span == 0 {
                    return None;
                }
                if cell.pos.row > last {
                    cell.pos.row -= removed;
                } else if cell.pos.row >= first {
                    cell.pos.row = first;
                }
                Some(cell)
            })
            .collect();
        *self = Self::from_logical_cells(self.rows() - removed, self.cols(), &cells);
    }

    /// Insert `count` empty columns before column `at` (`at == cols()` appends)
    ///
    /// New slots in a row inherit the header flag of their left (or right)
    /// neighbour so a header row stays a header row.
    pub fn insert_cols(&mut self, at: usize, count: usize) {
        let at = at.min(self.cols());
        let cells: Vec<LogicalCell> = self
            .logical_cells()
            .into_iter()
            .map(|mut cell| {
                if cell.pos.col >= at {
                    cell.pos.col += count;
                } else if cell.last_col() >= at {
                    cell.col_span += count;
                }
                cell
            })
            .collect();
        let old = std::mem::take(self);
        *self = Self::from_logical_cells(old.rows(), old.cols() + count, &cells);

        for r in 0..self.rows() {
            let neighbour = if at > 0 {
                old.get(GridPos::new(r, at - 1))
            } else {
                old.get(GridPos::new(r, 0))
            };
            let header = neighbour.map_or(false, |n| n.is_header);
            for c in at..at + count {
                let slot = &mut self.slots[r][c];
                if slot.is_origin && slot.origin == GridPos::new(r, c) {
                    slot.is_header = header;
                }
            }
        }
    }

    /// Remove columns `first..=last`, shrinking spans that cross the range
    pub fn delete_cols(&mut self, first: usize, last: usize) {
        if first >= self.cols() || first > last {
            return;
        }
        let last = last.min(self.cols() - 1);
        let removed = last - first + 1;
        let cells: Vec<LogicalCell> = self
            .logical_cells()
            .into_iter()
            .filter_map(|mut cell| {
                let overlap = overlap(cell.pos.col, cell.last_col(), first, last);
                cell.col_span -= overlap;
                if cell.col_span == 0 {
                    return None;
                }
                if cell.pos.col > last {
                    cell.pos.col -= removed;
                } else if cell.pos.col >= first {
                    cell.pos.col = first;
                }
                Some(cell)
            })
            .collect();
        *self = Self::from_logical_cells(self.rows(), self.cols() - removed, &cells);
    }

    /// Grow `bounds` until no logical cell straddles its edge
    pub fn expand_to_spans(&self, bounds: SelectionBounds) -> SelectionBounds {
        let cells = self.logical_cells();
        let mut b = bounds;
        loop {
            let mut grown = b;
            for cell in cells.iter().filter(|c| c.intersects(&b)) {
                grown.min_row = grown.min_row.min(cell.pos.row);
                grown.min_col = grown.min_col.min(cell.pos.col);
                grown.max_row = grown.max_row.max(cell.last_row());
                grown.max_col = grown.max_col.max(cell.last_col());
            }
            if grown == b {
                return b;
            }
            b = grown;
        }
    }

    /// Merge every logical cell inside `bounds` into its top-left cell
    ///
    /// The rectangle is first grown to enclose any partially selected span.
    /// Non-empty contents of the merged cells are space-joined in row-major
    /// order. Returns `false` when the region is already a single cell.
    pub fn merge(&mut self, bounds: SelectionBounds) -> bool {
        if bounds.max_row >= self.rows() || bounds.max_col >= self.cols() {
            return false;
        }
        let b = self.expand_to_spans(bounds);
        let (inside, mut rest): (Vec<LogicalCell>, Vec<LogicalCell>) = self
            .logical_cells()
            .into_iter()
            .partition(|c| b.contains(c.pos));
        if inside.len() < 2 {
            return false;
        }

        let is_header = inside
            .iter()
            .find(|c| c.pos == b.top_left())
            .map_or(false, |c| c.is_header);
        let content = inside
            .iter()
            .map(|c| c.content.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        rest.push(LogicalCell {
            pos: b.top_left(),
            row_span: b.row_count(),
            col_span: b.col_count(),
            content,
            is_header,
        });
        *self = Self::from_logical_cells(self.rows(), self.cols(), &rest);
        true
    }

    /// Reset the spanning cell covering `pos` to 1×1
    ///
    /// Previously covered slots become independent empty cells (content is
    /// not redistributed). Returns `false` when the cell does not span.
    pub fn split(&mut self, pos: GridPos) -> bool {
        let Some(origin) = self.origin_of(pos) else {
            return false;
        };
        if origin.row_span == 1 && origin.col_span == 1 {
            return false;
        }
        let target = origin.origin;
        let extent = SelectionBounds {
            min_row: target.row,
            max_row: target.row + origin.row_span - 1,
            min_col: target.col,
            max_col: target.col + origin.col_span - 1,
        };
        let header = origin.is_header;

        let cells: Vec<LogicalCell> = self
            .logical_cells()
            .into_iter()
            .map(|mut cell| {
                if cell.pos == target {
                    cell.row_span = 1;
                    cell.col_span = 1;
                }
                cell
            })
            .collect();
        *self = Self::from_logical_cells(self.rows(), self.cols(), &cells);

        for p in extent.positions() {
            self.slots[p.row][p.col].is_header = header;
        }
        true
    }
}

/// Convert a visual table into its logical grid
pub fn to_grid(table: &Table) -> LogicalGrid {
    LogicalGrid::from_table(table)
}

/// Convert a logical grid back into visual rows
pub fn from_grid(grid: &LogicalGrid) -> Vec<TableRow> {
    grid.to_rows()
}

// Write one logical cell over its span rectangle; slots already taken by an
// earlier (overlapping) cell keep their owner.
fn stamp(
    slots: &mut Vec<Vec<Option<GridCell>>>,
    origin: GridPos,
    row_span: usize,
    col_span: usize,
    content: &str,
    is_header: bool,
) {
    for r in origin.row..origin.row + row_span {
        if slots.len() <= r {
            slots.resize(r + 1, Vec::new());
        }
        let row = &mut slots[r];
        if row.len() < origin.col + col_span {
            row.resize(origin.col + col_span, None);
        }
        for c in origin.col..origin.col + col_span {
            if row[c].is_some() {
                continue;
            }
            row[c] = Some(GridCell {
                content: content.to_string(),
                is_header,
                row_span,
                col_span,
                is_origin: r == origin.row && c == origin.col,
                origin,
            });
        }
    }
}

// Number of indices shared by the inclusive ranges a..=b and x..=y
fn overlap(a: usize, b: usize, x: usize, y: usize) -> usize {
    let lo = a.max(x);
    let hi = b.min(y);
    if hi >= lo {
        hi - lo + 1
    } else {
        0
    }
}
