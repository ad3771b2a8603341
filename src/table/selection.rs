//! Cell selection tracking
//!
//! Turns pointer-down / move / up over table cells into a rectangular
//! selection. Everything here works on explicit table structures handed in
//! by the caller; nothing reads a live tree behind its back.

use serde::{Deserialize, Serialize};

use crate::models::{BlockId, Document, GridPos, LogicalGrid, SelectionBounds, Table};

/// A concrete cell element: its row and its position among that row's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub index: usize,
}

impl CellRef {
    pub fn new(row: usize, index: usize) -> Self {
        Self { row, index }
    }
}

/// Logical position of a cell in its table (span-aware column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellCoord {
    pub row_index: usize,
    pub col_index: usize,
}

impl CellCoord {
    pub fn new(row_index: usize, col_index: usize) -> Self {
        Self {
            row_index,
            col_index,
        }
    }
}

impl From<CellCoord> for GridPos {
    fn from(c: CellCoord) -> Self {
        GridPos::new(c.row_index, c.col_index)
    }
}

impl From<GridPos> for CellCoord {
    fn from(p: GridPos) -> Self {
        CellCoord::new(p.row, p.col)
    }
}

/// Resolve a cell element to its logical coordinate
///
/// The row index is the cell's row; the column is the grid column its origin
/// occupies once earlier row spans are accounted for.
pub fn locate_cell(table: &Table, cell: CellRef) -> Option<CellCoord> {
    let grid = LogicalGrid::from_table(table);
    locate_in_grid(&grid, cell)
}

fn locate_in_grid(grid: &LogicalGrid, cell: CellRef) -> Option<CellCoord> {
    grid.row(cell.row)?
        .iter()
        .filter(|slot| slot.is_origin && slot.origin.row == cell.row)
        .nth(cell.index)
        .map(|slot| slot.origin.into())
}

/// Inverse of [`locate_cell`]: the concrete cell whose origin sits at `coord`
pub fn cell_at(table: &Table, coord: CellCoord) -> Option<CellRef> {
    cell_at_in_grid(&LogicalGrid::from_table(table), coord)
}

fn cell_at_in_grid(grid: &LogicalGrid, coord: CellCoord) -> Option<CellRef> {
    let row = grid.row(coord.row_index)?;
    let slot = row.get(coord.col_index)?;
    if !slot.is_origin {
        return None;
    }
    let index = row[..coord.col_index].iter().filter(|s| s.is_origin).count();
    Some(CellRef::new(coord.row_index, index))
}

/// Concrete cells whose origin lies inside `bounds`, row-major
///
/// Slots covered by a span (no element of their own) are skipped.
pub fn cells_in_bounds(table: &Table, bounds: SelectionBounds) -> Vec<CellRef> {
    let grid = LogicalGrid::from_table(table);
    bounds
        .positions()
        .filter_map(|p| cell_at_in_grid(&grid, p.into()))
        .collect()
}

/// Two endpoints in one table, in whatever order the user dragged them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: CellCoord,
    pub end: CellCoord,
    pub table: BlockId,
}

impl SelectionRange {
    pub fn collapsed(table: BlockId, at: CellCoord) -> Self {
        Self {
            start: at,
            end: at,
            table,
        }
    }

    /// Normalized `(min_row, max_row, min_col, max_col)`
    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds::from_corners(self.start.into(), self.end.into())
    }
}

/// Saved selection that can be re-applied later (e.g. after a dialog closes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionHandle {
    range: SelectionRange,
}

impl SelectionHandle {
    pub fn range(&self) -> SelectionRange {
        self.range
    }

    pub fn table(&self) -> BlockId {
        self.range.table
    }
}

/// Pointer-driven rectangular selection state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTracker {
    range: Option<SelectionRange>,
    is_selecting: bool,
    selected: Vec<CellRef>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a selection at the cell under the pointer
    ///
    /// Returns `false` (and clears any selection) if the cell cannot be
    /// resolved in the table.
    pub fn on_pointer_down(&mut self, table_id: BlockId, table: &Table, cell: CellRef) -> bool {
        let grid = LogicalGrid::from_table(table);
        let Some(coord) = locate_in_grid(&grid, cell) else {
            self.clear();
            return false;
        };
        self.range = Some(SelectionRange::collapsed(table_id, coord));
        self.is_selecting = true;
        self.selected = vec![cell];
        log::debug!("selection start {} ({}, {})", table_id, coord.row_index, coord.col_index);
        true
    }

    /// Extend the selection while the button is held
    ///
    /// Ignored when not selecting or when the hovered cell is in another
    /// table. Returns `true` when the covered cell set changed.
    pub fn on_pointer_move(&mut self, table_id: BlockId, table: &Table, cell: CellRef) -> bool {
        if !self.is_selecting {
            return false;
        }
        let Some(range) = self.range.as_mut() else {
            return false;
        };
        if range.table != table_id {
            return false;
        }
        let grid = LogicalGrid::from_table(table);
        let Some(coord) = locate_in_grid(&grid, cell) else {
            return false;
        };
        if range.end == coord {
            return false;
        }
        range.end = coord;
        let bounds = range.bounds();
        self.selected = bounds
            .positions()
            .filter_map(|p| cell_at_in_grid(&grid, p.into()))
            .collect();
        true
    }

    /// Freeze the selection; also wired to the global pointer-up listener
    pub fn on_pointer_up(&mut self) {
        self.is_selecting = false;
    }

    /// Drop the selection (click outside any table, table deleted)
    pub fn clear(&mut self) {
        self.range = None;
        self.is_selecting = false;
        self.selected.clear();
    }

    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    pub fn range(&self) -> Option<&SelectionRange> {
        self.range.as_ref()
    }

    pub fn table(&self) -> Option<BlockId> {
        self.range.map(|r| r.table)
    }

    pub fn bounds(&self) -> Option<SelectionBounds> {
        self.range.map(|r| r.bounds())
    }

    pub fn selected_cells(&self) -> &[CellRef] {
        &self.selected
    }

    /// Merging needs at least two cells
    pub fn can_merge(&self) -> bool {
        self.selected.len() >= 2
    }

    /// Splitting needs exactly one selected cell that spans
    pub fn can_split(&self, doc: &Document) -> bool {
        let (Some(table_id), [cell]) = (self.table(), self.selected.as_slice()) else {
            return false;
        };
        doc.table(table_id)
            .and_then(|t| t.cell(cell.row, cell.index))
            .map_or(false, |c| c.is_spanning())
    }

    /// Snapshot the current selection
    pub fn handle(&self) -> Option<SelectionHandle> {
        self.range.map(|range| SelectionHandle { range })
    }

    /// Re-apply a saved selection if its table still exists and the
    /// endpoints are still inside it
    pub fn restore(&mut self, handle: SelectionHandle, doc: &Document) -> bool {
        let Some(table) = doc.table(handle.table()) else {
            self.clear();
            return false;
        };
        let grid = LogicalGrid::from_table(table);
        let range = handle.range;
        let inside = |c: CellCoord| grid.get(c.into()).is_some();
        if !inside(range.start) || !inside(range.end) {
            self.clear();
            return false;
        }
        self.selected = range
            .bounds()
            .positions()
            .filter_map(|p| cell_at_in_grid(&grid, p.into()))
            .collect();
        self.range = Some(range);
        self.is_selecting = false;
        true
    }

    /// Drop the selection if its table disappeared or shrank under it
    pub fn revalidate(&mut self, doc: &Document) {
        if let Some(handle) = self.handle() {
            self.restore(handle, doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TableCell, TableRow};

    fn spanned() -> Table {
        // | A (colspan 2) | B |
        // | C | D | E |
        Table::new(vec![
            TableRow::new(vec![TableCell::new("A").with_span(1, 2), TableCell::new("B")]),
            TableRow::new(vec![TableCell::new("C"), TableCell::new("D"), TableCell::new("E")]),
        ])
    }

    #[test]
    fn test_locate_cell_is_span_aware() {
        let table = spanned();
        assert_eq!(locate_cell(&table, CellRef::new(0, 1)), Some(CellCoord::new(0, 2)));
        assert_eq!(locate_cell(&table, CellRef::new(1, 1)), Some(CellCoord::new(1, 1)));
        assert_eq!(locate_cell(&table, CellRef::new(0, 2)), None);
    }

    #[test]
    fn test_cell_at_inverse() {
        let table = spanned();
        assert_eq!(cell_at(&table, CellCoord::new(0, 2)), Some(CellRef::new(0, 1)));
        assert_eq!(cell_at(&table, CellCoord::new(0, 1)), None);
    }

    #[test]
    fn test_covered_slots_skipped() {
        let table = spanned();
        let bounds = SelectionBounds::from_corners(GridPos::new(0, 1), GridPos::new(1, 2));
        assert_eq!(
            cells_in_bounds(&table, bounds),
            vec![CellRef::new(0, 1), CellRef::new(1, 1), CellRef::new(1, 2)]
        );
    }

    #[test]
    fn test_move_in_other_table_ignored() {
        let table = Table::with_size(2, 2);
        let mut tracker = SelectionTracker::new();
        assert!(tracker.on_pointer_down(BlockId(1), &table, CellRef::new(0, 0)));
        assert!(!tracker.on_pointer_move(BlockId(2), &table, CellRef::new(1, 1)));
        assert_eq!(tracker.selected_cells().len(), 1);
    }

    #[test]
    fn test_move_after_pointer_up_ignored() {
        let table = Table::with_size(2, 2);
        let mut tracker = SelectionTracker::new();
        tracker.on_pointer_down(BlockId(1), &table, CellRef::new(0, 0));
        tracker.on_pointer_up();
        assert!(!tracker.on_pointer_move(BlockId(1), &table, CellRef::new(1, 1)));
        assert!(!tracker.is_selecting());
        assert!(tracker.range().is_some());
    }

    #[test]
    fn test_merge_split_gating() {
        let mut doc = Document::new();
        let id = doc.push_table(spanned());
        let table = doc.table(id).unwrap().clone();
        let mut tracker = SelectionTracker::new();

        tracker.on_pointer_down(id, &table, CellRef::new(0, 0));
        assert!(!tracker.can_merge());
        assert!(tracker.can_split(&doc));

        tracker.on_pointer_move(id, &table, CellRef::new(1, 0));
        assert!(tracker.can_merge());
        assert!(!tracker.can_split(&doc));
    }

    #[test]
    fn test_handle_restore_after_clear() {
        let mut doc = Document::new();
        let id = doc.push_table(Table::with_size(3, 3));
        let table = doc.table(id).unwrap().clone();
        let mut tracker = SelectionTracker::new();
        tracker.on_pointer_down(id, &table, CellRef::new(0, 0));
        tracker.on_pointer_move(id, &table, CellRef::new(1, 1));
        let handle = tracker.handle().unwrap();

        tracker.clear();
        assert!(tracker.restore(handle, &doc));
        assert_eq!(tracker.selected_cells().len(), 4);

        doc.remove(id);
        assert!(!tracker.restore(handle, &doc));
        assert!(tracker.range().is_none());
    }
}
