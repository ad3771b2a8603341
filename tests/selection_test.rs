// Pointer-driven cell selection

use lesson_editor_wasm::models::{BlockId, Document, Table, TableCell, TableRow};
use lesson_editor_wasm::table::{locate_cell, CellCoord, CellRef, SelectionTracker};

fn plain(rows: usize, cols: usize) -> (Document, BlockId) {
    let mut doc = Document::new();
    let id = doc.push_table(Table::with_size(rows, cols));
    (doc, id)
}

#[test]
fn test_rectangle_covers_twelve_cells_either_direction() {
    let (doc, id) = plain(4, 4);
    let table = doc.table(id).unwrap();

    let mut forward = SelectionTracker::new();
    forward.on_pointer_down(id, table, CellRef::new(0, 0));
    forward.on_pointer_move(id, table, CellRef::new(2, 3));
    forward.on_pointer_up();
    assert_eq!(forward.selected_cells().len(), 12);

    let mut backward = SelectionTracker::new();
    backward.on_pointer_down(id, table, CellRef::new(2, 3));
    backward.on_pointer_move(id, table, CellRef::new(0, 0));
    assert_eq!(backward.selected_cells().len(), 12);
    assert_eq!(forward.bounds(), backward.bounds());
}

#[test]
fn test_move_only_while_selecting() {
    let (doc, id) = plain(3, 3);
    let table = doc.table(id).unwrap();
    let mut tracker = SelectionTracker::new();

    assert!(!tracker.on_pointer_move(id, table, CellRef::new(1, 1)));
    tracker.on_pointer_down(id, table, CellRef::new(0, 0));
    tracker.on_pointer_up();
    assert!(!tracker.on_pointer_move(id, table, CellRef::new(2, 2)));
    assert_eq!(tracker.selected_cells().len(), 1);
}

#[test]
fn test_other_table_is_ignored() {
    let mut doc = Document::new();
    let a = doc.push_table(Table::with_size(2, 2));
    let b = doc.push_table(Table::with_size(2, 2));
    let mut tracker = SelectionTracker::new();

    tracker.on_pointer_down(a, doc.table(a).unwrap(), CellRef::new(0, 0));
    assert!(!tracker.on_pointer_move(b, doc.table(b).unwrap(), CellRef::new(1, 1)));
    assert_eq!(tracker.table(), Some(a));
    assert_eq!(tracker.selected_cells().len(), 1);
}

#[test]
fn test_merge_and_split_availability() {
    let mut doc = Document::new();
    let id = doc.push_table(Table::new(vec![
        TableRow::new(vec![TableCell::new("wide").with_span(1, 2), TableCell::new("x")]),
        TableRow::new(vec![TableCell::new("a"), TableCell::new("b"), TableCell::new("c")]),
    ]));
    let table = doc.table(id).unwrap();
    let mut tracker = SelectionTracker::new();

    tracker.on_pointer_down(id, table, CellRef::new(0, 0));
    assert!(!tracker.can_merge());
    assert!(tracker.can_split(&doc));

    // Dragging across the covered slot still counts concrete cells only
    tracker.on_pointer_move(id, table, CellRef::new(1, 1));
    assert_eq!(tracker.selected_cells().len(), 3);
    assert!(tracker.can_merge());
    assert!(!tracker.can_split(&doc));
}

#[test]
fn test_locate_cell_after_row_span() {
    let table = Table::new(vec![
        TableRow::new(vec![TableCell::new("tall").with_span(2, 1), TableCell::new("b")]),
        TableRow::new(vec![TableCell::new("c")]),
    ]);
    assert_eq!(locate_cell(&table, CellRef::new(1, 0)), Some(CellCoord::new(1, 1)));
}

#[test]
fn test_handle_survives_clear() {
    let (doc, id) = plain(3, 3);
    let table = doc.table(id).unwrap();
    let mut tracker = SelectionTracker::new();
    tracker.on_pointer_down(id, table, CellRef::new(1, 1));
    tracker.on_pointer_move(id, table, CellRef::new(2, 2));
    tracker.on_pointer_up();

    let handle = tracker.handle().unwrap();
    tracker.clear();
    assert!(tracker.selected_cells().is_empty());
    assert!(tracker.restore(handle, &doc));
    assert_eq!(tracker.selected_cells().len(), 4);
}
