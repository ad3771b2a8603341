// Visual table <-> logical grid conversion

use lesson_editor_wasm::models::{from_grid, to_grid, GridPos, Table, TableCell, TableRow};

fn spanned_table() -> Table {
    // | A (rowspan 2) | B (colspan 2)  |
    // |               | C     | D      |  <- C, D start after A's reserved slot
    // | E             | F     | G      |
    Table::new(vec![
        TableRow::new(vec![
            TableCell::new("A").with_span(2, 1),
            TableCell::new("B").with_span(1, 2),
        ]),
        TableRow::new(vec![TableCell::new("C"), TableCell::new("D")]),
        TableRow::new(vec![TableCell::new("E"), TableCell::new("F"), TableCell::new("G")]),
    ])
}

fn span_layouts() -> Vec<Table> {
    vec![
        spanned_table(),
        Table::from_text([["a", "b", "c"], ["d", "e", "f"]]),
        // Colspan on top, rowspan at the bottom
        Table::new(vec![
            TableRow::new(vec![TableCell::new("A").with_span(1, 2), TableCell::new("B")]),
            TableRow::new(vec![TableCell::new("C"), TableCell::new("D"), TableCell::new("E")]),
            TableRow::new(vec![
                TableCell::new("F").with_span(2, 1),
                TableCell::new("G"),
                TableCell::new("H"),
            ]),
            TableRow::new(vec![TableCell::new("I"), TableCell::new("J")]),
        ]),
        // One block spanning both axes in the middle
        Table::new(vec![
            TableRow::new(vec![TableCell::new("1"), TableCell::new("2"), TableCell::new("3")]),
            TableRow::new(vec![TableCell::new("4"), TableCell::new("big").with_span(2, 2)]),
            TableRow::new(vec![TableCell::new("5")]),
        ]),
        // Header row over a full-height first column
        Table::new(vec![
            TableRow::new(vec![TableCell::header("h1"), TableCell::header("h2")]),
            TableRow::new(vec![TableCell::new("side").with_span(3, 1), TableCell::new("x")]),
            TableRow::new(vec![TableCell::new("y")]),
            TableRow::new(vec![TableCell::new("z")]),
        ]),
    ]
}

#[test]
fn test_round_trip_preserves_structure() {
    for table in span_layouts() {
        let rows = from_grid(&to_grid(&table));

        assert_eq!(rows.len(), table.rows.len());
        for (original, rebuilt) in table.rows.iter().zip(&rows) {
            assert_eq!(original.cells.len(), rebuilt.cells.len(), "origin count per row");
            for (a, b) in original.cells.iter().zip(&rebuilt.cells) {
                assert_eq!(a.content, b.content);
                assert_eq!(a.header, b.header);
                assert_eq!((a.row_span, a.col_span), (b.row_span, b.col_span));
            }
        }
    }
}

#[test]
fn test_row_span_past_last_row_is_padded() {
    let table = Table::new(vec![TableRow::new(vec![
        TableCell::new("A").with_span(3, 1),
        TableCell::new("B"),
    ])]);
    let grid = to_grid(&table);
    assert_eq!(grid.rows(), 3);
    assert!(grid.is_rectangular());
    assert_eq!(grid.get(GridPos::new(0, 0)).unwrap().row_span, 3);

    let filler = grid.get(GridPos::new(2, 1)).unwrap();
    assert!(filler.is_origin);
    assert_eq!(filler.content, "");
}

#[test]
fn test_row_span_reserves_slots_in_later_rows() {
    let grid = to_grid(&spanned_table());
    assert_eq!((grid.rows(), grid.cols()), (3, 3));

    let covered = grid.get(GridPos::new(1, 0)).unwrap();
    assert!(!covered.is_origin);
    assert_eq!(covered.origin, GridPos::new(0, 0));
    assert_eq!(covered.content, "A");

    let c = grid.get(GridPos::new(1, 1)).unwrap();
    assert!(c.is_origin);
    assert_eq!(c.content, "C");
}

#[test]
fn test_ragged_tables_become_rectangular() {
    let tables = vec![
        Table::new(vec![
            TableRow::new(vec![TableCell::new("a"), TableCell::new("b"), TableCell::new("c")]),
            TableRow::new(vec![TableCell::new("d")]),
            TableRow::new(vec![]),
        ]),
        Table::new(vec![
            TableRow::new(vec![TableCell::new("tall").with_span(5, 1)]),
            TableRow::new(vec![TableCell::new("x"), TableCell::new("y").with_span(1, 3)]),
        ]),
        Table::new(vec![TableRow::new(vec![TableCell::new("wide").with_span(1, 4)])]),
    ];

    for table in &tables {
        let grid = to_grid(table);
        assert!(grid.is_rectangular());
        for r in 0..grid.rows() {
            assert_eq!(grid.row(r).unwrap().len(), grid.cols());
        }
    }
}

#[test]
fn test_gaps_are_filled_with_empty_origins() {
    let table = Table::new(vec![
        TableRow::new(vec![TableCell::new("a"), TableCell::new("b")]),
        TableRow::new(vec![TableCell::new("c")]),
    ]);
    let grid = to_grid(&table);
    let filler = grid.get(GridPos::new(1, 1)).unwrap();
    assert!(filler.is_origin);
    assert_eq!(filler.content, "");

    let rows = from_grid(&grid);
    assert_eq!(rows[1].cells.len(), 2);
}
