//! Table operations
//!
//! Applies a named operation to one table given the current selection
//! rectangle. Structural operations (rows, columns, merge, split) run
//! through the logical grid and re-materialize the table; presentation
//! operations (background, alignment, borders, header row) touch cells and
//! the table directly.
//!
//! Missing targets are not errors: an operation with no table, or one that
//! needs a selection when there is none, reports [`OperationOutcome::NoOp`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::selection::cells_in_bounds;
use crate::error::EditorError;
use crate::models::{BlockId, Document, LogicalGrid, SelectionBounds, Table, TableBorders, VAlign};

/// Every operation the table toolbar can trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TableOperation {
    InsertRowAbove,
    InsertRowBelow,
    DeleteRows,
    InsertColLeft,
    InsertColRight,
    DeleteCols,
    MergeCells,
    SplitCell,
    DeleteTable,
    /// `None` clears the background
    SetCellBackground { color: Option<String> },
    SetCellVAlign { align: VAlign },
    SetTableBorders { borders: TableBorders },
    ToggleHeaderRow,
}

impl TableOperation {
    /// Parse an operation from its toolbar name and JSON arguments
    ///
    /// Singular and plural spellings of the delete operations are accepted.
    pub fn parse(name: &str, args: &Value) -> Result<Self, EditorError> {
        let op = match name {
            "insertRowAbove" => TableOperation::InsertRowAbove,
            "insertRowBelow" => TableOperation::InsertRowBelow,
            "deleteRow" | "deleteRows" => TableOperation::DeleteRows,
            "insertColLeft" | "insertColumnLeft" => TableOperation::InsertColLeft,
            "insertColRight" | "insertColumnRight" => TableOperation::InsertColRight,
            "deleteCol" | "deleteCols" | "deleteColumn" => TableOperation::DeleteCols,
            "mergeCells" => TableOperation::MergeCells,
            "splitCell" => TableOperation::SplitCell,
            "deleteTable" => TableOperation::DeleteTable,
            "setCellBackground" => TableOperation::SetCellBackground {
                color: args
                    .get("color")
                    .and_then(Value::as_str)
                    .filter(|c| !c.trim().is_empty())
                    .map(str::to_string),
            },
            "setCellVAlign" => {
                let raw = args
                    .get("align")
                    .and_then(Value::as_str)
                    .ok_or_else(|| EditorError::invalid_argument(name, "missing 'align'"))?;
                let align = VAlign::parse(raw).ok_or_else(|| {
                    EditorError::invalid_argument(name, format!("unknown alignment '{}'", raw))
                })?;
                TableOperation::SetCellVAlign { align }
            }
            "setTableBorders" => {
                let borders = match args.get("borders") {
                    Some(v) if !v.is_null() => serde_json::from_value(v.clone())
                        .map_err(|e| EditorError::invalid_argument(name, e.to_string()))?,
                    _ => TableBorders::default(),
                };
                TableOperation::SetTableBorders { borders }
            }
            "toggleHeaderRow" => TableOperation::ToggleHeaderRow,
            other => return Err(EditorError::UnknownOperation(other.to_string())),
        };
        Ok(op)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableOperation::InsertRowAbove => "insertRowAbove",
            TableOperation::InsertRowBelow => "insertRowBelow",
            TableOperation::DeleteRows => "deleteRows",
            TableOperation::InsertColLeft => "insertColLeft",
            TableOperation::InsertColRight => "insertColRight",
            TableOperation::DeleteCols => "deleteCols",
            TableOperation::MergeCells => "mergeCells",
            TableOperation::SplitCell => "splitCell",
            TableOperation::DeleteTable => "deleteTable",
            TableOperation::SetCellBackground { .. } => "setCellBackground",
            TableOperation::SetCellVAlign { .. } => "setCellVAlign",
            TableOperation::SetTableBorders { .. } => "setTableBorders",
            TableOperation::ToggleHeaderRow => "toggleHeaderRow",
        }
    }

    /// Goes through the logical grid round trip
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TableOperation::InsertRowAbove
                | TableOperation::InsertRowBelow
                | TableOperation::DeleteRows
                | TableOperation::InsertColLeft
                | TableOperation::InsertColRight
                | TableOperation::DeleteCols
                | TableOperation::MergeCells
                | TableOperation::SplitCell
        )
    }

    /// Operates on the selected cells rather than the table as a whole
    pub fn needs_selection(&self) -> bool {
        !matches!(
            self,
            TableOperation::DeleteTable
                | TableOperation::SetTableBorders { .. }
                | TableOperation::ToggleHeaderRow
        )
    }
}

/// What an operation did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationOutcome {
    /// Table was changed in place
    Applied,
    /// Nothing to do (no target, single-cell merge, non-spanning split, ...)
    NoOp,
    /// Table block is gone (deleteTable or the grid collapsed to nothing)
    TableRemoved,
}

/// The table an operation is aimed at and the selected rectangle, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTarget {
    pub table: BlockId,
    pub bounds: Option<SelectionBounds>,
}

/// Apply `op` to `target` inside `doc`
pub fn apply_operation(
    doc: &mut Document,
    target: Option<TableTarget>,
    op: &TableOperation,
) -> OperationOutcome {
    let Some(target) = target else {
        log::debug!("{}: no table target", op.name());
        return OperationOutcome::NoOp;
    };
    if doc.table(target.table).is_none() {
        log::debug!("{}: table {} not found", op.name(), target.table);
        return OperationOutcome::NoOp;
    }

    if let TableOperation::DeleteTable = op {
        doc.remove(target.table);
        log::info!("deleteTable: removed {}", target.table);
        return OperationOutcome::TableRemoved;
    }

    let bounds = target.bounds;
    if op.needs_selection() && bounds.is_none() {
        log::debug!("{}: no selection", op.name());
        return OperationOutcome::NoOp;
    }

    if op.is_structural() {
        return apply_structural(doc, target.table, bounds, op);
    }

    let Some(table) = doc.table_mut(target.table) else {
        return OperationOutcome::NoOp;
    };
    let changed = match op {
        TableOperation::SetCellBackground { color } => {
            for_each_selected(table, bounds, |cell| match color {
                Some(c) => cell.style.set("background-color", c.clone()),
                None => {
                    cell.style.remove("background-color");
                }
            })
        }
        TableOperation::SetCellVAlign { align } => for_each_selected(table, bounds, |cell| {
            cell.style.set("vertical-align", align.as_css())
        }),
        TableOperation::SetTableBorders { borders } => {
            set_table_borders(table, borders);
            true
        }
        TableOperation::ToggleHeaderRow => toggle_header_row(table),
        _ => false,
    };
    outcome(changed)
}

fn apply_structural(
    doc: &mut Document,
    table_id: BlockId,
    bounds: Option<SelectionBounds>,
    op: &TableOperation,
) -> OperationOutcome {
    let Some(table) = doc.table(table_id) else {
        return OperationOutcome::NoOp;
    };
    let mut grid = LogicalGrid::from_table(table);
    let Some(b) = bounds.and_then(|b| clamp_bounds(b, &grid)) else {
        log::debug!("{}: selection outside table", op.name());
        return OperationOutcome::NoOp;
    };

    let changed = match op {
        TableOperation::InsertRowAbove => {
            grid.insert_rows(b.min_row, 1);
            true
        }
        TableOperation::InsertRowBelow => {
            grid.insert_rows(b.max_row + 1, 1);
            true
        }
        TableOperation::DeleteRows => {
            grid.delete_rows(b.min_row, b.max_row);
            true
        }
        TableOperation::InsertColLeft => {
            grid.insert_cols(b.min_col, 1);
            true
        }
        TableOperation::InsertColRight => {
            grid.insert_cols(b.max_col + 1, 1);
            true
        }
        TableOperation::DeleteCols => {
            grid.delete_cols(b.min_col, b.max_col);
            true
        }
        TableOperation::MergeCells => grid.merge(b),
        TableOperation::SplitCell => grid.split(b.top_left()),
        _ => false,
    };
    if !changed {
        return OperationOutcome::NoOp;
    }

    if grid.is_empty() {
        doc.remove(table_id);
        log::info!("{}: grid collapsed, removed table {}", op.name(), table_id);
        return OperationOutcome::TableRemoved;
    }
    debug_assert!(grid.is_rectangular());

    match doc.table_mut(table_id) {
        Some(table) => {
            grid.materialize_into(table);
            log::debug!(
                "{}: table {} is now {}x{}",
                op.name(),
                table_id,
                grid.rows(),
                grid.cols()
            );
            OperationOutcome::Applied
        }
        None => OperationOutcome::NoOp,
    }
}

// Clamp a (possibly stale) selection to the grid; None if it starts outside
fn clamp_bounds(b: SelectionBounds, grid: &LogicalGrid) -> Option<SelectionBounds> {
    if grid.is_empty() || b.min_row >= grid.rows() || b.min_col >= grid.cols() {
        return None;
    }
    Some(SelectionBounds {
        max_row: b.max_row.min(grid.rows() - 1),
        max_col: b.max_col.min(grid.cols() - 1),
        ..b
    })
}

fn for_each_selected(
    table: &mut Table,
    bounds: Option<SelectionBounds>,
    mut f: impl FnMut(&mut crate::models::TableCell),
) -> bool {
    let Some(bounds) = bounds else {
        return false;
    };
    let cells = cells_in_bounds(table, bounds);
    for cell in &cells {
        if let Some(c) = table.cell_mut(cell.row, cell.index) {
            f(c);
        }
    }
    !cells.is_empty()
}

fn set_table_borders(table: &mut Table, borders: &TableBorders) {
    let css = borders.to_css();
    table.style.set("border-collapse", "collapse");
    table.style.set("border", css.clone());
    for cell in table.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
        cell.style.set("border", css.clone());
    }
}

// First row becomes all-header, or all-body if it already was all-header
fn toggle_header_row(table: &mut Table) -> bool {
    let Some(first) = table.rows.first_mut() else {
        return false;
    };
    if first.cells.is_empty() {
        return false;
    }
    let make_header = !first.cells.iter().all(|c| c.header);
    for cell in &mut first.cells {
        cell.header = make_header;
    }
    true
}

fn outcome(changed: bool) -> OperationOutcome {
    if changed {
        OperationOutcome::Applied
    } else {
        OperationOutcome::NoOp
    }
}
