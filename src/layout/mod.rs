//! # Page Layout
//!
//! Places labels INTO a fixed grid of cells, one sheet at a time. An APLI
//! 10199 sheet has 5 columns and 16 rows; cells are numbered 1..=80 row by
//! row, left to right.
//!
//! Label sheets are expensive, so a run rarely starts on a fresh one. The
//! caller passes the first free cell of the current sheet, and the layout
//! hands back the first free cell after the run. Feeding that number into
//! the next run tiles the same physical sheet without overprinting.
//!
//! The algorithm is a single cursor walk:
//!
//! 1. Start the cursor at `start_cell - 1`
//! 2. Before each label, if the cursor is past the last cell, open a new page
//!    and reset the cursor to 0
//! 3. Place the label at `column = cursor % 5`, `row = cursor / 5`
//! 4. Advance the cursor

pub mod fit;
pub mod sheet;

use serde::Serialize;

use crate::model::LabelRecord;

/// Columns on a sheet.
pub const COLUMNS: usize = 5;
/// Rows on a sheet.
pub const ROWS: usize = 16;
/// Cells on a sheet.
pub const CELLS_PER_PAGE: usize = COLUMNS * ROWS;

/// One label placed on a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// 0-based page within this run.
    pub page: usize,
    /// 0-based column, left to right.
    pub column: usize,
    /// 0-based row, top to bottom.
    pub row: usize,
    pub label: LabelRecord,
}

impl Placement {
    /// 1-based cell number on its page.
    pub fn cell(&self) -> usize {
        self.row * COLUMNS + self.column + 1
    }
}

/// The outcome of laying out one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub placements: Vec<Placement>,
    pub total_placed: usize,
    /// First free cell after this run, to start the next one.
    pub next_start_cell: usize,
}

impl LayoutResult {
    /// Number of pages the run touches.
    pub fn page_count(&self) -> usize {
        self.placements.last().map(|p| p.page + 1).unwrap_or(0)
    }
}

/// Clamp a requested start cell into 1..=80.
pub fn clamp_start_cell(start_cell: i64) -> usize {
    start_cell.clamp(1, CELLS_PER_PAGE as i64) as usize
}

/// Lay out `labels` starting at 1-based `start_cell`.
pub fn layout(labels: &[LabelRecord], start_cell: i64) -> LayoutResult {
    let start = clamp_start_cell(start_cell);
    let mut cursor = start - 1;
    let mut page = 0;
    let mut placements = Vec::with_capacity(labels.len());

    for label in labels {
        if cursor >= CELLS_PER_PAGE {
            page += 1;
            cursor = 0;
        }
        placements.push(Placement {
            page,
            column: cursor % COLUMNS,
            row: cursor / COLUMNS,
            label: label.clone(),
        });
        cursor += 1;
    }

    let total_placed = placements.len();
    LayoutResult {
        placements,
        total_placed,
        next_start_cell: next_start_cell(start, total_placed),
    }
}

/// The first free cell after placing `total_placed` labels from `start_cell`.
///
/// `start_cell` is clamped into 1..=80 first. With nothing placed that start
/// cell is returned. Otherwise it is the cell after the last one used,
/// wrapping from 80 back to 1.
pub fn next_start_cell(start_cell: usize, total_placed: usize) -> usize {
    let start = start_cell.clamp(1, CELLS_PER_PAGE);
    if total_placed == 0 {
        return start;
    }
    let last = (start - 1 + (total_placed - 1) % CELLS_PER_PAGE) % CELLS_PER_PAGE + 1;
    if last + 1 > CELLS_PER_PAGE {
        1
    } else {
        last + 1
    }
}
