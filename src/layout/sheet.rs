//! # Sheet Geometry
//!
//! Physical dimensions of the label stock, in PDF points. Coordinates use the
//! PDF convention: origin at the bottom-left of the page, y growing upward.

use serde::Serialize;

use super::{COLUMNS, ROWS};

/// Points per centimeter, as the stock's datasheet is measured.
pub const CM_TO_PT: f64 = 28.35;

/// An axis-aligned rectangle; `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Shrink by `dx` on the left and right and `dy` on top and bottom.
    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            width: (self.width - 2.0 * dx).max(0.0),
            height: (self.height - 2.0 * dy).max(0.0),
        }
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.width <= self.x + self.width + EPS
            && other.y + other.height <= self.y + self.height + EPS
    }
}

/// Dimensions of a label sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetGeometry {
    pub page_width: f64,
    pub page_height: f64,
    /// Distance from the left page edge to the first column.
    pub margin_x: f64,
    /// Distance from the top page edge to the first row.
    pub margin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Horizontal distance between the left edges of adjacent columns.
    pub column_pitch: f64,
    /// Vertical distance between the top edges of adjacent rows.
    pub row_pitch: f64,
    pub columns: usize,
    pub rows: usize,
    /// Inner padding as a fraction of the cell size.
    pub inner_margin: f64,
    /// Side of the color swatch.
    pub swatch_size: f64,
    /// Gap between the swatch and the cell's top-right corner, as a
    /// fraction of the cell width.
    pub swatch_margin: f64,
    /// Width of the cell border stroke.
    pub border_width: f64,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self::apli_10199()
    }
}

impl SheetGeometry {
    /// APLI 10199: A4, 5×16 labels of 35.6×16.9 mm.
    pub fn apli_10199() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin_x: 1.09 * CM_TO_PT,
            margin_y: 1.4 * CM_TO_PT,
            cell_width: 3.56 * CM_TO_PT,
            cell_height: 1.69 * CM_TO_PT,
            column_pitch: 3.81 * CM_TO_PT,
            row_pitch: 1.69 * CM_TO_PT,
            columns: COLUMNS,
            rows: ROWS,
            inner_margin: 0.05,
            swatch_size: 0.45 * CM_TO_PT,
            swatch_margin: 0.02,
            border_width: 0.6,
        }
    }

    /// The outer rectangle of the cell at `column`, `row`.
    pub fn cell_rect(&self, column: usize, row: usize) -> Rect {
        Rect {
            x: self.margin_x + column as f64 * self.column_pitch,
            y: (self.page_height - self.margin_y) - (row + 1) as f64 * self.row_pitch,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// The text area of a cell.
    pub fn inner_rect(&self, cell: &Rect) -> Rect {
        cell.inset(
            cell.width * self.inner_margin,
            cell.height * self.inner_margin,
        )
    }

    /// The color swatch, tucked into the cell's top-right corner.
    pub fn swatch_rect(&self, cell: &Rect) -> Rect {
        let gap = cell.width * self.swatch_margin;
        Rect {
            x: cell.x + cell.width - self.swatch_size - gap,
            y: cell.y + cell.height - self.swatch_size - gap,
            width: self.swatch_size,
            height: self.swatch_size,
        }
    }

    /// Horizontal room the swatch takes away from centered text.
    pub fn swatch_allowance(&self) -> f64 {
        self.swatch_size * 0.6
    }
}
