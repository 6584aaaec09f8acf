//! # Render Plan
//!
//! Everything a document writer needs to print a run, and nothing it has to
//! work out for itself: per page, per cell, the cell rectangle, the swatch
//! rectangle and color, the five text lines, and the font sizes that fit.
//! Drawing the plan (PDF, preview image, printer driver) happens outside
//! this crate.

use serde::Serialize;

use crate::color::Rgb;
use crate::layout::fit::{FitRule, FittedText};
use crate::layout::sheet::{Rect, SheetGeometry};
use crate::layout::{self, LayoutResult};
use crate::model::{LabelKind, LabelRecord, RunConfig};

/// A whole run, page by page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPlan {
    pub geometry: SheetGeometry,
    pub pages: Vec<PagePlan>,
    pub total_placed: usize,
    /// 1-based cell the run started at, after clamping.
    pub start_cell: usize,
    pub next_start_cell: usize,
}

/// The labels printed on one physical sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub index: usize,
    pub cells: Vec<CellPlan>,
}

/// One printed label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPlan {
    /// 1-based cell number on the page.
    pub cell: usize,
    pub column: usize,
    pub row: usize,
    pub kind: LabelKind,
    pub rect: Rect,
    pub text_area: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swatch: Option<Swatch>,
    /// Label text first, then the metadata lines.
    pub lines: Vec<String>,
    pub text: FittedText,
}

/// The color square drawn in a label's corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Swatch {
    pub rect: Rect,
    pub color: Rgb,
}

/// Lay out `labels` for `config` and resolve every cell for drawing.
pub fn plan_sheet(config: &RunConfig, labels: &[LabelRecord]) -> SheetPlan {
    plan_with(
        config,
        labels,
        &SheetGeometry::apli_10199(),
        &FitRule::default(),
    )
}

/// [`plan_sheet`] with explicit stock dimensions and fitting rule.
pub fn plan_with(
    config: &RunConfig,
    labels: &[LabelRecord],
    geometry: &SheetGeometry,
    rule: &FitRule,
) -> SheetPlan {
    let start_cell = layout::clamp_start_cell(config.start_cell.to_int(1));
    let LayoutResult {
        placements,
        total_placed,
        next_start_cell,
    } = layout::layout(labels, start_cell as i64);

    let data = config.sheet.lines();
    let mut pages: Vec<PagePlan> = Vec::new();

    for placement in placements {
        if pages.last().map(|p| p.index) != Some(placement.page) {
            pages.push(PagePlan {
                index: placement.page,
                cells: Vec::new(),
            });
        }

        let rect = geometry.cell_rect(placement.column, placement.row);
        let text_area = geometry.inner_rect(&rect);
        let swatch = config.show_color_swatch.then(|| Swatch {
            rect: geometry.swatch_rect(&rect),
            color: Rgb::or_gray(&placement.label.color_hex),
        });
        let text_width = if swatch.is_some() {
            text_area.width - geometry.swatch_allowance()
        } else {
            text_area.width
        };
        let text = rule.fit(&placement.label.text, &data, text_width, text_area.height);

        let mut lines = Vec::with_capacity(1 + data.len());
        lines.push(placement.label.text.clone());
        lines.extend(data.iter().cloned());

        let cell = CellPlan {
            cell: placement.cell(),
            column: placement.column,
            row: placement.row,
            kind: placement.label.kind,
            rect,
            text_area,
            swatch,
            lines,
            text,
        };
        if let Some(page) = pages.last_mut() {
            page.cells.push(cell);
        }
    }

    SheetPlan {
        geometry: *geometry,
        pages,
        total_placed,
        start_cell,
        next_start_cell,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::NumberText;

    fn label(text: &str, color: &str) -> LabelRecord {
        LabelRecord::new(LabelKind::Sample, text, color)
    }

    #[test]
    fn groups_cells_by_page() {
        let cfg = RunConfig {
            start_cell: NumberText::Int(80),
            ..Default::default()
        };
        let labels = vec![label("a", "#2ca02c"), label("b", "#2ca02c")];
        let plan = plan_sheet(&cfg, &labels);
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[0].cells[0].cell, 80);
        assert_eq!(plan.pages[1].cells[0].cell, 1);
        assert_eq!(plan.next_start_cell, 2);
    }

    #[test]
    fn bad_color_draws_gray() {
        let cfg = RunConfig::default();
        let plan = plan_sheet(&cfg, &[label("a", "not-a-color"), label("b", "")]);
        for cell in &plan.pages[0].cells {
            assert_eq!(cell.swatch.unwrap().color, Rgb::NEUTRAL_GRAY);
        }
    }

    #[test]
    fn swatch_can_be_hidden() {
        let cfg = RunConfig {
            show_color_swatch: false,
            ..Default::default()
        };
        let plan = plan_sheet(&cfg, &[label("a", "#2ca02c")]);
        assert!(plan.pages[0].cells[0].swatch.is_none());
    }

    #[test]
    fn lines_carry_metadata() {
        let mut cfg = RunConfig::default();
        cfg.sheet.product = "Paracetamol".into();
        let plan = plan_sheet(&cfg, &[label("L1/A", "#2ca02c")]);
        let lines = &plan.pages[0].cells[0].lines;
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "L1/A");
        assert_eq!(lines[1], "Producto: Paracetamol");
    }

    #[test]
    fn unparsable_start_cell_starts_at_one() {
        let cfg = RunConfig {
            start_cell: NumberText::from("first"),
            ..Default::default()
        };
        let plan = plan_sheet(&cfg, &[label("a", "#2ca02c")]);
        assert_eq!(plan.start_cell, 1);
        assert_eq!(plan.pages[0].cells[0].cell, 1);
    }

    #[test]
    fn empty_run_has_no_pages() {
        let cfg = RunConfig {
            start_cell: NumberText::Int(33),
            ..Default::default()
        };
        let plan = plan_sheet(&cfg, &[]);
        assert!(plan.pages.is_empty());
        assert_eq!(plan.next_start_cell, 33);
    }
}
