//! # Run Model
//!
//! The input and output types of the label engine. A [`RunConfig`] describes
//! one analytical run: the reference standard and its dilutions, the lots
//! being tested, the placebo, the reagents, and how many injection vials of
//! each entity to label. The engine turns it into an ordered list of
//! [`LabelRecord`]s.
//!
//! Every field has a default so a partial JSON document is a valid run. The
//! caller owns the config for the whole session; the engine only reads it and
//! hands back the pieces that changed (colors, vial multipliers, start cell).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::ColorMap;
use crate::compose::Composition;
use crate::parse::NumberText;
use crate::plan::SheetPlan;

/// A complete description of one analytical run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// The reference standard preparation.
    pub standard: StandardPrep,

    /// Serial dilutions of the standard, in bench order.
    pub standard_dilutions: Vec<ManualDilution>,

    /// Lots under test. The position in this list is the lot index.
    pub lots: Vec<Lot>,

    /// How each lot is sampled and prepared.
    pub sample_options: SampleOptions,

    /// Accumulative dilutions applied to every lot.
    pub sample_dilutions: Vec<SampleDilution>,

    pub placebo: Placebo,

    /// Reagent names. Blank entries are ignored.
    pub reagents: Vec<String>,

    /// Emit one VIAL label per injection vial.
    pub include_vials: bool,

    /// Vial count per vial identity, carried across generations.
    pub vial_multipliers: BTreeMap<String, NumberText>,

    /// Free text shown in parentheses after "Blanco".
    pub blank_label_suffix: String,

    /// Free text shown in parentheses after "Wash".
    pub wash_label_suffix: String,

    /// 1-based cell on the current sheet where printing resumes.
    pub start_cell: NumberText,

    /// Lot and vial colors, carried across generations.
    pub colors: ColorMap,

    /// The four metadata lines printed under every label.
    pub sheet: SheetInfo,

    /// Draw the color swatch in the top-right corner of each label.
    pub show_color_swatch: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            standard: StandardPrep::default(),
            standard_dilutions: vec![],
            lots: vec![Lot::default()],
            sample_options: SampleOptions::default(),
            sample_dilutions: vec![],
            placebo: Placebo::default(),
            reagents: vec![],
            include_vials: true,
            vial_multipliers: BTreeMap::new(),
            blank_label_suffix: String::new(),
            wash_label_suffix: String::new(),
            start_cell: NumberText::Int(1),
            colors: ColorMap::default(),
            sheet: SheetInfo::default(),
            show_color_swatch: true,
        }
    }
}

impl RunConfig {
    /// Parse a run configuration from its native JSON form.
    pub fn from_json(json: &str) -> Result<Self, crate::LabelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Display name of lot `index`: the trimmed name, or `Lote{index+1}`.
    pub fn lot_name(&self, index: usize) -> String {
        let name = self.lots.get(index).map(|l| l.name.trim()).unwrap_or("");
        if name.is_empty() {
            format!("Lote{}", index + 1)
        } else {
            name.to_string()
        }
    }

    /// Non-blank reagent names, trimmed, in input order.
    pub fn reagent_names(&self) -> impl Iterator<Item = &str> {
        self.reagents.iter().map(|r| r.trim()).filter(|r| !r.is_empty())
    }

    /// The config for the next run on the same sheet: printing resumes at
    /// the first free cell, and the colors and multipliers of this run carry
    /// over.
    pub fn advance(&self, plan: &SheetPlan, composition: &Composition) -> RunConfig {
        RunConfig {
            start_cell: NumberText::Int(plan.next_start_cell as i64),
            colors: composition.colors.clone(),
            vial_multipliers: composition.vial_multipliers.clone(),
            ..self.clone()
        }
    }
}

/// The reference standard preparation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandardPrep {
    /// Prepare the standard in duplicate (STD A / STD B).
    pub duplicated: bool,
    pub weight: String,
    pub final_volume: String,
}

/// A dilution step whose label can be typed in by hand.
///
/// Used for standard and placebo dilutions. When `manual_label` is set it
/// replaces the computed `pipette:final` text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualDilution {
    pub pipette_volume: String,
    pub final_volume: String,
    pub manual_label: String,
}

impl ManualDilution {
    pub fn manual(&self) -> Option<&str> {
        non_blank(&self.manual_label)
    }
}

/// A lot under test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lot {
    pub name: String,
}

impl Lot {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// How samples are drawn from each lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleOptions {
    /// Two preparations per lot, suffixed `/A` and `/B`.
    pub duplicated: bool,
    /// Content-uniformity mode: number `uniformity_count` units per lot.
    /// Takes precedence over `duplicated`.
    pub uniformity: bool,
    pub uniformity_count: NumberText,
    pub weight: String,
    pub final_volume: String,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            duplicated: true,
            uniformity: false,
            uniformity_count: NumberText::from("2"),
            weight: String::new(),
            final_volume: String::new(),
        }
    }
}

/// Smallest and largest number of units in uniformity mode.
pub const UNIFORMITY_RANGE: (i64, i64) = (1, 100);

impl SampleOptions {
    /// Number of units per lot in uniformity mode, clamped to 1..=100.
    pub fn uniformity_units(&self) -> usize {
        let (lo, hi) = UNIFORMITY_RANGE;
        self.uniformity_count.to_int(1).clamp(lo, hi) as usize
    }

    /// The per-lot variant suffixes, in emission order.
    ///
    /// Uniformity yields `/1`..`/n`, duplication yields `/A` and `/B`, and a
    /// single preparation yields one empty suffix.
    pub fn variants(&self) -> Vec<String> {
        if self.uniformity {
            (1..=self.uniformity_units()).map(|k| format!("/{k}")).collect()
        } else if self.duplicated {
            vec!["/A".to_string(), "/B".to_string()]
        } else {
            vec![String::new()]
        }
    }
}

/// One step of the accumulative sample dilution chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleDilution {
    pub pipette_volume: String,
    pub final_volume: String,
    /// Hand-typed text for this step, indexed by lot. Missing or blank
    /// entries fall back to `pipette:final`.
    pub per_lot_override: Vec<String>,
}

impl SampleDilution {
    /// The text of this step for lot `index`, if it can be resolved.
    pub fn step_text(&self, index: usize) -> Option<String> {
        if let Some(custom) = self.per_lot_override.get(index).and_then(|s| non_blank(s)) {
            return Some(custom.to_string());
        }
        volume_pair(&self.pipette_volume, &self.final_volume)
    }
}

/// The placebo preparation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placebo {
    pub included: bool,
    pub weight: String,
    pub final_volume: String,
    pub dilutions: Vec<ManualDilution>,
}

/// Header data printed on every label of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetInfo {
    pub product: String,
    pub determination: String,
    /// Free-form summary of the lots in this run.
    pub lot: String,
    pub analyst: String,
    pub date: String,
}

impl SheetInfo {
    /// The four metadata lines, in print order.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Producto: {}", self.product),
            format!("Determinación: {}", self.determination),
            format!("Lote: {}", self.lot),
            format!("Analista: {}    Fecha: {}", self.analyst, self.date),
        ]
    }

    /// `{product}_{lot}`, each part made safe for a file name.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", clean_file_name(&self.product), clean_file_name(&self.lot))
    }
}

/// Strip characters that file systems reject and join words with `_`.
/// Nothing left yields `etiquetas`.
pub fn clean_file_name(name: &str) -> String {
    const REJECTED: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ':'];
    let kept: String = name.trim().chars().filter(|c| !REJECTED.contains(c)).collect();
    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        "etiquetas".to_string()
    } else {
        joined
    }
}

/// What a label is for. Serialized with the names the sheet legend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKind {
    #[serde(rename = "STD_A")]
    StdA,
    #[serde(rename = "STD_B")]
    StdB,
    #[serde(rename = "MUESTRA")]
    Sample,
    #[serde(rename = "PLACEBO")]
    Placebo,
    #[serde(rename = "REACTIVO")]
    Reagent,
    #[serde(rename = "VIAL")]
    Vial,
}

/// One label to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRecord {
    pub kind: LabelKind,
    pub text: String,
    pub color_hex: String,
}

impl LabelRecord {
    pub fn new(kind: LabelKind, text: impl Into<String>, color_hex: &str) -> Self {
        Self {
            kind,
            text: text.into(),
            color_hex: color_hex.to_string(),
        }
    }
}

/// The role of a vial identity. Decides its reserved color and its default
/// multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VialType {
    Blank,
    Std,
    Sample,
    Placebo,
    Reagent,
}

/// A logical HPLC injection entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VialIdentity {
    /// Printed text, and the key for colors and multipliers.
    pub id: String,
    #[serde(rename = "type")]
    pub vial_type: VialType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_index: Option<usize>,
}

impl VialIdentity {
    pub fn new(id: impl Into<String>, vial_type: VialType) -> Self {
        Self {
            id: id.into(),
            vial_type,
            lot_index: None,
        }
    }

    pub fn sample(id: impl Into<String>, lot_index: usize) -> Self {
        Self {
            id: id.into(),
            vial_type: VialType::Sample,
            lot_index: Some(lot_index),
        }
    }

    /// Multiplier given to an identity seen for the first time.
    pub fn default_multiplier(&self) -> i64 {
        match self.vial_type {
            VialType::Reagent => 0,
            _ => 1,
        }
    }
}

/// Trimmed text, or `None` when blank.
pub(crate) fn non_blank(s: &str) -> Option<&str> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

/// `"{pip}:{final}"` when both volumes are present.
pub(crate) fn volume_pair(pipette: &str, final_volume: &str) -> Option<String> {
    match (non_blank(pipette), non_blank(final_volume)) {
        (Some(p), Some(f)) => Some(format!("{p}:{f}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = RunConfig::from_json(r#"{ "lots": [{ "name": "L1" }] }"#).unwrap();
        assert!(cfg.sample_options.duplicated);
        assert!(cfg.include_vials);
        assert_eq!(cfg.start_cell.to_int(1), 1);
        assert_eq!(cfg.lots.len(), 1);
    }

    #[test]
    fn lot_name_falls_back_to_index() {
        let mut cfg = RunConfig::default();
        cfg.lots = vec![Lot::named("  "), Lot::named(" X-12 ")];
        assert_eq!(cfg.lot_name(0), "Lote1");
        assert_eq!(cfg.lot_name(1), "X-12");
    }

    #[test]
    fn uniformity_units_clamp() {
        let mut opts = SampleOptions {
            uniformity: true,
            ..Default::default()
        };
        opts.uniformity_count = NumberText::from("150");
        assert_eq!(opts.uniformity_units(), 100);
        opts.uniformity_count = NumberText::from("0");
        assert_eq!(opts.uniformity_units(), 1);
        opts.uniformity_count = NumberText::from("abc");
        assert_eq!(opts.uniformity_units(), 1);
        opts.uniformity_count = NumberText::Int(3);
        assert_eq!(opts.variants(), vec!["/1", "/2", "/3"]);
    }

    #[test]
    fn step_text_prefers_override() {
        let d = SampleDilution {
            pipette_volume: "1".into(),
            final_volume: "10".into(),
            per_lot_override: vec!["".into(), " custom ".into()],
        };
        assert_eq!(d.step_text(0).as_deref(), Some("1:10"));
        assert_eq!(d.step_text(1).as_deref(), Some("custom"));
        assert_eq!(d.step_text(5).as_deref(), Some("1:10"));

        let gap = SampleDilution {
            pipette_volume: "1".into(),
            ..Default::default()
        };
        assert_eq!(gap.step_text(0), None);
    }

    #[test]
    fn label_kind_serializes_legacy_names() {
        let json = serde_json::to_string(&LabelKind::Sample).unwrap();
        assert_eq!(json, "\"MUESTRA\"");
        let json = serde_json::to_string(&LabelKind::StdA).unwrap();
        assert_eq!(json, "\"STD_A\"");
    }

    #[test]
    fn advance_carries_session_state() {
        let mut cfg = RunConfig::default();
        cfg.lots = vec![Lot::named("L1")];
        cfg.start_cell = NumberText::Int(78);
        let composition = crate::compose_labels(&cfg);
        let plan = crate::plan_sheet(&cfg, &composition.labels);

        let next = cfg.advance(&plan, &composition);
        assert_eq!(next.start_cell, NumberText::Int(plan.next_start_cell as i64));
        assert_eq!(next.colors, composition.colors);
        assert_eq!(next.vial_multipliers, composition.vial_multipliers);
        assert_eq!(next.lots, cfg.lots);
    }

    #[test]
    fn file_names_are_cleaned() {
        assert_eq!(clean_file_name(" Ácido: cítrico / 5mg "), "Ácido_cítrico_5mg");
        assert_eq!(clean_file_name("a\tb   c"), "a_b_c");
        assert_eq!(clean_file_name("???"), "etiquetas");
        assert_eq!(clean_file_name(""), "etiquetas");

        let info = SheetInfo {
            product: "Ibuprofeno 400".into(),
            lot: "L1|L2".into(),
            ..Default::default()
        };
        assert_eq!(info.file_stem(), "Ibuprofeno_400_L1L2");
    }

    #[test]
    fn sheet_lines() {
        let info = SheetInfo {
            product: "Ibuprofeno".into(),
            analyst: "YAK".into(),
            date: "01/02/2026".into(),
            ..Default::default()
        };
        let lines = info.lines();
        assert_eq!(lines[0], "Producto: Ibuprofeno");
        assert_eq!(lines[3], "Analista: YAK    Fecha: 01/02/2026");
    }
}
