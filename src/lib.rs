//! # Labelsheet
//!
//! A label composer for laboratory sample tracking.
//!
//! An analytical run needs a sticky label for every flask, dilution and
//! injection vial on the bench: the reference standard and its serial
//! dilutions, every lot under test, the placebo, the reagents, and one label
//! per HPLC vial. Labelsheet turns a description of the run into that list of
//! labels, in bench order and color-coded by lot, and lays them out on APLI
//! 10199 sheets (A4, 5×16 cells).
//!
//! Sheets are rarely used up in one run. Every generation reports the first
//! free cell it left behind, and the next run starts there.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON / snapshot)
//!       ↓
//!   [model]     — RunConfig: standard, lots, dilutions, placebo, vials
//!       ↓
//!   [compose]   — Ordered LabelRecords, lot colors, vial multipliers
//!       ↓
//!   [layout]    — Cells on 5×16 pages, carry-over start cell
//!       ↓
//!   [plan]      — Geometry, swatches and fitted text for a document writer
//! ```

pub mod color;
pub mod compose;
pub mod error;
pub mod font;
pub mod identity;
pub mod layout;
pub mod model;
pub mod parse;
pub mod plan;
pub mod snapshot;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use compose::{compose_labels, Composition};
pub use error::LabelError;
pub use layout::layout;
pub use model::{LabelKind, LabelRecord, RunConfig};
pub use plan::{plan_sheet, SheetPlan};

use serde::Serialize;

/// Everything one generation request produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub labels: Vec<LabelRecord>,
    pub plan: SheetPlan,
    /// The config to use for the next run on the same sheet.
    pub next: RunConfig,
}

/// Compose, lay out and plan one run.
///
/// This is the primary entry point. The input config is not touched; the
/// updated colors, multipliers and start cell come back in
/// [`Generation::next`].
pub fn generate(config: &RunConfig) -> Generation {
    let composition = compose_labels(config);
    let plan = plan_sheet(config, &composition.labels);
    let next = config.advance(&plan, &composition);
    Generation {
        labels: composition.labels,
        plan,
        next,
    }
}

/// How a configuration document was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// [`RunConfig`] serialized as camelCase JSON.
    Native,
    /// The flat snapshot the form session saves.
    Snapshot,
}

/// Read a configuration in either format, telling which one it was.
pub fn read_config(json: &str) -> Result<(RunConfig, ConfigFormat), LabelError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if snapshot::is_snapshot(&value) {
        Ok((snapshot::import(&value)?, ConfigFormat::Snapshot))
    } else {
        Ok((serde_json::from_value(value)?, ConfigFormat::Native))
    }
}

/// Write `config` as pretty-printed JSON in `format`.
pub fn write_config(config: &RunConfig, format: ConfigFormat) -> Result<String, LabelError> {
    let json = match format {
        ConfigFormat::Native => serde_json::to_string_pretty(config)?,
        ConfigFormat::Snapshot => serde_json::to_string_pretty(&snapshot::export(config))?,
    };
    Ok(json)
}
