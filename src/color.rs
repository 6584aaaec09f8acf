//! # Color Allocation
//!
//! Every lot gets its own swatch color so a tray of vials can be sorted at a
//! glance. A handful of colors are reserved for fixed roles (standard A,
//! standard B, blank, reagent, placebo) and are never handed to a lot.
//!
//! Colors live in a [`ColorMap`] owned by the caller. Allocation only ever
//! adds entries; an existing lot color is replaced only when it collides
//! with a reserved or forbidden color.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::model::{VialIdentity, VialType};

pub const STD_A_COLOR: &str = "#1f77b4";
pub const STD_B_COLOR: &str = "#ffbf00";
pub const BLANK_COLOR: &str = "#ecf0f1";
pub const REAGENT_COLOR: &str = "#f39c12";
pub const PLACEBO_COLOR: &str = "#ff0000";

/// Used when the palette is somehow empty.
pub const FALLBACK_LOT_COLOR: &str = "#6b6bd3";

/// Drawn when a label's color can't be parsed.
pub const NEUTRAL_GRAY: &str = "#cccccc";

/// Reserved role colors plus two hues too close to the placebo red.
const FORBIDDEN: [&str; 7] = [
    BLANK_COLOR,
    STD_A_COLOR,
    STD_B_COLOR,
    REAGENT_COLOR,
    PLACEBO_COLOR,
    "#e6194b",
    "#f58231",
];

const BASE_PALETTE: [&str; 15] = [
    "#2ca02c", "#9467bd", "#8c564b", "#e377c2", "#17becf", "#7f7f7f", "#bcbd22", "#98df8a",
    "#c5b0d5", "#6b6bd3", "#00a5a5", "#b59ddb", "#9edae5", "#c49c94", "#dbdb8d",
];

const PALETTE_EXTRAS: [&str; 8] = [
    "#2f4f4f", "#6a5acd", "#20b2aa", "#00ced1", "#4b0082", "#556b2f", "#4682b4", "#8b4513",
];

const PALETTE_SIZE: usize = 12;

/// Whether `hex` is reserved for a fixed role or otherwise excluded.
pub fn is_forbidden(hex: &str) -> bool {
    let hex = hex.trim().to_ascii_lowercase();
    FORBIDDEN.iter().any(|f| *f == hex)
}

/// The lot palette: the base list without forbidden colors, padded with
/// extras up to twelve entries.
pub fn sample_palette() -> &'static [String] {
    static PALETTE: OnceLock<Vec<String>> = OnceLock::new();
    PALETTE.get_or_init(|| build_palette(&BASE_PALETTE))
}

fn build_palette(base: &[&str]) -> Vec<String> {
    let mut palette: Vec<String> = base
        .iter()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| !is_forbidden(c))
        .collect();
    for extra in PALETTE_EXTRAS {
        if palette.len() >= PALETTE_SIZE {
            break;
        }
        if !palette.iter().any(|c| c == extra) {
            palette.push(extra.to_string());
        }
    }
    palette.truncate(PALETTE_SIZE);
    palette
}

/// The color for lot `index`. Cycles through the palette.
pub fn allocate_lot_color(index: usize) -> String {
    pick(sample_palette(), index)
}

fn pick(palette: &[String], index: usize) -> String {
    let pool: Vec<&String> = palette.iter().filter(|c| !is_forbidden(c)).collect();
    if pool.is_empty() {
        return FALLBACK_LOT_COLOR.to_string();
    }
    pool[index % pool.len()].clone()
}

/// Reserved color for a non-sample vial identity.
///
/// Standards ending in `/B` (or exactly `STD B`) take the B color; every
/// other standard takes the A color.
fn reserved_color(identity: &VialIdentity) -> Option<&'static str> {
    match identity.vial_type {
        VialType::Blank => Some(BLANK_COLOR),
        VialType::Placebo => Some(PLACEBO_COLOR),
        VialType::Reagent => Some(REAGENT_COLOR),
        VialType::Std => {
            let id = identity.id.as_str();
            if id.ends_with("/A") || id == "STD A" {
                Some(STD_A_COLOR)
            } else if id.ends_with("/B") || id == "STD B" {
                Some(STD_B_COLOR)
            } else {
                Some(STD_A_COLOR)
            }
        }
        VialType::Sample => None,
    }
}

/// The two persistent color tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorMap {
    /// Lot index → hex color.
    pub lot_colors: BTreeMap<usize, String>,
    /// Vial identity → hex color.
    pub vial_colors: BTreeMap<String, String>,
}

impl ColorMap {
    /// Give every lot in `0..lot_count` a usable color.
    ///
    /// Lots that already hold a non-forbidden color keep it.
    pub fn ensure_lot_colors(&mut self, lot_count: usize) {
        for i in 0..lot_count {
            let usable = self.lot_colors.get(&i).is_some_and(|c| !is_forbidden(c));
            if !usable {
                self.lot_colors.insert(i, allocate_lot_color(i));
            }
        }
    }

    /// The color of lot `index`, allocating one if the lot has none yet.
    pub fn lot_color(&mut self, index: usize) -> String {
        self.lot_colors
            .entry(index)
            .or_insert_with(|| allocate_lot_color(index))
            .clone()
    }

    pub fn vial_color(&self, id: &str) -> Option<&str> {
        self.vial_colors.get(id).map(String::as_str)
    }

    /// Color every identity: reserved colors for fixed roles, the lot color
    /// for samples. Entries for other identities are left alone.
    pub fn assign(&mut self, identities: &[VialIdentity], lot_count: usize) {
        self.ensure_lot_colors(lot_count);
        for identity in identities {
            let color = match reserved_color(identity) {
                Some(c) => c.to_string(),
                None => self.lot_color(identity.lot_index.unwrap_or(0)),
            };
            self.vial_colors.insert(identity.id.clone(), color);
        }
    }
}

/// An sRGB color with components in 0.0..=1.0, as a document writer wants it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb` (the `#` is optional).
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = match hex.len() {
            3 => (
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            ),
            6 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ),
            _ => return None,
        };
        Some(Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        })
    }

    /// Parse `hex`, falling back to neutral gray.
    pub fn or_gray(hex: &str) -> Self {
        Self::parse_hex(hex).unwrap_or(Self::NEUTRAL_GRAY)
    }

    pub const NEUTRAL_GRAY: Rgb = Rgb {
        r: 0.8,
        g: 0.8,
        b: 0.8,
    };
}
