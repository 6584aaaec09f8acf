//! # Label Composer
//!
//! Turns a [`RunConfig`] into the ordered list of labels for one run. The
//! order is the bench order and is fixed:
//!
//! 1. Standard header (`STD …`, or `STD A …` / `STD B …` in duplicate)
//! 2. Standard dilutions: manual labels, then the running chain
//! 3. Base sample labels, lot by lot
//! 4. Accumulative sample dilutions, lot by lot, depth by depth
//! 5. Placebo header and placebo dilutions
//! 6. Reagents
//! 7. Injection vials, expanded by multiplier
//!
//! Composition is a pure function of the config. The only state it touches
//! is the caller's color map and vial multipliers, and those come back in the
//! returned [`Composition`] instead of being written through.

pub mod chain;
pub mod vials;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::{ColorMap, PLACEBO_COLOR, REAGENT_COLOR, STD_A_COLOR, STD_B_COLOR};
use crate::identity::build_vial_identities;
use crate::model::*;
use crate::parse::{format_with_unit, NumberText};

/// The labels of one run, plus the updated cross-run tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub labels: Vec<LabelRecord>,
    /// The input color map with any new lot and vial colors added.
    pub colors: ColorMap,
    /// Reconciled multipliers when vials are included, otherwise the input
    /// table unchanged.
    pub vial_multipliers: BTreeMap<String, NumberText>,
    /// Vial identities of this run. Empty when vials are not included.
    pub identities: Vec<VialIdentity>,
}

/// Compose the labels for `config`.
pub fn compose_labels(config: &RunConfig) -> Composition {
    let mut composer = Composer {
        config,
        colors: config.colors.clone(),
        labels: Vec::new(),
    };

    composer.standard_header();
    composer.standard_dilutions();

    composer.colors.ensure_lot_colors(config.lots.len());
    composer.base_samples();
    composer.sample_dilutions();

    composer.placebo();
    composer.reagents();

    let (identities, vial_multipliers) = if config.include_vials {
        composer.vials()
    } else {
        (Vec::new(), config.vial_multipliers.clone())
    };

    Composition {
        labels: composer.labels,
        colors: composer.colors,
        vial_multipliers,
        identities,
    }
}

struct Composer<'a> {
    config: &'a RunConfig,
    colors: ColorMap,
    labels: Vec<LabelRecord>,
}

impl Composer<'_> {
    fn push(&mut self, kind: LabelKind, text: impl Into<String>, color: &str) {
        self.labels.push(LabelRecord::new(kind, text, color));
    }

    /// Push one standard label, split into `/A` and `/B` when the standard
    /// is duplicated.
    fn push_standard(&mut self, text: &str) {
        if self.config.standard.duplicated {
            self.push(LabelKind::StdA, format!("{text}/A"), STD_A_COLOR);
            self.push(LabelKind::StdB, format!("{text}/B"), STD_B_COLOR);
        } else {
            self.push(LabelKind::StdA, text, STD_A_COLOR);
        }
    }

    fn standard_header(&mut self) {
        let config = self.config;
        let std = &config.standard;
        let amount = format!(
            "{}/{}",
            format_with_unit(&std.weight, "g"),
            format_with_unit(&std.final_volume, "ml")
        );
        if std.duplicated {
            self.push(LabelKind::StdA, format!("STD A {amount}"), STD_A_COLOR);
            self.push(LabelKind::StdB, format!("STD B {amount}"), STD_B_COLOR);
        } else {
            self.push(LabelKind::StdA, format!("STD {amount}"), STD_A_COLOR);
        }
    }

    fn standard_dilutions(&mut self) {
        let config = self.config;
        let dilutions = &config.standard_dilutions;

        for label in dilutions.iter().filter_map(|d| d.manual()) {
            self.push_standard(label);
        }

        // Chains are printed whenever at least one step is unlabelled, even
        // if that step itself has no volumes.
        if dilutions.iter().any(|d| d.manual().is_none()) {
            for chain in chain::standard_chains(dilutions) {
                self.push_standard(&format!("STD {chain}"));
            }
        }
    }

    fn base_samples(&mut self) {
        let config = self.config;
        let opts = &config.sample_options;
        let amount: Vec<String> = [
            format_with_unit(&opts.weight, "g"),
            format_with_unit(&opts.final_volume, "ml"),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        let tail = if amount.is_empty() {
            String::new()
        } else {
            format!(" {}", amount.join("/"))
        };

        let variants = opts.variants();
        for lot in 0..config.lots.len() {
            let name = config.lot_name(lot);
            let color = self.colors.lot_color(lot);
            for variant in &variants {
                self.push(LabelKind::Sample, format!("{name}{variant}{tail}"), &color);
            }
        }
    }

    fn sample_dilutions(&mut self) {
        let config = self.config;
        let dilutions = &config.sample_dilutions;
        if dilutions.is_empty() {
            return;
        }

        let variants = config.sample_options.variants();
        for lot in 0..config.lots.len() {
            let name = config.lot_name(lot);
            let color = self.colors.lot_color(lot);
            for chain in chain::sample_chains(dilutions, lot).into_iter().flatten() {
                for variant in &variants {
                    self.push(
                        LabelKind::Sample,
                        format!("{name}{variant} {chain}"),
                        &color,
                    );
                }
            }
        }
    }

    fn placebo(&mut self) {
        let config = self.config;
        let placebo = &config.placebo;
        if !placebo.included {
            return;
        }

        let weight = format_with_unit(&placebo.weight, "g");
        let volume = format_with_unit(&placebo.final_volume, "ml");
        if weight.is_empty() && volume.is_empty() {
            self.push(LabelKind::Placebo, "Placebo", PLACEBO_COLOR);
        } else {
            self.push(
                LabelKind::Placebo,
                format!("Placebo {weight}/{volume}"),
                PLACEBO_COLOR,
            );
        }

        // Placebo steps print the raw volumes, no units and no chaining.
        for step in &placebo.dilutions {
            if let Some(label) = step.manual() {
                self.push(LabelKind::Placebo, format!("Placebo {label}"), PLACEBO_COLOR);
                continue;
            }
            let pip = step.pipette_volume.trim();
            let fin = step.final_volume.trim();
            if !pip.is_empty() || !fin.is_empty() {
                self.push(
                    LabelKind::Placebo,
                    format!("Placebo {pip}:{fin}"),
                    PLACEBO_COLOR,
                );
            }
        }
    }

    fn reagents(&mut self) {
        let config = self.config;
        for name in config.reagent_names() {
            self.push(LabelKind::Reagent, name, REAGENT_COLOR);
        }
    }

    fn vials(&mut self) -> (Vec<VialIdentity>, BTreeMap<String, NumberText>) {
        let identities = build_vial_identities(self.config);
        self.colors.assign(&identities, self.config.lots.len());
        let multipliers = vials::reconcile(&identities, &self.config.vial_multipliers);

        for identity in &identities {
            let color = self
                .colors
                .vial_color(&identity.id)
                .unwrap_or_default()
                .to_string();
            for _ in 0..vials::copies(&multipliers, &identity.id) {
                self.push(LabelKind::Vial, identity.id.as_str(), &color);
            }
        }

        (identities, multipliers)
    }
}
