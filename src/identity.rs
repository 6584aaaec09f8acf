//! # Vial Identities
//!
//! The distinct injection vials a run implies, in the order they go on the
//! autosampler tray: blank, wash, standards, manual standard dilutions,
//! samples per lot, placebo, reagents. Identity strings double as the keys
//! of the vial color and multiplier tables, so they are unique; when two
//! sources produce the same string the first one wins.

use std::collections::HashSet;

use crate::model::{non_blank, RunConfig, VialIdentity, VialType};

/// Build the de-duplicated vial identity list for `config`.
pub fn build_vial_identities(config: &RunConfig) -> Vec<VialIdentity> {
    let mut items = Vec::new();

    items.push(VialIdentity::new(
        with_note("Blanco", &config.blank_label_suffix),
        VialType::Blank,
    ));
    items.push(VialIdentity::new(
        with_note("Wash", &config.wash_label_suffix),
        VialType::Blank,
    ));

    let std_variants: &[&str] = if config.standard.duplicated {
        &["/A", "/B"]
    } else {
        &[""]
    };

    if config.standard.duplicated {
        items.push(VialIdentity::new("STD A", VialType::Std));
        items.push(VialIdentity::new("STD B", VialType::Std));
    } else {
        items.push(VialIdentity::new("STD", VialType::Std));
    }

    let mut manual: Vec<&str> = Vec::new();
    for label in config.standard_dilutions.iter().filter_map(|d| d.manual()) {
        if !manual.contains(&label) {
            manual.push(label);
        }
    }
    for label in manual {
        for suffix in std_variants {
            items.push(VialIdentity::new(format!("{label}{suffix}"), VialType::Std));
        }
    }

    let variants = config.sample_options.variants();
    for index in 0..config.lots.len() {
        let name = config.lot_name(index);
        for suffix in &variants {
            items.push(VialIdentity::sample(format!("{name}{suffix}"), index));
        }
    }

    if config.placebo.included {
        items.push(VialIdentity::new("Placebo", VialType::Placebo));
    }

    for reagent in config.reagent_names() {
        items.push(VialIdentity::new(reagent, VialType::Reagent));
    }

    dedup_by_id(items)
}

/// `"{base} ({note})"`, or just `base` when the note is blank.
fn with_note(base: &str, note: &str) -> String {
    match non_blank(note) {
        Some(n) => format!("{base} ({n})"),
        None => base.to_string(),
    }
}

fn dedup_by_id(items: Vec<VialIdentity>) -> Vec<VialIdentity> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|it| seen.insert(it.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lot, ManualDilution};
    use crate::parse::NumberText;

    fn ids(config: &RunConfig) -> Vec<String> {
        build_vial_identities(config)
            .into_iter()
            .map(|v| v.id)
            .collect()
    }

    #[test]
    fn default_run() {
        let cfg = RunConfig::default();
        assert_eq!(ids(&cfg), vec!["Blanco", "Wash", "STD", "Lote1/A", "Lote1/B"]);
    }

    #[test]
    fn notes_on_blank_and_wash() {
        let cfg = RunConfig {
            blank_label_suffix: " MeOH ".into(),
            wash_label_suffix: "ACN".into(),
            lots: vec![],
            ..Default::default()
        };
        assert_eq!(ids(&cfg), vec!["Blanco (MeOH)", "Wash (ACN)", "STD"]);
    }

    #[test]
    fn duplicated_standard_with_manual_dilutions() {
        let mut cfg = RunConfig {
            lots: vec![],
            ..Default::default()
        };
        cfg.standard.duplicated = true;
        cfg.standard_dilutions = vec![
            ManualDilution {
                manual_label: "D1".into(),
                ..Default::default()
            },
            ManualDilution {
                pipette_volume: "1".into(),
                final_volume: "10".into(),
                ..Default::default()
            },
            ManualDilution {
                manual_label: " D1 ".into(),
                ..Default::default()
            },
        ];
        assert_eq!(
            ids(&cfg),
            vec!["Blanco", "Wash", "STD A", "STD B", "D1/A", "D1/B"]
        );
    }

    #[test]
    fn uniformity_numbers_units() {
        let mut cfg = RunConfig {
            lots: vec![Lot::named("L1")],
            ..Default::default()
        };
        cfg.sample_options.uniformity = true;
        cfg.sample_options.uniformity_count = NumberText::from("3");
        let list = build_vial_identities(&cfg);
        let samples: Vec<_> = list
            .iter()
            .filter(|v| v.vial_type == VialType::Sample)
            .map(|v| (v.id.as_str(), v.lot_index))
            .collect();
        assert_eq!(
            samples,
            vec![("L1/1", Some(0)), ("L1/2", Some(0)), ("L1/3", Some(0))]
        );
    }

    #[test]
    fn placebo_and_reagents_close_the_list() {
        let mut cfg = RunConfig {
            lots: vec![Lot::named("L1")],
            reagents: vec!["NaOH".into(), "  ".into(), "HCl".into()],
            ..Default::default()
        };
        cfg.sample_options.duplicated = false;
        cfg.placebo.included = true;
        assert_eq!(
            ids(&cfg),
            vec!["Blanco", "Wash", "STD", "L1", "Placebo", "NaOH", "HCl"]
        );
    }

    #[test]
    fn first_occurrence_wins() {
        let mut cfg = RunConfig {
            lots: vec![Lot::named("Placebo"), Lot::named("Placebo")],
            reagents: vec!["STD".into()],
            ..Default::default()
        };
        cfg.sample_options.duplicated = false;
        cfg.placebo.included = true;
        let list = build_vial_identities(&cfg);
        let names: Vec<_> = list.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(names, vec!["Blanco", "Wash", "STD", "Placebo"]);
        assert_eq!(list[3].vial_type, VialType::Sample);
        assert_eq!(list[3].lot_index, Some(0));
    }
}
