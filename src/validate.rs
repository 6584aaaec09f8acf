//! Input checks run before a sheet is generated.
//!
//! The engine itself clamps out-of-range values and never fails; these
//! checks exist so a person filling in the form is told about a mistake
//! instead of getting a silently corrected sheet.

use crate::layout::CELLS_PER_PAGE;
use crate::model::RunConfig;
use crate::parse::NumberText;

/// Most lots a single run may hold.
pub const MAX_LOTS: usize = 40;

/// User-facing messages for every problem found. Empty means the run can be
/// generated.
pub fn check(config: &RunConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.lots.len() > MAX_LOTS {
        errors.push(format!("N° de lotes debe estar entre 0 y {MAX_LOTS}."));
    }

    match exact_int(&config.start_cell) {
        Some(n) if (1..=CELLS_PER_PAGE as i64).contains(&n) => {}
        Some(_) => errors.push(format!(
            "Etiqueta inicial debe estar entre 1 y {CELLS_PER_PAGE}."
        )),
        None => errors.push("Etiqueta inicial inválida.".to_string()),
    }

    errors
}

/// The value as a whole number. Numbers truncate toward zero; text must be
/// an integer literal.
fn exact_int(value: &NumberText) -> Option<i64> {
    match value {
        NumberText::Int(v) => Some(*v),
        NumberText::Float(v) if v.is_finite() => Some(v.trunc() as i64),
        NumberText::Float(_) => None,
        NumberText::Text(s) => s.trim().parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Lot;

    #[test]
    fn default_run_is_valid() {
        assert!(check(&RunConfig::default()).is_empty());
    }

    #[test]
    fn too_many_lots() {
        let cfg = RunConfig {
            lots: vec![Lot::default(); 41],
            ..Default::default()
        };
        assert_eq!(check(&cfg), vec!["N° de lotes debe estar entre 0 y 40."]);

        let cfg = RunConfig {
            lots: vec![],
            ..Default::default()
        };
        assert!(check(&cfg).is_empty());
    }

    #[test]
    fn start_cell_range() {
        for (value, ok) in [
            (NumberText::Int(80), true),
            (NumberText::from(" 12 "), true),
            (NumberText::Float(3.0), true),
            (NumberText::Int(0), false),
            (NumberText::Int(81), false),
        ] {
            let cfg = RunConfig {
                start_cell: value.clone(),
                ..Default::default()
            };
            assert_eq!(check(&cfg).is_empty(), ok, "{value:?}");
        }
    }

    #[test]
    fn unparsable_start_cell() {
        let cfg = RunConfig {
            start_cell: NumberText::from("tres"),
            ..Default::default()
        };
        assert_eq!(check(&cfg), vec!["Etiqueta inicial inválida."]);

        let cfg = RunConfig {
            start_cell: NumberText::from("2.5"),
            ..Default::default()
        };
        assert_eq!(check(&cfg), vec!["Etiqueta inicial inválida."]);
    }

    #[test]
    fn fractional_start_cell_truncates() {
        let cfg = RunConfig {
            start_cell: NumberText::Float(2.5),
            ..Default::default()
        };
        assert!(check(&cfg).is_empty());

        let cfg = RunConfig {
            start_cell: NumberText::Float(80.9),
            ..Default::default()
        };
        assert!(check(&cfg).is_empty());

        let cfg = RunConfig {
            start_cell: NumberText::Float(0.5),
            ..Default::default()
        };
        assert_eq!(check(&cfg), vec!["Etiqueta inicial debe estar entre 1 y 80."]);
    }
}
