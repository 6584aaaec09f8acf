//! # Configuration Snapshots
//!
//! The form session saves and restores its state as one flat JSON object
//! with the field names the lab has been using for years (`dup_patron`,
//! `diluciones_muestra`, `viales_multiplicadores`, …). This module reads such
//! a snapshot into a [`RunConfig`] and writes one back.
//!
//! Reading is strict about shape and lenient about content: a list where a
//! list belongs may hold blank names or nulls, but a string where a list
//! belongs is rejected with the offending field named. Nothing is returned
//! until the whole snapshot has been read.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::color::ColorMap;
use crate::error::LabelError;
use crate::model::*;
use crate::parse::NumberText;

/// Keys that only appear in snapshots, never in the native format.
const SNAPSHOT_KEYS: [&str; 8] = [
    "dup_patron",
    "dup_muestra",
    "lotes",
    "diluciones_std",
    "diluciones_muestra",
    "reactivos",
    "viales_multiplicadores",
    "start_label",
];

/// Whether `value` looks like a snapshot rather than a native config.
pub fn is_snapshot(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| SNAPSHOT_KEYS.iter().any(|k| map.contains_key(*k)))
}

/// Parse a snapshot from JSON text.
pub fn import_str(json: &str) -> Result<RunConfig, LabelError> {
    let value: Value = serde_json::from_str(json)?;
    import(&value)
}

/// Read a snapshot. Missing keys keep their defaults; unknown keys are
/// ignored.
pub fn import(value: &Value) -> Result<RunConfig, LabelError> {
    let map = value
        .as_object()
        .ok_or_else(|| LabelError::shape("(root)", "an object"))?;
    let r = Reader { map };
    let defaults = RunConfig::default();

    let standard = StandardPrep {
        duplicated: r.flag("dup_patron", defaults.standard.duplicated)?,
        weight: r.text("peso_patron")?,
        final_volume: r.text("vol_patron")?,
    };

    let sample_options = SampleOptions {
        duplicated: r.flag("dup_muestra", defaults.sample_options.duplicated)?,
        uniformity: r.flag("uniformidad", defaults.sample_options.uniformity)?,
        uniformity_count: r
            .number("num_uniform_samples")?
            .unwrap_or(defaults.sample_options.uniformity_count),
        weight: r.text("muestra_peso")?,
        final_volume: r.text("muestra_vol")?,
    };

    let lots = match r.list("lotes")? {
        Some(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| read_lot(item, &format!("lotes[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        None => defaults.lots,
    };

    let standard_dilutions = r.manual_dilutions("diluciones_std")?;

    let sample_dilutions = match r.list("diluciones_muestra")? {
        Some(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| read_sample_dilution(item, &format!("diluciones_muestra[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let placebo = Placebo {
        included: r.flag("incluir_placebo", false)?,
        weight: r.text("placebo_peso")?,
        final_volume: r.text("placebo_vol")?,
        dilutions: r.manual_dilutions("diluciones_placebo")?,
    };

    let reagents = match r.list("reactivos")? {
        Some(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| read_reagent(item, &format!("reactivos[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let mut vial_multipliers = BTreeMap::new();
    if let Some(entries) = r.object("viales_multiplicadores")? {
        for (id, v) in entries {
            let field = format!("viales_multiplicadores.{id}");
            let n = as_number(v, &field)?.unwrap_or_default();
            vial_multipliers.insert(id.clone(), n);
        }
    }

    let mut colors = ColorMap::default();
    if let Some(entries) = r.object("lote_color_map")? {
        for (key, v) in entries {
            let field = format!("lote_color_map.{key}");
            let index: usize = key
                .trim()
                .parse()
                .map_err(|_| LabelError::shape(field.clone(), "keyed by lot index"))?;
            colors.lot_colors.insert(index, as_text(v, &field)?);
        }
    }
    if let Some(entries) = r.object("id_color_map")? {
        for (id, v) in entries {
            let color = as_text(v, &format!("id_color_map.{id}"))?;
            colors.vial_colors.insert(id.clone(), color);
        }
    }

    let lot_summary = if map.contains_key("lote_general") {
        r.text("lote_general")?
    } else {
        r.text("lote")?
    };

    let sheet = SheetInfo {
        product: r.text("nombre_prod")?,
        determination: r.text("determinacion")?,
        lot: lot_summary,
        analyst: r.text("analista")?,
        date: r.text("fecha")?,
    };

    Ok(RunConfig {
        standard,
        standard_dilutions,
        lots,
        sample_options,
        sample_dilutions,
        placebo,
        reagents,
        include_vials: r.flag("incluir_viales", defaults.include_vials)?,
        vial_multipliers,
        blank_label_suffix: r.text("texto_blanco")?,
        wash_label_suffix: r.text("texto_wash")?,
        start_cell: r.number("start_label")?.unwrap_or(defaults.start_cell),
        colors,
        sheet,
        show_color_swatch: r.flag("show_color_square", defaults.show_color_swatch)?,
    })
}

/// Write `config` as a snapshot.
pub fn export(config: &RunConfig) -> Value {
    let manual = |steps: &[ManualDilution]| -> Vec<Value> {
        steps
            .iter()
            .map(|d| {
                json!({
                    "v_pip": d.pipette_volume,
                    "v_final": d.final_volume,
                    "id_text": d.manual_label,
                })
            })
            .collect()
    };

    let lot_colors: Map<String, Value> = config
        .colors
        .lot_colors
        .iter()
        .map(|(i, c)| (i.to_string(), Value::from(c.as_str())))
        .collect();

    json!({
        "show_color_square": config.show_color_swatch,
        "incluir_viales": config.include_vials,
        "dup_patron": config.standard.duplicated,
        "peso_patron": config.standard.weight,
        "vol_patron": config.standard.final_volume,
        "dup_muestra": config.sample_options.duplicated,
        "uniformidad": config.sample_options.uniformity,
        "num_uniform_samples": config.sample_options.uniformity_count,
        "muestra_peso": config.sample_options.weight,
        "muestra_vol": config.sample_options.final_volume,
        "lotes": config.lots.iter().map(|l| json!({ "name": l.name })).collect::<Vec<_>>(),
        "lote_color_map": lot_colors,
        "id_color_map": config.colors.vial_colors,
        "diluciones_std": manual(&config.standard_dilutions),
        "diluciones_muestra": config.sample_dilutions.iter().map(|d| json!({
            "v_pip": d.pipette_volume,
            "v_final": d.final_volume,
            "per_lote_ids": d.per_lot_override,
        })).collect::<Vec<_>>(),
        "diluciones_placebo": manual(&config.placebo.dilutions),
        "incluir_placebo": config.placebo.included,
        "placebo_peso": config.placebo.weight,
        "placebo_vol": config.placebo.final_volume,
        "reactivos": config.reagents,
        "viales_multiplicadores": config.vial_multipliers,
        "texto_blanco": config.blank_label_suffix,
        "texto_wash": config.wash_label_suffix,
        "nombre_prod": config.sheet.product,
        "lote_general": config.sheet.lot,
        "determinacion": config.sheet.determination,
        "analista": config.sheet.analyst,
        "fecha": config.sheet.date,
        "start_label": config.start_cell,
    })
}

/// Typed access to the top-level snapshot keys.
struct Reader<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Reader<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, LabelError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(LabelError::shape(key, "true or false")),
        }
    }

    fn text(&self, key: &str) -> Result<String, LabelError> {
        match self.get(key) {
            None => Ok(String::new()),
            Some(v) => as_text(v, key),
        }
    }

    fn number(&self, key: &str) -> Result<Option<NumberText>, LabelError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => as_number(v, key),
        }
    }

    fn list(&self, key: &str) -> Result<Option<&'a Vec<Value>>, LabelError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(LabelError::shape(key, "a list")),
        }
    }

    fn object(&self, key: &str) -> Result<Option<&'a Map<String, Value>>, LabelError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(LabelError::shape(key, "an object")),
        }
    }

    fn manual_dilutions(&self, key: &str) -> Result<Vec<ManualDilution>, LabelError> {
        let Some(items) = self.list(key)? else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let field = format!("{key}[{i}]");
                let step = as_object(item, &field)?;
                Ok(ManualDilution {
                    pipette_volume: member_text(step, &field, "v_pip")?,
                    final_volume: member_text(step, &field, "v_final")?,
                    manual_label: member_text(step, &field, "id_text")?,
                })
            })
            .collect()
    }
}

fn read_lot(item: &Value, field: &str) -> Result<Lot, LabelError> {
    match item {
        Value::Object(lot) => Ok(Lot {
            name: member_text(lot, field, "name")?,
        }),
        Value::Null => Ok(Lot::default()),
        other => Ok(Lot {
            name: as_text(other, field)?,
        }),
    }
}

/// A reagent row is either its bare name or the form's
/// `{nombre, multiplicador, color}` object.
fn read_reagent(item: &Value, field: &str) -> Result<String, LabelError> {
    match item {
        Value::Object(row) => member_text(row, field, "nombre"),
        other => as_text(other, field),
    }
}

fn read_sample_dilution(item: &Value, field: &str) -> Result<SampleDilution, LabelError> {
    let step = as_object(item, field)?;
    let per_lot_override = match step.get("per_lote_ids") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(ids)) => ids
            .iter()
            .enumerate()
            .map(|(i, id)| as_text(id, &format!("{field}.per_lote_ids[{i}]")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(LabelError::shape(format!("{field}.per_lote_ids"), "a list")),
    };
    Ok(SampleDilution {
        pipette_volume: member_text(step, field, "v_pip")?,
        final_volume: member_text(step, field, "v_final")?,
        per_lot_override,
    })
}

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, LabelError> {
    value
        .as_object()
        .ok_or_else(|| LabelError::shape(field, "an object"))
}

fn member_text(obj: &Map<String, Value>, field: &str, key: &str) -> Result<String, LabelError> {
    match obj.get(key) {
        None => Ok(String::new()),
        Some(v) => as_text(v, &format!("{field}.{key}")),
    }
}

/// Text, numbers written as text, or empty for null.
fn as_text(value: &Value, field: &str) -> Result<String, LabelError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(LabelError::shape(field, "text")),
    }
}

fn as_number(value: &Value, field: &str) -> Result<Option<NumberText>, LabelError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(match n.as_i64() {
            Some(i) => NumberText::Int(i),
            None => NumberText::Float(n.as_f64().unwrap_or(0.0)),
        })),
        Value::String(s) => Ok(Some(NumberText::Text(s.clone()))),
        _ => Err(LabelError::shape(field, "a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_the_session_fields() {
        let cfg = import(&json!({
            "dup_patron": true,
            "peso_patron": "10",
            "vol_patron": 100,
            "dup_muestra": false,
            "num_uniform_samples": "3",
            "lotes": [{ "uid": "l_1", "name": "L1" }, "L2", null],
            "diluciones_std": [{ "v_pip": "1", "v_final": "10", "id_text": "" }],
            "diluciones_muestra": [{ "v_pip": "2", "v_final": "20", "per_lote_ids": [null, "x"] }],
            "reactivos": ["NaOH", null],
            "viales_multiplicadores": { "L1": 2, "L2": "3", "NaOH": null },
            "lote_color_map": { "0": "#2ca02c" },
            "lote_general": "L1, L2",
            "start_label": 17,
        }))
        .unwrap();

        assert!(cfg.standard.duplicated);
        assert_eq!(cfg.standard.final_volume, "100");
        assert!(!cfg.sample_options.duplicated);
        assert_eq!(cfg.sample_options.uniformity_count.to_int(1), 3);
        assert_eq!(cfg.lots, vec![Lot::named("L1"), Lot::named("L2"), Lot::default()]);
        assert_eq!(cfg.standard_dilutions[0].pipette_volume, "1");
        assert_eq!(cfg.sample_dilutions[0].per_lot_override, vec!["", "x"]);
        assert_eq!(cfg.reagents, vec!["NaOH", ""]);
        assert_eq!(cfg.vial_multipliers["L1"], NumberText::Int(2));
        assert_eq!(cfg.vial_multipliers["L2"], NumberText::from("3"));
        assert_eq!(cfg.vial_multipliers["NaOH"], NumberText::default());
        assert_eq!(cfg.colors.lot_colors[&0], "#2ca02c");
        assert_eq!(cfg.sheet.lot, "L1, L2");
        assert_eq!(cfg.start_cell.to_int(1), 17);
        assert!(cfg.include_vials);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let cfg = import(&json!({ "dup_patron": false })).unwrap();
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn wrong_shape_names_the_field() {
        let err = import(&json!({ "lotes": "L1" })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: field `lotes` must be a list"
        );

        let err = import(&json!({
            "diluciones_muestra": [{ "per_lote_ids": [] }, { "per_lote_ids": "x" }]
        }))
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("`diluciones_muestra[1].per_lote_ids`"));

        let err = import(&json!({ "dup_muestra": "yes" })).unwrap_err();
        assert!(matches!(err, LabelError::Shape { .. }));

        let err = import(&json!([])).unwrap_err();
        assert!(err.to_string().contains("(root)"));
    }

    #[test]
    fn reagent_rows_from_the_form() {
        let cfg = import_str(
            r##"{
                "dup_patron": false,
                "reactivos": [
                    { "nombre": "NaOH", "multiplicador": 2, "color": "#f39c12" },
                    { "multiplicador": 0 },
                    "HCl"
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(cfg.reagents, vec!["NaOH", "", "HCl"]);

        let err = import(&json!({ "reactivos": [{ "nombre": ["NaOH"] }] })).unwrap_err();
        assert!(err.to_string().contains("`reactivos[0].nombre`"));

        let err = import(&json!({ "reactivos": [true] })).unwrap_err();
        assert!(err.to_string().contains("`reactivos[0]`"));
    }

    #[test]
    fn lot_color_keys_must_be_indices() {
        let err = import(&json!({ "lote_color_map": { "first": "#000000" } })).unwrap_err();
        assert!(err.to_string().contains("lote_color_map.first"));
    }

    #[test]
    fn export_then_import_is_stable() {
        let mut cfg = RunConfig::default();
        cfg.lots = vec![Lot::named("A"), Lot::named("B")];
        cfg.standard.duplicated = true;
        cfg.sample_dilutions = vec![SampleDilution {
            pipette_volume: "1".into(),
            final_volume: "10".into(),
            per_lot_override: vec!["".into(), "B-1".into()],
        }];
        cfg.placebo.included = true;
        cfg.colors.lot_colors.insert(1, "#9467bd".into());
        cfg.vial_multipliers.insert("A/A".into(), NumberText::Int(3));
        cfg.sheet.product = "Prod".into();
        cfg.start_cell = NumberText::Int(42);

        let back = import(&export(&cfg)).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn detects_snapshots() {
        assert!(is_snapshot(&json!({ "dup_patron": true })));
        assert!(!is_snapshot(&json!({ "standard": { "duplicated": true } })));
        assert!(!is_snapshot(&json!("text")));
    }
}
