use std::fmt::Display;

use wasm_bindgen::prelude::*;

use crate::model::RunConfig;

/// Generate labels and a render plan from a native run config object.
///
/// Returns `{ labels, plan, next }`; `next` is the config for the following
/// run on the same sheet.
#[wasm_bindgen]
pub fn generate_plan(config: JsValue) -> Result<JsValue, JsValue> {
    let config: RunConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&error_message("Invalid run config", e)))?;
    let generation = crate::generate(&config);
    serde_wasm_bindgen::to_value(&generation)
        .map_err(|e| JsValue::from_str(&error_message("Serialization error", e)))
}

/// Read a configuration in either JSON format and return it as a native
/// run config object.
#[wasm_bindgen]
pub fn import_config(json: &str) -> Result<JsValue, JsValue> {
    let (config, _) = crate::read_config(json)
        .map_err(|e| JsValue::from_str(&error_message("Cannot import configuration", e)))?;
    serde_wasm_bindgen::to_value(&config)
        .map_err(|e| JsValue::from_str(&error_message("Serialization error", e)))
}

fn error_message(context: &str, e: impl Display) -> String {
    format!("{}: {}", context, e)
}
