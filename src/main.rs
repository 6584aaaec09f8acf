//! # Labelsheet CLI
//!
//! Usage:
//!   labelsheet run.json -o plan.json
//!   cat run.json | labelsheet --save-config next.json
//!   labelsheet --example > run.json

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use labelsheet::{validate, LabelError};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        println!("{}", example_snapshot_json());
        return;
    }

    match run(&args) {
        Ok(()) => {}
        Err(LabelError::Invalid(problems)) => {
            for problem in &problems {
                eprintln!("⚠ {}", problem);
            }
            process::exit(1);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), LabelError> {
    let input_path = args.get(1).filter(|a| !a.starts_with('-'));
    let input = match input_path {
        Some(path) => fs::read_to_string(path).map_err(|source| LabelError::Io {
            path: PathBuf::from(path),
            source,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| LabelError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        }
    };

    let (config, format) = labelsheet::read_config(&input)?;

    let problems = validate::check(&config);
    if !problems.is_empty() {
        return Err(LabelError::Invalid(problems));
    }

    let generation = labelsheet::generate(&config);

    let output_path = flag_value(args, "-o")
        .unwrap_or_else(|| format!("{}.json", config.sheet.file_stem()));
    let plan_json = serde_json::to_string_pretty(&generation)?;
    write_file(&output_path, &plan_json)?;

    let plan = &generation.plan;
    eprintln!(
        "✓ {} labels on {} page(s) written to {}",
        plan.total_placed,
        plan.pages.len(),
        output_path
    );
    eprintln!("  Next run starts at cell {}", plan.next_start_cell);

    if let Some(path) = flag_value(args, "--save-config") {
        let next = labelsheet::write_config(&generation.next, format)?;
        write_file(&path, &next)?;
        eprintln!("✓ Next configuration saved to {}", path);
    }

    Ok(())
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn write_file(path: &str, contents: &str) -> Result<(), LabelError> {
    fs::write(path, contents).map_err(|source| LabelError::Io {
        path: PathBuf::from(path),
        source,
    })
}

fn example_snapshot_json() -> &'static str {
    r##"{
  "show_color_square": true,
  "incluir_viales": true,
  "dup_patron": true,
  "peso_patron": "25",
  "vol_patron": "50",
  "dup_muestra": true,
  "uniformidad": false,
  "num_uniform_samples": "2",
  "muestra_peso": "100",
  "muestra_vol": "100",
  "lotes": [
    { "name": "L2301" },
    { "name": "L2302" }
  ],
  "lote_color_map": {},
  "id_color_map": {},
  "diluciones_std": [
    { "v_pip": "5", "v_final": "50", "id_text": "" },
    { "v_pip": "2", "v_final": "20", "id_text": "" }
  ],
  "diluciones_muestra": [
    { "v_pip": "5", "v_final": "50", "per_lote_ids": ["", ""] }
  ],
  "diluciones_placebo": [
    { "v_pip": "5", "v_final": "50", "id_text": "" }
  ],
  "incluir_placebo": true,
  "placebo_peso": "100",
  "placebo_vol": "100",
  "reactivos": ["Fase móvil", "Buffer pH 3"],
  "viales_multiplicadores": {},
  "texto_blanco": "fase móvil",
  "texto_wash": "",
  "nombre_prod": "Ibuprofeno 400 mg",
  "lote_general": "L2301, L2302",
  "determinacion": "Valoración",
  "analista": "MGR",
  "fecha": "17/10/2026",
  "start_label": 1
}"##
}
