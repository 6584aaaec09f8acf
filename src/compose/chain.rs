//! Dilution chain text.
//!
//! Two different accumulation rules are in use on the bench:
//!
//! - Standard dilutions grow one running chain, `1:10→2:20→…`, built only
//!   from steps without a manual label. Steps missing a volume are skipped.
//! - Sample dilutions accumulate per lot, `1:10-->2:20-->…`. A step that
//!   can't be resolved for a lot blocks that depth and every deeper one.

use crate::model::{volume_pair, ManualDilution, SampleDilution};

/// Separator between steps of the standard chain.
pub const STD_CHAIN_SEP: &str = "→";

/// Separator between steps of a sample chain.
pub const SAMPLE_CHAIN_SEP: &str = "-->";

/// Every state of the running standard chain, one per qualifying step.
pub fn standard_chains(dilutions: &[ManualDilution]) -> Vec<String> {
    let mut chains: Vec<String> = Vec::new();
    for step in dilutions.iter().filter(|d| d.manual().is_none()) {
        let Some(pair) = volume_pair(&step.pipette_volume, &step.final_volume) else {
            continue;
        };
        let chain = match chains.last() {
            Some(prev) => format!("{prev}{STD_CHAIN_SEP}{pair}"),
            None => pair,
        };
        chains.push(chain);
    }
    chains
}

/// The chain for lot `lot` at every depth, or `None` at depths that are
/// blocked by an unresolved step.
pub fn sample_chains(dilutions: &[SampleDilution], lot: usize) -> Vec<Option<String>> {
    let mut accumulated: Vec<String> = Vec::with_capacity(dilutions.len());
    let mut blocked = false;
    let mut out = Vec::with_capacity(dilutions.len());
    for step in dilutions {
        match step.step_text(lot) {
            Some(text) => accumulated.push(text),
            None => blocked = true,
        }
        if blocked {
            out.push(None);
        } else {
            out.push(Some(accumulated.join(SAMPLE_CHAIN_SEP)));
        }
    }
    out
}
