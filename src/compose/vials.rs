//! Vial multipliers.
//!
//! The multiplier table is keyed by vial identity and survives across
//! generations. Before each expansion it is reconciled with the current
//! identity list so its keys are exactly the identities of this run.

use std::collections::BTreeMap;

use crate::model::VialIdentity;
use crate::parse::NumberText;

/// Reconcile `previous` with `identities`.
///
/// Known identities keep their count (text is parsed leniently, unparsable
/// text becomes 0). New identities get their type default: 0 for reagents,
/// 1 for everything else. Identities no longer present are dropped.
pub fn reconcile(
    identities: &[VialIdentity],
    previous: &BTreeMap<String, NumberText>,
) -> BTreeMap<String, NumberText> {
    identities
        .iter()
        .map(|identity| {
            let count = match previous.get(&identity.id) {
                Some(existing) => existing.to_int(0),
                None => identity.default_multiplier(),
            };
            (identity.id.clone(), NumberText::Int(count))
        })
        .collect()
}

/// How many vial labels to print for `id`. Negative counts print none.
pub fn copies(multipliers: &BTreeMap<String, NumberText>, id: &str) -> usize {
    multipliers
        .get(id)
        .map(|m| m.to_int(0).max(0) as usize)
        .unwrap_or(0)
}
