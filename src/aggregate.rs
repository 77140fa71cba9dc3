//! Aggregation: merge per-call-site emissions into one generated compilation
//! unit per proxy type.
//!
//! Grouping is keyed by the target type's identity (full name plus type
//! arguments) through a `BTreeMap`, so output order is a function of the
//! input program and never of classification order. Re-running the pipeline
//! over unchanged input yields byte-identical units.

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{Classified, CreateInvocation, PretendEntrypoint, SetupInvocation, VerifyInvocation};
use crate::emit;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    /// Deterministic output file name, e.g. `IFooPretend.g.pretend`.
    pub hint_name: String,
    pub source: String,
}

pub fn aggregate(classified: &Classified, namespace: &str) -> Vec<GeneratedUnit> {
    let by_target: BTreeMap<String, &PretendEntrypoint> = classified
        .entrypoints
        .iter()
        .map(|e| (e.target.display_name(), e))
        .collect();

    let names = assign_proxy_names(&by_target);

    let mut units = Vec::new();
    for (display, &entry) in &by_target {
        let proxy_name = &names[display];

        let mut setups: Vec<&SetupInvocation> =
            classified.setups.iter().filter(|s| s.target == entry.target).collect();
        setups.sort_by(|a, b| a.location.cmp(&b.location));

        let mut verifies: Vec<&VerifyInvocation> =
            classified.verifies.iter().filter(|v| v.setup.target == entry.target).collect();
        verifies.sort_by(|a, b| a.setup.location.cmp(&b.setup.location));

        let mut creates: Vec<&CreateInvocation> =
            classified.creates.iter().filter(|c| c.target == entry.target).collect();
        creates.sort_by(|a, b| a.location.cmp(&b.location));

        let source = emit::emit_unit(entry, proxy_name, namespace, &setups, &verifies, &creates);
        units.push(GeneratedUnit { hint_name: format!("{proxy_name}.g.pretend"), source });
    }
    units
}

/// Derive a unique proxy name per target. The short form (`IFooPretend`)
/// wins when unambiguous; clashing targets fall back to their flattened
/// full name; a counter settles anything left.
fn assign_proxy_names(by_target: &BTreeMap<String, &PretendEntrypoint>) -> BTreeMap<String, String> {
    let mut taken = BTreeSet::new();
    let mut names = BTreeMap::new();
    for (display, entry) in by_target {
        let short = format!("{}Pretend", entry.target.ident_name());
        let name = if taken.insert(short.clone()) {
            short
        } else {
            let flat: String = display
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { '_' })
                .collect();
            let mut candidate = format!("{flat}Pretend");
            let mut counter = 1;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{flat}Pretend{counter}");
                counter += 1;
            }
            candidate
        };
        names.insert(display.clone(), name);
    }
    names
}
