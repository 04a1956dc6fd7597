//! Output conflict detection.
//!
//! Two instructions writing the same output path (a virtual route landing on
//! a directory that already has an index, for example) are reported as
//! warnings. No instruction is dropped.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::BuildInstruction;
use crate::core::display_uri;

/// Warnings for every output path claimed by more than one instruction.
///
/// Conflicts are reported in the order their paths first appear.
pub fn detect_output_conflicts(instructions: &[BuildInstruction]) -> Vec<BuildInstruction> {
    let mut order: Vec<PathBuf> = Vec::new();
    let mut producers: FxHashMap<PathBuf, Vec<&'static str>> = FxHashMap::default();

    for instruction in instructions {
        let Some(destination) = instruction.destination() else {
            continue;
        };
        let entry = producers.entry(destination.to_path_buf()).or_default();
        if entry.is_empty() {
            order.push(destination.to_path_buf());
        }
        entry.push(instruction.kind());
    }

    order
        .into_iter()
        .filter_map(|path| {
            let kinds = &producers[&path];
            (kinds.len() > 1).then(|| {
                BuildInstruction::warning(format!(
                    "{} is produced by {} instructions ({}); the executor will overwrite it",
                    display_uri(&path),
                    kinds.len(),
                    kinds.join(", ")
                ))
            })
        })
        .collect()
}
