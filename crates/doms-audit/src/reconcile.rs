use std::collections::BTreeSet;

use crate::aggregate::DomsObject;

/// Outcome of comparing found objects against the required-files list.
///
/// All sets are ordered, so rendering is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Filenames of the objects that passed the state filter.
    pub found: BTreeSet<String>,
    /// Required but not found.
    pub missing: BTreeSet<String>,
    /// Found but not required.
    pub extra: BTreeSet<String>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Filenames of the objects whose state equals `required_state` exactly, or of
/// every object when no filter is given.
pub fn found_files(objects: &[DomsObject], required_state: Option<&str>) -> BTreeSet<String> {
    objects
        .iter()
        .filter(|o| required_state.map_or(true, |s| o.state == s))
        .map(|o| o.filename.clone())
        .collect()
}

/// Set-difference reconciliation:
/// - `missing = required - found`
/// - `extra = found - required`
///
/// Order of `objects` does not matter, and two objects sharing a filename
/// count once.
pub fn reconcile(
    objects: &[DomsObject],
    required_state: Option<&str>,
    required_files: &BTreeSet<String>,
) -> ReconcileReport {
    let found = found_files(objects, required_state);

    let missing = required_files.difference(&found).cloned().collect();
    let extra = found.difference(required_files).cloned().collect();

    ReconcileReport {
        found,
        missing,
        extra,
    }
}
