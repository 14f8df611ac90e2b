//! Policy name comparison

use crate::PolicyListEntry;

/// Key under which policy names are compared.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Entries whose name equals `name` ignoring case.
///
/// Exact match on the trimmed, lower-cased names, no substring or fuzzy
/// matching.
pub fn matching_entries<'a>(
    entries: &'a [PolicyListEntry],
    name: &str,
) -> Vec<&'a PolicyListEntry> {
    let wanted = name_key(name);
    entries
        .iter()
        .filter(|entry| name_key(&entry.name) == wanted)
        .collect()
}
