/*
 * Tracks the set of checked node ids. Selection is a flat id set with
 * cascade-by-contract semantics: a directory id in the set denotes its entire
 * subtree, loaded or not, and the backend interprets it that way. The client
 * therefore never enumerates a subtree just to select it. The set is cleared
 * whenever the session it belongs to is replaced, so no id outlives its tree.
 */
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SelectionState {
    checked_ids: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        SelectionState {
            checked_ids: HashSet::new(),
        }
    }

    /// Flips membership of `node_id`. Returns true when the id is now checked.
    pub fn toggle(&mut self, node_id: &str) -> bool {
        if self.checked_ids.remove(node_id) {
            log::debug!("Selection: Unchecked '{node_id}'.");
            false
        } else {
            self.checked_ids.insert(node_id.to_string());
            log::debug!("Selection: Checked '{node_id}'.");
            true
        }
    }

    pub fn clear(&mut self) {
        if !self.checked_ids.is_empty() {
            log::debug!("Selection: Cleared {} checked ids.", self.checked_ids.len());
        }
        self.checked_ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.checked_ids.is_empty()
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.checked_ids.contains(node_id)
    }

    /*
     * Returns the checked ids as a sorted vector. Insertion order carries no
     * meaning, so the ids are sorted for a deterministic outbound request.
     */
    pub fn checked_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.checked_ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}
