/*
 * Holds the partially-materialized tree for one root-path session. Each node
 * is fetched at most once; children are attached lazily when the host expands
 * a directory. The session also owns the bookkeeping that keeps asynchronous
 * listing completions honest:
 *
 * - `epoch` tags every outstanding fetch with the session generation it was
 *   issued for; completions from a superseded session are discarded.
 * - `pending_listings` coalesces expansion requests so a node with a fetch
 *   in flight is never fetched a second time.
 *
 * A failed listing marks the node loaded-empty rather than leaving it
 * perpetually unloaded, so a broken node cannot wedge the host in a retry
 * loop; reloading the root starts over.
 */
use std::collections::HashSet;

use super::models::{CheckState, DirEntry, RemoteNode, TreeItemDescriptor};
use super::path_utils;
use super::selection::SelectionState;

// Outcome of asking the session to expand a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionStart {
    /// A fetch is required; the command must carry this epoch.
    FetchNeeded { epoch: u64 },
    /// Children already attached (including the loaded-empty case).
    AlreadyLoaded,
    /// A fetch for this node is already outstanding; coalesce.
    AlreadyPending,
    /// The id does not belong to the current tree.
    UnknownNode,
}

// Outcome of delivering a listing completion to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingApplied {
    /// Children attached in gateway order.
    Attached { child_count: usize },
    /// The fetch failed; the node was marked loaded-empty.
    MarkedEmptyAfterError,
    /// Stale epoch or unknown node id; the tree was not touched.
    Stale,
}

#[derive(Debug, Default)]
pub struct RootSession {
    root_path: String,
    root: Option<RemoteNode>,
    epoch: u64,
    pending_listings: HashSet<String>,
}

impl RootSession {
    pub fn new() -> Self {
        RootSession::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn has_tree(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_root_id(&self, node_id: &str) -> bool {
        self.root.as_ref().is_some_and(|root| root.id == node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        Self::find_node_ref(self.root.as_ref(), node_id).is_some()
    }

    /*
     * Begins a new session for a user-entered root path. The previous tree
     * and all of its pending fetches are discarded wholesale, the epoch is
     * bumped so their eventual completions are ignored, and a synthetic root
     * node is installed with its children fetch already registered as
     * pending. Returns the normalized root path, which is also the root
     * node's id and the path the initial listing command must carry.
     */
    pub fn begin_root_load(&mut self, input: &str) -> String {
        let normalized = path_utils::normalize_root_path(input);
        self.epoch += 1;
        self.pending_listings.clear();
        self.root_path = normalized.clone();
        self.root = Some(RemoteNode::new_branch(
            normalized.clone(),
            normalized.clone(),
        ));
        self.pending_listings.insert(normalized.clone());
        log::info!(
            "Session: New root session for '{normalized}' (epoch {}).",
            self.epoch
        );
        normalized
    }

    /*
     * Discards the session outright, used when the backend site changes.
     * The tree is cleared immediately; the epoch bump makes any listing
     * completion still in flight stale.
     */
    pub fn clear(&mut self) {
        self.epoch += 1;
        self.root = None;
        self.root_path.clear();
        self.pending_listings.clear();
        log::info!("Session: Cleared (epoch {}).", self.epoch);
    }

    /*
     * Decides whether expanding `node_id` requires a gateway fetch. Loaded
     * nodes (empty or not) and nodes with a fetch already outstanding are
     * left alone; otherwise the fetch is registered as pending and the
     * caller must issue exactly one listing command tagged with the
     * returned epoch.
     */
    pub fn begin_expansion(&mut self, node_id: &str) -> ExpansionStart {
        let Some(node) = Self::find_node_ref(self.root.as_ref(), node_id) else {
            log::warn!("Session: Expansion requested for unknown node '{node_id}'.");
            return ExpansionStart::UnknownNode;
        };
        if node.is_leaf || node.children_loaded() {
            return ExpansionStart::AlreadyLoaded;
        }
        if self.pending_listings.contains(node_id) {
            log::debug!("Session: Coalescing duplicate expansion of '{node_id}'.");
            return ExpansionStart::AlreadyPending;
        }
        self.pending_listings.insert(node_id.to_string());
        ExpansionStart::FetchNeeded { epoch: self.epoch }
    }

    /*
     * Applies a listing completion. `entries` is `Some` for a successful
     * fetch and `None` when the gateway reported an error, in which case the
     * node is marked loaded-empty. Completions whose epoch does not match
     * the current session, or whose node id no longer exists in the tree,
     * are dropped without touching anything.
     */
    pub fn apply_listing(
        &mut self,
        node_id: &str,
        epoch: u64,
        entries: Option<Vec<DirEntry>>,
    ) -> ListingApplied {
        if epoch != self.epoch {
            log::info!(
                "Session: Ignoring stale listing for '{node_id}' (epoch {epoch}, current {}).",
                self.epoch
            );
            return ListingApplied::Stale;
        }
        self.pending_listings.remove(node_id);

        let Some(node) = Self::find_node_mut(self.root.as_mut(), node_id) else {
            log::warn!("Session: Listing completion for unknown node '{node_id}' dropped.");
            return ListingApplied::Stale;
        };

        match entries {
            Some(entries) => {
                let children: Vec<RemoteNode> = entries
                    .into_iter()
                    .map(|entry| {
                        let child_id = path_utils::join_child_id(node_id, &entry.name);
                        if entry.is_dir {
                            RemoteNode::new_branch(child_id, entry.name)
                        } else {
                            RemoteNode::new_leaf(child_id, entry.name)
                        }
                    })
                    .collect();
                let child_count = children.len();
                node.children = Some(children);
                log::debug!("Session: Attached {child_count} children under '{node_id}'.");
                ListingApplied::Attached { child_count }
            }
            None => {
                node.children = Some(Vec::new());
                log::warn!("Session: Listing of '{node_id}' failed; node marked loaded-empty.");
                ListingApplied::MarkedEmptyAfterError
            }
        }
    }

    /*
     * Builds the descriptor tree handed to the host shell, combining the
     * materialized nodes with the current selection's check states. The
     * synthetic root is rendered with its full path and is not selectable.
     */
    pub fn describe(&self, selection: &SelectionState) -> Vec<TreeItemDescriptor> {
        match &self.root {
            Some(root) => vec![Self::describe_node(root, false, selection)],
            None => Vec::new(),
        }
    }

    fn describe_node(
        node: &RemoteNode,
        selectable: bool,
        selection: &SelectionState,
    ) -> TreeItemDescriptor {
        let children = node
            .children
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|child| Self::describe_node(child, true, selection))
            .collect();
        TreeItemDescriptor {
            id: node.id.clone(),
            text: node.name.clone(),
            is_folder: !node.is_leaf,
            category: node.category,
            state: if selectable && selection.contains(&node.id) {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            },
            selectable,
            children_loaded: node.children_loaded(),
            children,
        }
    }

    fn find_node_ref<'a>(node: Option<&'a RemoteNode>, node_id: &str) -> Option<&'a RemoteNode> {
        let node = node?;
        if node.id == node_id {
            return Some(node);
        }
        node.children
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find_map(|child| Self::find_node_ref(Some(child), node_id))
    }

    fn find_node_mut<'a>(
        node: Option<&'a mut RemoteNode>,
        node_id: &str,
    ) -> Option<&'a mut RemoteNode> {
        let node = node?;
        if node.id == node_id {
            return Some(node);
        }
        node.children
            .as_deref_mut()
            .unwrap_or(&mut [])
            .iter_mut()
            .find_map(|child| Self::find_node_mut(Some(child), node_id))
    }
}
