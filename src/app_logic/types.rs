/*
 * Events flowing into the application logic and commands flowing out of
 * it. The logic itself is synchronous; anything network-bound is expressed
 * as a command for the gateway executor, and the outcome returns later as
 * another event.
 */
use crate::core::{DirEntry, MessageSeverity, TreeItemDescriptor};
use crate::gateway::{DeliveryError, ListingError, SubmitReceipt};

#[derive(Debug)]
pub enum AppEvent {
    SiteSelected {
        name: String,
    },
    RootPathSubmitted {
        input: String,
    },
    NodeExpansionRequested {
        node_id: String,
    },
    NodeCheckToggled {
        node_id: String,
    },
    SubmitRequested,
    /*
     * A listing fetch finished. `epoch` is the session generation the
     * fetch was started under; answers from a superseded generation are
     * discarded.
     */
    ListingLoaded {
        epoch: u64,
        node_id: String,
        result: Result<Vec<DirEntry>, ListingError>,
    },
    SubmissionCompleted {
        result: Result<SubmitReceipt, DeliveryError>,
    },
}

#[derive(Debug)]
pub enum Command {
    FetchListing {
        epoch: u64,
        node_id: String,
        endpoint: String,
    },
    SubmitSelection {
        endpoint: String,
        selected_ids: Vec<String>,
        root_path: String,
    },
    // Replace the displayed tree with a fresh snapshot.
    PopulateTree {
        items: Vec<TreeItemDescriptor>,
    },
    ShowNotice {
        severity: MessageSeverity,
        text: String,
    },
    SetInteractionEnabled {
        enabled: bool,
    },
}
