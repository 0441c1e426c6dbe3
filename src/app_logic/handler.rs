/*
 * Central application logic. `BrowserLogic` owns the session tree, the
 * selection set, the submission orchestrator and the active site, consumes
 * `AppEvent`s from the host shell and the gateway executor, and emits
 * `Command`s on an internal queue for the host to drain.
 *
 * All network effects are expressed as commands; the logic itself never
 * blocks. Listing completions and submission outcomes come back in as
 * events, which keeps the whole layer deterministic and directly testable.
 */
use crate::app_logic::types::{AppEvent, Command};
use crate::core::{
    AppConfig, ConfigManagerOperations, ExpansionStart, ListingApplied, MessageSeverity,
    RootSession, SelectionState, SubmissionOrchestrator, SubmitRejection, TreeItemDescriptor,
};

use std::collections::VecDeque;
use std::sync::Arc;

pub const APP_NAME: &str = "ShareCourier";

const NOTICE_EMPTY_SELECTION: &str = "Select at least one file or folder first.";
const NOTICE_SUBMISSION_IN_FLIGHT: &str = "A submission is already in progress.";
const NOTICE_LISTING_FAILED: &str = "Could not read the directory listing.";

pub struct BrowserLogic {
    session: RootSession,
    selection: SelectionState,
    orchestrator: SubmissionOrchestrator,
    config: AppConfig,
    active_site: String,
    config_manager: Arc<dyn ConfigManagerOperations>,
    command_queue: VecDeque<Command>,
}

impl BrowserLogic {
    /*
     * Loads configuration and restores the last-used site when it still
     * exists in the site registry, falling back to the configured default.
     */
    pub fn new(config_manager: Arc<dyn ConfigManagerOperations>) -> Self {
        let config = config_manager.load_config(APP_NAME).unwrap_or_else(|e| {
            log::error!("BrowserLogic: Failed to load config, using defaults: {e}");
            AppConfig::default()
        });
        let active_site = config
            .last_site
            .as_deref()
            .filter(|name| config.site_endpoint(name).is_some())
            .unwrap_or(&config.default_site)
            .to_string();
        log::info!("BrowserLogic: Starting with active site '{active_site}'.");
        BrowserLogic {
            session: RootSession::new(),
            selection: SelectionState::new(),
            orchestrator: SubmissionOrchestrator::new(),
            config,
            active_site,
            config_manager,
            command_queue: VecDeque::new(),
        }
    }

    pub fn try_dequeue_command(&mut self) -> Option<Command> {
        self.command_queue.pop_front()
    }

    pub fn active_site(&self) -> &str {
        &self.active_site
    }

    pub fn site_names(&self) -> Vec<&str> {
        self.config.site_names()
    }

    pub fn listing_timeout_secs(&self) -> u64 {
        self.config.listing_timeout_secs
    }

    pub fn submission_timeout_secs(&self) -> u64 {
        self.config.submission_timeout_secs
    }

    // The root path to pre-fill on startup, from the saved session.
    pub fn startup_root_path(&self) -> Option<&str> {
        self.config.last_root_path.as_deref()
    }

    pub fn describe_tree(&self) -> Vec<TreeItemDescriptor> {
        self.session.describe(&self.selection)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        log::trace!("BrowserLogic: Handling event: {event:?}");
        match event {
            AppEvent::SiteSelected { name } => self.handle_site_selected(name),
            AppEvent::RootPathSubmitted { input } => self.handle_root_path_submitted(input),
            AppEvent::NodeExpansionRequested { node_id } => self.handle_expansion(node_id),
            AppEvent::NodeCheckToggled { node_id } => self.handle_check_toggled(node_id),
            AppEvent::SubmitRequested => self.handle_submit_requested(),
            AppEvent::ListingLoaded {
                epoch,
                node_id,
                result,
            } => self.handle_listing_loaded(epoch, node_id, result),
            AppEvent::SubmissionCompleted { result } => self.handle_submission_completed(result),
        }
    }

    fn enqueue(&mut self, command: Command) {
        self.command_queue.push_back(command);
    }

    fn notice(&mut self, severity: MessageSeverity, text: impl Into<String>) {
        self.enqueue(Command::ShowNotice {
            severity,
            text: text.into(),
        });
    }

    fn refresh_tree(&mut self) {
        let items = self.session.describe(&self.selection);
        self.enqueue(Command::PopulateTree { items });
    }

    /*
     * Switching sites discards the session wholesale: the tree, the
     * selection and any terminal submission outcome all belong to the
     * previous backend. Rejected while a submission is in flight so the
     * outcome still has a site to be reported against.
     */
    fn handle_site_selected(&mut self, name: String) {
        if self.orchestrator.is_in_flight() {
            self.notice(MessageSeverity::Warning, NOTICE_SUBMISSION_IN_FLIGHT);
            return;
        }
        if self.config.site_endpoint(&name).is_none() {
            log::warn!("BrowserLogic: Unknown site '{name}' selected.");
            self.notice(MessageSeverity::Warning, format!("Unknown site '{name}'."));
            return;
        }
        if name == self.active_site {
            return;
        }
        log::info!(
            "BrowserLogic: Switching site '{}' -> '{name}'.",
            self.active_site
        );
        self.active_site = name;
        self.session.clear();
        self.selection.clear();
        self.orchestrator.reset();
        self.refresh_tree();
        self.persist_last_session(None);
    }

    fn handle_root_path_submitted(&mut self, input: String) {
        if self.orchestrator.is_in_flight() {
            self.notice(MessageSeverity::Warning, NOTICE_SUBMISSION_IN_FLIGHT);
            return;
        }
        if input.trim().is_empty() {
            self.notice(MessageSeverity::Warning, "Enter a root path first.");
            return;
        }
        let root_id = self.session.begin_root_load(&input);
        self.selection.clear();
        self.orchestrator.reset();
        self.enqueue(Command::FetchListing {
            epoch: self.session.epoch(),
            node_id: root_id.clone(),
            endpoint: self.active_endpoint(),
        });
        self.refresh_tree();
        self.persist_last_session(Some(root_id));
    }

    fn handle_expansion(&mut self, node_id: String) {
        match self.session.begin_expansion(&node_id) {
            ExpansionStart::FetchNeeded { epoch } => {
                self.enqueue(Command::FetchListing {
                    epoch,
                    node_id,
                    endpoint: self.active_endpoint(),
                });
            }
            ExpansionStart::AlreadyLoaded | ExpansionStart::AlreadyPending => {
                log::trace!("BrowserLogic: Expansion of '{node_id}' needs no fetch.");
            }
            ExpansionStart::UnknownNode => {
                self.notice(
                    MessageSeverity::Warning,
                    format!("Unknown tree item '{node_id}'."),
                );
            }
        }
    }

    // The selection is frozen while a submission is in flight so the set
    // reported in the outcome matches what was sent.
    fn handle_check_toggled(&mut self, node_id: String) {
        if self.orchestrator.is_in_flight() {
            self.notice(MessageSeverity::Warning, NOTICE_SUBMISSION_IN_FLIGHT);
            return;
        }
        if self.session.is_root_id(&node_id) {
            log::debug!("BrowserLogic: Ignoring check toggle on the root item.");
            return;
        }
        if !self.session.contains(&node_id) {
            log::warn!("BrowserLogic: Check toggle for unknown node '{node_id}' ignored.");
            return;
        }
        let now_checked = self.selection.toggle(&node_id);
        log::debug!(
            "BrowserLogic: '{node_id}' is now {}.",
            if now_checked { "checked" } else { "unchecked" }
        );
        self.refresh_tree();
    }

    fn handle_submit_requested(&mut self) {
        if !self.session.has_tree() {
            self.notice(MessageSeverity::Warning, "Load a root path first.");
            return;
        }
        match self.orchestrator.begin(self.selection.is_empty()) {
            Ok(()) => {
                let selected_ids = self.selection.checked_ids();
                log::info!(
                    "BrowserLogic: Submitting {} ids under '{}'.",
                    selected_ids.len(),
                    self.session.root_path()
                );
                self.enqueue(Command::SetInteractionEnabled { enabled: false });
                self.enqueue(Command::SubmitSelection {
                    endpoint: self.active_endpoint(),
                    selected_ids,
                    root_path: self.session.root_path().to_string(),
                });
            }
            Err(SubmitRejection::EmptySelection) => {
                self.notice(MessageSeverity::Warning, NOTICE_EMPTY_SELECTION);
            }
            Err(SubmitRejection::AlreadyInFlight) => {
                self.notice(MessageSeverity::Warning, NOTICE_SUBMISSION_IN_FLIGHT);
            }
        }
    }

    /*
     * A listing completion. The session decides whether it still applies;
     * notices and tree refreshes are only emitted for completions that
     * touched the current tree, so stale answers are fully silent.
     */
    fn handle_listing_loaded(
        &mut self,
        epoch: u64,
        node_id: String,
        result: Result<Vec<crate::core::DirEntry>, crate::gateway::ListingError>,
    ) {
        let (entries, error_text) = match result {
            Ok(entries) => (Some(entries), None),
            Err(e) => {
                let text = e
                    .backend_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| NOTICE_LISTING_FAILED.to_string());
                log::warn!("BrowserLogic: Listing of '{node_id}' failed: {e}");
                (None, Some(text))
            }
        };
        match self.session.apply_listing(&node_id, epoch, entries) {
            ListingApplied::Attached { child_count } => {
                log::debug!("BrowserLogic: '{node_id}' now shows {child_count} children.");
                self.refresh_tree();
            }
            ListingApplied::MarkedEmptyAfterError => {
                if let Some(text) = error_text {
                    self.notice(MessageSeverity::Error, text);
                }
                self.refresh_tree();
            }
            ListingApplied::Stale => {}
        }
    }

    fn handle_submission_completed(
        &mut self,
        result: Result<crate::gateway::SubmitReceipt, crate::gateway::DeliveryError>,
    ) {
        match result {
            Ok(receipt) => {
                self.orchestrator
                    .complete_success(receipt.download_url.clone());
                self.notice(
                    MessageSeverity::Information,
                    format!("Archive sent. Download: {}", receipt.download_url),
                );
            }
            Err(e) => {
                // The backend's message is shown word for word.
                let message = e.to_string();
                log::error!("BrowserLogic: Submission failed: {message}");
                self.orchestrator.complete_failure(message.clone());
                self.notice(MessageSeverity::Error, message);
            }
        }
        self.enqueue(Command::SetInteractionEnabled { enabled: true });
    }

    fn active_endpoint(&self) -> String {
        match self.config.site_endpoint(&self.active_site) {
            Some(endpoint) => endpoint.to_string(),
            None => {
                // The active site is validated on every switch; an empty
                // endpoint here only produces a failed gateway call.
                log::error!(
                    "BrowserLogic: Active site '{}' has no endpoint.",
                    self.active_site
                );
                String::new()
            }
        }
    }

    fn persist_last_session(&self, root_path: Option<String>) {
        if let Err(e) = self.config_manager.save_last_session(
            APP_NAME,
            Some(&self.active_site),
            root_path.as_deref(),
        ) {
            log::warn!("BrowserLogic: Failed to persist session: {e}");
        }
    }

    #[cfg(test)]
    pub(crate) fn submission_state(&self) -> &crate::core::SubmissionState {
        self.orchestrator.state()
    }
}
