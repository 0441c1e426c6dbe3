/*
 * This module consolidates the core, transport-agnostic logic of the
 * application: the remote tree model and lazy-loading session, checkbox
 * selection, the single-flight submission state machine, path handling for
 * UNC-style roots, and configuration (including the `ConfigManagerOperations`
 * abstraction used for persistence).
 */
pub mod config;
pub mod models;
pub mod path_utils;
pub mod selection;
pub mod session;
pub mod submission;

// Re-export key structures and enums
pub use models::{CheckState, DirEntry, FileCategory, MessageSeverity, RemoteNode, TreeItemDescriptor};

// Re-export session related items
pub use session::{ExpansionStart, ListingApplied, RootSession};

pub use selection::SelectionState;

pub use submission::{SubmissionOrchestrator, SubmissionState, SubmitRejection};

// Re-export config related items
pub use config::{AppConfig, ConfigError, ConfigManagerOperations, CoreConfigManager, SiteConfig};

pub use path_utils::{join_child_id, normalize_root_path};
