use serde::{Deserialize, Serialize};

// Represents the visual check state of a tree item, typically a checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
}

// Defines the severity of a user-facing notice.
// Ordered from least to most severe for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

/*
 * Presentation category for a file entry, derived from its extension.
 * This carries no behavior; it only feeds the type tag shown next to a
 * file name in a host shell. Directories have no category.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    RasterImage,
    PlotterDrawing,
    VectorClip,
    Other,
}

impl FileCategory {
    pub fn from_name(name: &str) -> Self {
        let extension = name.rsplit('.').next().unwrap_or("").to_lowercase();
        match extension.as_str() {
            "tif" => FileCategory::RasterImage,
            "dxf" => FileCategory::PlotterDrawing,
            "cdr" => FileCategory::VectorClip,
            _ => FileCategory::Other,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FileCategory::RasterImage => "image",
            FileCategory::PlotterDrawing => "plot",
            FileCategory::VectorClip => "vector",
            FileCategory::Other => "file",
        }
    }
}

/*
 * One immediate entry of a remote directory, as reported by the listing
 * service. The wire field is named `isDir`; serde handles the rename so the
 * gateway can deserialize listing bodies straight into this type.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
}

/*
 * Represents a node in the partially-materialized remote tree.
 * The id is the full backslash-separated remote path; it doubles as the
 * node's identity and as the literal value transmitted to the backend.
 * `children` distinguishes "not yet loaded" (`None`) from "loaded, empty"
 * (`Some` of an empty vec): an empty directory must not be re-fetched, while
 * an unexpanded one is fetched exactly once on first expansion.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteNode {
    pub id: String,
    pub name: String,
    pub is_leaf: bool,
    pub category: Option<FileCategory>,
    pub children: Option<Vec<RemoteNode>>,
}

impl RemoteNode {
    /// Creates a directory node whose children have not been fetched yet.
    pub fn new_branch(id: String, name: String) -> Self {
        RemoteNode {
            id,
            name,
            is_leaf: false,
            category: None,
            children: None,
        }
    }

    /// Creates a file node. Files never have children.
    pub fn new_leaf(id: String, name: String) -> Self {
        let category = FileCategory::from_name(&name);
        RemoteNode {
            id,
            name,
            is_leaf: true,
            category: Some(category),
            children: None,
        }
    }

    pub fn children_loaded(&self) -> bool {
        self.children.is_some()
    }
}

/*
 * Describes a single item to be displayed in a tree-like control.
 * The application logic hands a vector of these to the host shell whenever
 * the tree or the selection changes; the host renders it without touching
 * the model. The synthetic root carries `selectable: false`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct TreeItemDescriptor {
    pub id: String,
    pub text: String,
    pub is_folder: bool,
    pub category: Option<FileCategory>,
    pub state: CheckState,
    pub selectable: bool,
    pub children_loaded: bool,
    pub children: Vec<TreeItemDescriptor>,
}
