use serde::Serialize;

/// How a path changed between a commit and its first parent.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
}

/// One entry of a commit's changed-path set, produced by comparing its tree
/// against the first parent's tree with rename detection enabled.
#[derive(Debug, Clone, Serialize)]
pub struct PathChange {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub kind: ChangeKind,
    pub old_id: String,
    pub new_id: String,
}

impl PathChange {
    /// A file counts as changed for history-walking purposes iff it was
    /// added, modified, renamed or copied, matching on the *new* path.
    pub fn touches(&self, path: &str) -> bool {
        matches!(
            self.kind,
            ChangeKind::Added | ChangeKind::Modified | ChangeKind::Renamed | ChangeKind::Copied
        ) && self.new_path.as_deref() == Some(path)
    }
}

/// Per-line classification after a patch application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineChange {
    Unchanged,
    Added,
    Deleted,
}
