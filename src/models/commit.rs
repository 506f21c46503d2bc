use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

/// Read-only record of one commit, sourced from the object store.
///
/// `message` is optional: history walking never needs commit bodies, so the
/// walker skips them and only the presentation path fills them in.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    pub oid: String,
    /// Parent ids in order; the first parent is the one history walking
    /// diffs against.
    pub parents: Vec<String>,
    pub author: AuthorInfo,
    pub committer: AuthorInfo,
    pub timestamp: i64,
    pub relative_time: String,
    pub message: Option<String>,
}

impl CommitInfo {
    pub fn from_commit(commit: &git2::Commit, include_message: bool) -> Self {
        let timestamp = commit.time().seconds();
        CommitInfo {
            oid: commit.id().to_string(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
            author: signature_to_info(&commit.author()),
            committer: signature_to_info(&commit.committer()),
            timestamp,
            relative_time: format_relative_time(timestamp),
            message: if include_message {
                Some(commit.message().unwrap_or("").trim().to_string())
            } else {
                None
            },
        }
    }
}

fn signature_to_info(sig: &git2::Signature) -> AuthorInfo {
    AuthorInfo {
        name: sig.name().unwrap_or("Unknown").to_string(),
        email: sig.email().unwrap_or("").to_string(),
    }
}

pub fn format_relative_time(timestamp: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let diff = now - timestamp;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}
