//! History walking for a single tracked path.
//!
//! The walk visits the commit graph newest-first in topological order and
//! keeps the commits whose first-parent tree diff touches the path, with
//! rename detection enabled so a file's pre-rename history stays reachable.
//! The collected list is reversed into chronological (oldest-first) order.

use git2::{Delta, DiffFindOptions, DiffOptions, Oid, Sort};
use std::time::Instant;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::git::repository::GitRepository;
use crate::models::{ChangeKind, PathChange};

/// Ordered list of the commits that changed one tracked path, oldest first.
/// Rebuilt once per "open file" operation and immutable afterwards.
#[derive(Debug, Clone)]
pub struct CommitList {
    commits: Vec<Oid>,
    path: String,
}

impl CommitList {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Oid> {
        self.commits.get(i).copied()
    }

    pub fn index_of(&self, id: Oid) -> Option<usize> {
        self.commits.iter().position(|c| *c == id)
    }

    /// The element immediately before `id`, or `None` if `id` is first or
    /// not in the list.
    pub fn predecessor(&self, id: Oid) -> Option<Oid> {
        match self.index_of(id) {
            Some(i) if i > 0 => Some(self.commits[i - 1]),
            _ => None,
        }
    }

    pub fn latest(&self) -> Option<Oid> {
        self.commits.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Oid> + '_ {
        self.commits.iter().copied()
    }

    /// Content of the tracked path at `commit`.
    pub fn read_file(&self, repo: &GitRepository, commit: Oid) -> Result<Vec<u8>> {
        repo.read_blob(commit, &self.path)
    }
}

/// Lazy producer over the commits that changed `path`, newest first. The
/// consumer can stop pulling at any point; nothing past the last yielded
/// commit is diffed.
pub struct HistoryIter<'repo> {
    repo: &'repo GitRepository,
    walk: git2::Revwalk<'repo>,
    path: String,
}

impl<'repo> HistoryIter<'repo> {
    pub fn new(repo: &'repo GitRepository, start: Oid, path: &str) -> Result<Self> {
        let mut walk = repo.raw().revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(start)
            .map_err(|_| AppError::NoSuchRevision(start.to_string()))?;

        Ok(Self {
            repo,
            walk,
            path: path.to_string(),
        })
    }
}

impl Iterator for HistoryIter<'_> {
    type Item = Result<Oid>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let oid = match self.walk.next()? {
                Ok(oid) => oid,
                Err(e) => return Some(Err(e.into())),
            };
            match self.repo.commit_changes_file(oid, &self.path) {
                Ok(true) => return Some(Ok(oid)),
                Ok(false) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl GitRepository {
    /// Walk the graph from `start` and collect every commit that changed
    /// `path`, oldest first. `progress` is invoked once per matched commit
    /// while the walk is still running.
    pub fn find_commits<F>(&self, start: Oid, path: &str, mut progress: F) -> Result<CommitList>
    where
        F: FnMut(Oid),
    {
        let started = Instant::now();
        let mut commits = Vec::new();
        for oid in HistoryIter::new(self, start, path)? {
            let oid = oid?;
            progress(oid);
            commits.push(oid);
        }

        // Traversal order is newest first; history is presented oldest first.
        commits.reverse();

        debug!(
            path,
            commits = commits.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "history walk finished"
        );

        Ok(CommitList {
            commits,
            path: path.to_string(),
        })
    }

    /// Whether `oid`'s first-parent diff touches `path` (added, modified,
    /// renamed or copied onto it).
    pub fn commit_changes_file(&self, oid: Oid, path: &str) -> Result<bool> {
        Ok(self.changed_paths(oid)?.iter().any(|c| c.touches(path)))
    }

    /// Changed-path set of `oid` relative to its first parent. A root commit
    /// reports every path in its tree as `Added`. Merge commits are compared
    /// against their first parent only.
    pub fn changed_paths(&self, oid: Oid) -> Result<Vec<PathChange>> {
        let commit = self.raw().find_commit(oid)?;
        let tree = commit.tree()?;

        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        let mut diff =
            self.raw()
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        // Content-similarity rename/copy detection; without it a rename
        // shows up as an unrelated delete + add pair.
        let mut find = DiffFindOptions::new();
        find.renames(true).copies(true);
        diff.find_similar(Some(&mut find))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let kind = match delta.status() {
                Delta::Added => ChangeKind::Added,
                Delta::Deleted => ChangeKind::Deleted,
                Delta::Modified => ChangeKind::Modified,
                Delta::Renamed => ChangeKind::Renamed,
                Delta::Copied => ChangeKind::Copied,
                _ => continue,
            };

            changes.push(PathChange {
                old_path: delta
                    .old_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string()),
                new_path: delta
                    .new_file()
                    .path()
                    .map(|p| p.to_string_lossy().to_string()),
                kind,
                old_id: delta.old_file().id().to_string(),
                new_id: delta.new_file().id().to_string(),
            });
        }

        Ok(changes)
    }
}
