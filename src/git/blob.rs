use git2::{ObjectType, Oid};

use crate::error::{AppError, Result};
use crate::git::repository::GitRepository;

impl GitRepository {
    /// Read the raw bytes of `path` in `commit`'s tree.
    ///
    /// The walk descends one path segment at a time and only enters the
    /// subtree whose name matches the next required segment; it never
    /// recurses into unrelated subtrees. The entry must sit at the exact
    /// depth the path names.
    pub fn read_blob(&self, commit: Oid, path: &str) -> Result<Vec<u8>> {
        let not_found = || AppError::PathNotFoundInCommit {
            path: path.to_string(),
            commit: commit.to_string(),
        };

        let mut tree = self.raw().find_commit(commit)?.tree()?;
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();

        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                let subtree = {
                    let entry = tree.get_name(segment).ok_or_else(not_found)?;
                    if entry.kind() != Some(ObjectType::Tree) {
                        return Err(not_found());
                    }
                    entry
                        .to_object(self.raw())?
                        .peel_to_tree()
                        .map_err(|_| not_found())?
                };
                tree = subtree;
            } else {
                let entry = tree.get_name(segment).ok_or_else(not_found)?;
                let obj = entry.to_object(self.raw())?;
                let blob = obj.as_blob().ok_or_else(not_found)?;
                return Ok(blob.content().to_vec());
            }
        }

        Err(not_found())
    }
}
