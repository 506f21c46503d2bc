use git2::{DiffOptions, Oid, Patch};
use std::path::Path;

use crate::error::Result;
use crate::git::repository::GitRepository;

/// Unified-diff text for one file pair, produced from blob contents. This is
/// the only producer of patch text in the system; patches are never read
/// from untrusted input.
pub fn unified_diff(old: &[u8], new: &[u8], path: &str) -> Result<String> {
    let mut opts = DiffOptions::new();
    opts.context_lines(3);

    let mut patch = Patch::from_buffers(
        old,
        Some(Path::new(path)),
        new,
        Some(Path::new(path)),
        Some(&mut opts),
    )?;
    let buf = patch.to_buf()?;

    Ok(String::from_utf8_lossy(&buf).to_string())
}

impl GitRepository {
    /// Read `path` at both commits and diff the two blobs. Per-commit
    /// content resolution is the caller's concern across renames; both
    /// sides are read under the same path here.
    pub fn diff_file_revisions(&self, old: Oid, new: Oid, path: &str) -> Result<String> {
        let old_bytes = self.read_blob(old, path)?;
        let new_bytes = self.read_blob(new, path)?;
        unified_diff(&old_bytes, &new_bytes, path)
    }
}
