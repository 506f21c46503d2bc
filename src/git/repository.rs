use git2::Repository;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::CommitInfo;

/// Handle to an opened repository. Owns the underlying object store for the
/// lifetime of the session; all queries borrow it read-only.
pub struct GitRepository {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepository {
    /// Locate a repository by searching upward from `start` for the
    /// repository metadata directory.
    pub fn discover<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start_str = start.as_ref().to_string_lossy().to_string();
        let repo =
            Repository::discover(&start).map_err(|_| AppError::RepoNotFound(start_str.clone()))?;
        let workdir = repo
            .workdir()
            .ok_or(AppError::RepoNotFound(start_str))?
            .to_path_buf();

        Ok(Self { repo, workdir })
    }

    pub fn raw(&self) -> &Repository {
        &self.repo
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Resolve a symbolic reference name (e.g. "HEAD" or a branch name) to
    /// the commit it points at.
    pub fn resolve_revision(&self, name: &str) -> Result<git2::Oid> {
        let obj = self
            .repo
            .revparse_single(name)
            .map_err(|_| AppError::NoSuchRevision(name.to_string()))?;
        let commit = obj
            .peel_to_commit()
            .map_err(|_| AppError::NoSuchRevision(name.to_string()))?;
        Ok(commit.id())
    }

    pub fn commit_info(&self, oid: git2::Oid, include_message: bool) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;
        Ok(CommitInfo::from_commit(&commit, include_message))
    }

    /// Strip the repository workdir prefix from `path` exactly once and
    /// return the remainder with `/` separators.
    ///
    /// Relative input is passed through with only separator normalization,
    /// which makes a relative path that happens to equal a prefix of the
    /// workdir ambiguous; such input is treated as already repository-relative.
    pub fn rel_path<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        if path.is_absolute() {
            let stripped = path.strip_prefix(&self.workdir).map_err(|_| {
                AppError::PathOutsideRepository(path.to_string_lossy().to_string())
            })?;
            Ok(to_slash(stripped))
        } else {
            Ok(to_slash(path))
        }
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
