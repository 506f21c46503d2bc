//! Test fixture: a real repository in a temp directory, committed through
//! libgit2 so tests don't shell out to git.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_fs::TempDir;
use git2::{Oid, Repository, Signature};

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn init() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        {
            let mut config = repo.config().expect("config");
            config.set_str("user.name", "Test Author").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        Self { dir, repo }
    }

    pub fn workdir(&self) -> &Path {
        self.repo.workdir().expect("workdir")
    }

    /// Write `content` to `rel` and stage it.
    pub fn add(&self, rel: &str, content: &str) {
        let path = self.workdir().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(rel)).unwrap();
        index.write().unwrap();
    }

    /// Move `old` to `new` in both the working tree and the index.
    pub fn rename(&self, old: &str, new: &str) {
        fs::rename(self.workdir().join(old), self.workdir().join(new)).unwrap();

        let mut index = self.repo.index().unwrap();
        index.remove_path(Path::new(old)).unwrap();
        index.add_path(Path::new(new)).unwrap();
        index.write().unwrap();
    }

    /// Commit the staged index onto HEAD.
    pub fn commit(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = self.signature();

        let head = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = head.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    /// Commit an explicit tree with explicit parents. `update_head` moves
    /// the current branch; otherwise the commit dangles (useful for side
    /// branches without checkouts).
    pub fn commit_tree(
        &self,
        tree_id: Oid,
        parents: &[Oid],
        message: &str,
        update_head: bool,
    ) -> Oid {
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = self.signature();
        let parent_commits: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parent_commits.iter().collect();

        self.repo
            .commit(
                update_head.then_some("HEAD"),
                &sig,
                &sig,
                message,
                &tree,
                &parent_refs,
            )
            .unwrap()
    }

    /// A copy of `base_tree_id` with `name` replaced by a blob of `content`.
    pub fn tree_with_blob(&self, base_tree_id: Oid, name: &str, content: &str) -> Oid {
        let base = self.repo.find_tree(base_tree_id).unwrap();
        let blob = self.repo.blob(content.as_bytes()).unwrap();
        let mut builder = self.repo.treebuilder(Some(&base)).unwrap();
        builder.insert(name, blob, 0o100644).unwrap();
        builder.write().unwrap()
    }

    pub fn tree_of(&self, commit: Oid) -> Oid {
        self.repo.find_commit(commit).unwrap().tree_id()
    }

    fn signature(&self) -> Signature<'static> {
        Signature::now("Test Author", "test@example.com").unwrap()
    }
}
