//! Plain data records shared across the crate.
//!
//! - `commit`: CommitInfo, provenance metadata for one commit
//! - `change`: PathChange and ChangeKind from per-commit tree comparison,
//!   LineChange for per-line classification of an applied patch

pub mod change;
pub mod commit;

pub use change::*;
pub use commit::*;
