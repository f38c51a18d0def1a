use async_trait::async_trait;

use crate::domain::commit::{Commit, FileChange};
use crate::domain::release::Release;

/// Read access to a code-hosting service.
///
/// Transport failures are not errors here: implementations log them and
/// return an empty list or `None`, so an empty result may mean "failed".
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Every release of `repository`, in the order the service returns them.
    async fn fetch_releases(&self, repository: &str) -> Vec<Release>;

    /// The `count` most recent commits on the default branch, newest first.
    async fn list_commits(&self, repository: &str, count: u32) -> Vec<Commit>;

    /// Commits reachable from `head` but not from `base`, without file diffs.
    async fn compare_commits(&self, repository: &str, base: &str, head: &str) -> Vec<Commit>;

    /// File-level diff of a single commit.
    async fn get_commit_diff(&self, repository: &str, sha: &str) -> Option<Vec<FileChange>>;
}
