use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::context::AppContext;
use crate::domain::commit::Commit;
use crate::domain::release::Release;
use crate::error::{AppError, AppResult};

/// Commits between two tags, each carrying its file diff. Diffs are fetched
/// through a bounded stream; output keeps the compare order.
pub async fn get_commits_between_tags(
    ctx: &AppContext,
    repository: &str,
    base: &str,
    head: &str,
) -> Vec<Commit> {
    let commits = ctx.hosting.compare_commits(repository, base, head).await;
    debug!(%base, %head, count = commits.len(), "resolved commit range");

    let hosting = ctx.hosting.as_ref();
    stream::iter(commits)
        .map(|mut commit| async move {
            commit.files = hosting.get_commit_diff(repository, &commit.sha).await;
            commit
        })
        .buffered(ctx.config.diff_concurrency.max(1))
        .collect()
        .await
}

/// The release published before `releases[index]` in a newest-first list.
pub fn previous_release(releases: &[Release], index: usize) -> Option<&Release> {
    releases.get(index.checked_add(1)?)
}

/// Both indexes must be in range and `newer` must precede `older` in the
/// newest-first list.
pub fn validate_comparison(len: usize, newer: usize, older: usize) -> AppResult<()> {
    if newer >= len || older >= len {
        return Err(AppError::Selection(format!(
            "release numbers must be between 1 and {len}"
        )));
    }
    if newer >= older {
        return Err(AppError::Selection(
            "first release must be newer than second release".to_string(),
        ));
    }
    Ok(())
}
