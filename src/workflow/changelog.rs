use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::domain::changelog::{ChangelogTarget, persist};
use crate::domain::release::Release;
use crate::error::{AppError, AppResult};
use crate::workflow::commit_range::{get_commits_between_tags, previous_release, validate_comparison};
use crate::workflow::summarize::{summarize_commit, synthesize_changelog};

pub struct ChangelogReport {
    pub changelog: String,
    pub path: PathBuf,
}

pub enum ReleaseOutcome {
    Written(ChangelogReport),
    /// The selected release is the oldest one; nothing to compare against.
    NoPreviousRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Analyzing { total: usize },
    /// `index` is 1-based.
    Commit { index: usize, total: usize },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyzing { total } => write!(f, "\nAnalyzing {total} commits..."),
            Self::Commit { index, total } => write!(f, "Processing commit {index}/{total}"),
        }
    }
}

/// Receives progress while a changelog is generated.
pub trait ProgressSink {
    fn report(&mut self, progress: Progress) -> AppResult<()>;
}

/// Summarizes every commit between `base_tag` and `head_tag`, in compare
/// order, then consolidates the summaries. The first failing commit aborts
/// the whole changelog.
pub async fn generate_release_changelog(
    ctx: &AppContext,
    repository: &str,
    head_tag: &str,
    base_tag: &str,
    progress: &mut dyn ProgressSink,
) -> AppResult<String> {
    let commits = get_commits_between_tags(ctx, repository, base_tag, head_tag).await;
    let language_model = ctx.language_model.as_ref();
    let total = commits.len();

    progress.report(Progress::Analyzing { total })?;
    let mut summaries = Vec::with_capacity(total);
    for (i, commit) in commits.iter().enumerate() {
        progress.report(Progress::Commit { index: i + 1, total })?;
        debug!(sha = %commit.sha, date = ?commit.commit.author.date, "summarizing commit");
        summaries.push(summarize_commit(language_model, commit).await?);
    }

    info!(%head_tag, %base_tag, summaries = summaries.len(), "synthesizing changelog");
    synthesize_changelog(language_model, &summaries).await
}

pub async fn process_release(
    ctx: &AppContext,
    repository: &str,
    releases: &[Release],
    index: usize,
    progress: &mut dyn ProgressSink,
) -> AppResult<ReleaseOutcome> {
    let release = releases.get(index).ok_or_else(|| {
        AppError::Selection(format!(
            "release number must be between 1 and {}",
            releases.len()
        ))
    })?;
    let Some(previous) = previous_release(releases, index) else {
        return Ok(ReleaseOutcome::NoPreviousRelease);
    };

    let changelog =
        generate_release_changelog(ctx, repository, &release.tag_name, &previous.tag_name, progress)
            .await?;
    let path = persist(
        &ctx.config.output_dir,
        &ChangelogTarget::release(release),
        &changelog,
    )?;
    Ok(ReleaseOutcome::Written(ChangelogReport { changelog, path }))
}

pub async fn process_comparison(
    ctx: &AppContext,
    repository: &str,
    releases: &[Release],
    newer: usize,
    older: usize,
    date: NaiveDate,
    progress: &mut dyn ProgressSink,
) -> AppResult<ChangelogReport> {
    validate_comparison(releases.len(), newer, older)?;
    let (newer, older) = (&releases[newer], &releases[older]);

    let changelog =
        generate_release_changelog(ctx, repository, &newer.tag_name, &older.tag_name, progress)
            .await?;
    let path = persist(
        &ctx.config.output_dir,
        &ChangelogTarget::comparison(older, newer, date),
        &changelog,
    )?;
    Ok(ChangelogReport { changelog, path })
}
