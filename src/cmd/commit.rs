use std::io::{BufRead, Write};

use clap::Args;
use tracing::warn;

use crate::cmd::console::Console;
use crate::context::AppContext;
use crate::domain::commit::{Commit, NO_DIFF_FALLBACK, concatenate_patches};
use crate::error::{AppError, AppResult};
use crate::workflow::summarize::summarize_changes;

#[derive(Args, Debug, Clone)]
pub struct CommitArgs {
    /// Repository in `owner/name` form.
    #[arg(short, long)]
    pub repo: String,
    /// Commit SHA to summarize; pick from the recent commits when omitted.
    pub sha: Option<String>,
    /// How many recent commits to list.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: u32,
}

/// Parses `start-end` (or a single number) into a 0-based inclusive range.
pub fn parse_range(input: &str, len: usize) -> AppResult<(usize, usize)> {
    let invalid = || AppError::Selection(format!("enter a range like 1-{len}"));
    let (start, end) = match input.trim().split_once('-') {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (input.trim(), input.trim()),
    };
    let start: usize = start.parse().map_err(|_| invalid())?;
    let end: usize = end.parse().map_err(|_| invalid())?;

    if start == 0 || end > len {
        return Err(AppError::Selection(format!(
            "commit numbers must be between 1 and {len}"
        )));
    }
    if start > end {
        return Err(AppError::Selection(
            "range start must not be after its end".to_string(),
        ));
    }
    Ok((start - 1, end - 1))
}

pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    args: CommitArgs,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    match &args.sha {
        Some(sha) => {
            let summary = summarize_commit_changes(ctx, &args.repo, sha).await?;
            console.show_markdown(&summary)
        }
        None => review_recent_commits(ctx, &args.repo, args.count, console).await,
    }
}

/// Summarizes the code changes of a single commit.
pub async fn summarize_commit_changes(
    ctx: &AppContext,
    repository: &str,
    sha: &str,
) -> AppResult<String> {
    let files = ctx
        .hosting
        .get_commit_diff(repository, sha)
        .await
        .ok_or_else(|| AppError::Hosting(format!("could not fetch commit {sha}")))?;

    let diff = concatenate_patches(&files);
    let diff = if diff.trim().is_empty() {
        NO_DIFF_FALLBACK.to_string()
    } else {
        diff
    };
    summarize_changes(ctx.language_model.as_ref(), &diff).await
}

async fn review_recent_commits<R: BufRead, W: Write>(
    ctx: &AppContext,
    repository: &str,
    count: u32,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let commits = ctx.hosting.list_commits(repository, count).await;
    if commits.is_empty() {
        console.say("No commits found.")?;
        return Ok(());
    }

    console.say("Most recent commits:")?;
    for (i, commit) in commits.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, commit_line(commit)))?;
    }

    let (start, end) = loop {
        let Some(input) = console.ask("\nEnter the range of commits to review (e.g., 1-5): ")?
        else {
            return Ok(());
        };
        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        match parse_range(&input, commits.len()) {
            Ok(range) => break range,
            Err(err) => console.say(&format!("Invalid input: {err}"))?,
        }
    };

    for commit in &commits[start..=end] {
        console.say(&format!("\nCommit {}", commit.sha))?;
        match summarize_commit_changes(ctx, repository, &commit.sha).await {
            Ok(summary) => console.show_markdown(&summary)?,
            Err(err) => {
                warn!(sha = %commit.sha, "commit summary failed: {err}");
                console.say(&format!("Error summarizing commit: {err}"))?;
            }
        }
    }
    Ok(())
}

fn commit_line(commit: &Commit) -> String {
    let date = commit.commit.author.date.as_deref().unwrap_or("unknown date");
    let subject = commit.message().lines().next().unwrap_or_default();
    format!("{date} - {subject}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::commit;
    use crate::workflow::prompts::CHANGES_PROMPT;
    use crate::workflow::testing::{FakeHosting, FakeModel, context};

    fn recent() -> FakeHosting {
        FakeHosting::default()
            .with_commits(vec![
                commit("c3", "Fix login\n\nlong body", None),
                commit("b2", "Add export", None),
                commit("a1", "Initial import", None),
            ])
            .with_diff("c3", "+fixed")
            .with_diff("b2", "+export")
    }

    async fn drive(
        hosting: FakeHosting,
        model: FakeModel,
        sha: Option<&str>,
        input: &str,
    ) -> String {
        let ctx = context(hosting, model);
        let mut console = Console::new(input.as_bytes(), Vec::new(), false);
        let args = CommitArgs {
            repo: "owner/repo".to_string(),
            sha: sha.map(str::to_string),
            count: 10,
        };
        run(&ctx, args, &mut console).await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn parses_commit_ranges() {
        assert_eq!(parse_range("1-5", 5).unwrap(), (0, 4));
        assert_eq!(parse_range(" 2 - 3 ", 5).unwrap(), (1, 2));
        assert_eq!(parse_range("3", 5).unwrap(), (2, 2));
        assert!(parse_range("0-2", 5).is_err());
        assert!(parse_range("2-6", 5).is_err());
        assert!(parse_range("4-2", 5).is_err());
        assert!(parse_range("a-b", 5).is_err());
        assert!(parse_range("", 5).is_err());
    }

    #[tokio::test]
    async fn summarizes_commit_patches() {
        let model = FakeModel::default();
        let ctx = context(FakeHosting::default().with_diff("abc", "+added"), model.clone());

        let summary = summarize_commit_changes(&ctx, "owner/repo", "abc")
            .await
            .unwrap();

        assert_eq!(summary, "- +added");
        let calls = model.calls();
        assert_eq!(calls[0][0].content, CHANGES_PROMPT);
        assert_eq!(calls[0][1].content, "+added");
    }

    #[tokio::test]
    async fn missing_commit_is_an_error() {
        let model = FakeModel::default();
        let ctx = context(FakeHosting::default(), model.clone());

        let result = summarize_commit_changes(&ctx, "owner/repo", "nope").await;

        assert!(matches!(result, Err(AppError::Hosting(_))));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn explicit_sha_skips_the_listing() {
        let output = drive(recent(), FakeModel::default(), Some("b2"), "").await;
        assert_eq!(output, "• +export\n");
    }

    #[tokio::test]
    async fn reviews_selected_range_of_recent_commits() {
        let fake = recent();
        let model = FakeModel::default();
        let output = drive(fake.clone(), model.clone(), None, "1-9\n1-2\n").await;

        assert!(output.contains(
            "Most recent commits:\n1. unknown date - Fix login\n2. unknown date - Add export\n"
        ));
        assert!(output.contains("commit numbers must be between 1 and 3"));
        assert!(output.contains("Commit c3\n• +fixed\n"));
        assert!(output.contains("Commit b2\n• +export\n"));
        assert!(!output.contains("Commit a1"));
        assert_eq!(fake.diff_requests(), vec!["c3".to_string(), "b2".to_string()]);
        assert_eq!(model.calls().len(), 2);
    }

    #[tokio::test]
    async fn missing_diff_does_not_stop_the_review() {
        let model = FakeModel::default();
        let output = drive(recent(), model.clone(), None, "2-3\n").await;

        assert!(output.contains("Commit b2\n• +export\n"));
        assert!(output.contains("Error summarizing commit: hosting API error: could not fetch commit a1"));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn quitting_the_range_prompt_summarizes_nothing() {
        let model = FakeModel::default();
        let output = drive(recent(), model.clone(), None, "q\n").await;

        assert!(output.contains("Most recent commits:"));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn reports_when_no_commits_exist() {
        let output = drive(FakeHosting::default(), FakeModel::default(), None, "").await;
        assert_eq!(output, "No commits found.\n");
    }
}
