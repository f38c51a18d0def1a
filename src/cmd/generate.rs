use std::io::{BufRead, Write};

use chrono::Local;
use clap::{Args, ValueEnum};
use tracing::warn;

use crate::cmd::console::Console;
use crate::context::AppContext;
use crate::domain::release::{Release, filter_production_releases, sort_newest_first};
use crate::error::{AppError, AppResult};
use crate::workflow::changelog::{
    ChangelogReport, ReleaseOutcome, process_comparison, process_release,
};
use crate::workflow::commit_range::validate_comparison;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Repository in `owner/name` form; prompted for when omitted.
    #[arg(short, long)]
    pub repo: Option<String>,
    /// Skip the mode prompt.
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Changes since the previous release.
    Single,
    /// Changes between any two releases.
    Compare,
}

impl Mode {
    fn from_menu(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Mode::Single),
            "2" => Some(Mode::Compare),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    Quit,
    Index(usize),
}

/// Parses a 1-based menu number into a list index.
pub fn parse_index(input: &str) -> AppResult<usize> {
    match input.trim().parse::<usize>() {
        Ok(number) if number > 0 => Ok(number - 1),
        _ => Err(AppError::Selection(
            "please enter a number or 'q' to quit".to_string(),
        )),
    }
}

pub fn parse_selection(input: &str, len: usize) -> AppResult<Selection> {
    if input.trim().eq_ignore_ascii_case("q") {
        return Ok(Selection::Quit);
    }
    let index = parse_index(input)?;
    if index >= len {
        return Err(AppError::Selection(format!(
            "release number must be between 1 and {len}"
        )));
    }
    Ok(Selection::Index(index))
}

pub async fn run<R: BufRead, W: Write>(
    ctx: &AppContext,
    args: GenerateArgs,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let repository = match args.repo {
        Some(repo) => repo,
        None => console
            .ask("Enter repository (e.g., owner/name): ")?
            .unwrap_or_default(),
    };
    if repository.trim().is_empty() {
        return Err(AppError::Selection("repository must not be empty".to_string()));
    }

    console.say("Fetching releases...")?;
    let mut releases = ctx.hosting.fetch_releases(&repository).await;
    if releases.is_empty() {
        console.say("No releases found.")?;
        return Ok(());
    }

    sort_newest_first(&mut releases);
    let marker = &ctx.config.release_marker;
    let releases = filter_production_releases(&releases, marker);
    if releases.is_empty() {
        console.say(&format!("No {marker} releases found."))?;
        return Ok(());
    }
    console.say(&format!("\nFound {} {marker} releases.", releases.len()))?;

    let mode = match args.mode {
        Some(mode) => mode,
        None => {
            console.say("\nSelect mode:")?;
            console.say("1. Analyze single release (changes since previous release)")?;
            console.say("2. Compare two releases (changes between any two releases)")?;
            let input = console.ask("\nEnter mode (1 or 2): ")?.unwrap_or_default();
            match Mode::from_menu(&input) {
                Some(mode) => mode,
                None => {
                    console.say("Invalid mode selected.")?;
                    return Ok(());
                }
            }
        }
    };

    for (i, release) in releases.iter().enumerate() {
        console.say(&format!(
            "{}. {} ({})",
            i + 1,
            release.tag_name,
            release.display_date()
        ))?;
    }

    match mode {
        Mode::Single => single_release_loop(ctx, &repository, &releases, console).await,
        Mode::Compare => comparison_loop(ctx, &repository, &releases, console).await,
    }
}

async fn single_release_loop<R: BufRead, W: Write>(
    ctx: &AppContext,
    repository: &str,
    releases: &[Release],
    console: &mut Console<R, W>,
) -> AppResult<()> {
    loop {
        let Some(input) =
            console.ask("\nEnter the number of the release to process (or 'q' to quit): ")?
        else {
            return Ok(());
        };
        let index = match parse_selection(&input, releases.len()) {
            Ok(Selection::Quit) => return Ok(()),
            Ok(Selection::Index(index)) => index,
            Err(err) => {
                console.say(&format!("Invalid input: {err}"))?;
                continue;
            }
        };

        console.say(&format!("\nProcessing release: {}", releases[index].tag_name))?;
        match process_release(ctx, repository, releases, index, console).await {
            Ok(ReleaseOutcome::Written(report)) => show_report(console, &report)?,
            Ok(ReleaseOutcome::NoPreviousRelease) => console
                .say("This is the oldest release, no previous release to compare with.")?,
            Err(err) => {
                warn!(release = %releases[index].tag_name, "changelog generation failed: {err}");
                console.say(&format!("Error processing release: {err}"))?;
            }
        }
    }
}

async fn comparison_loop<R: BufRead, W: Write>(
    ctx: &AppContext,
    repository: &str,
    releases: &[Release],
    console: &mut Console<R, W>,
) -> AppResult<()> {
    loop {
        console.say("\nSelect two releases to compare:")?;
        let Some(newer) =
            console.ask("Enter the number of the NEWER release (or 'q' to quit): ")?
        else {
            return Ok(());
        };
        if newer.eq_ignore_ascii_case("q") {
            return Ok(());
        }
        let Some(older) = console.ask("Enter the number of the OLDER release: ")? else {
            return Ok(());
        };

        let selected = parse_index(&newer).and_then(|newer| {
            let older = parse_index(&older)?;
            validate_comparison(releases.len(), newer, older)?;
            Ok((newer, older))
        });
        let (newer, older) = match selected {
            Ok(pair) => pair,
            Err(err) => {
                console.say(&format!("Invalid input: {err}"))?;
                continue;
            }
        };

        console.say("\nComparing changes between:")?;
        console.say(&format!("Newer: {}", releases[newer].tag_name))?;
        console.say(&format!("Older: {}", releases[older].tag_name))?;

        let today = Local::now().date_naive();
        match process_comparison(ctx, repository, releases, newer, older, today, console).await {
            Ok(report) => show_report(console, &report)?,
            Err(err) => {
                warn!("comparison failed: {err}");
                console.say(&format!("Error processing comparison: {err}"))?;
            }
        }
    }
}

fn show_report<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    report: &ChangelogReport,
) -> AppResult<()> {
    console.say("\nChangelog:")?;
    console.show_markdown(&report.changelog)?;
    console.say(&format!("\nChangelog saved to: {}", report.path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::commit;
    use crate::domain::release::release;
    use crate::workflow::testing::{FakeHosting, FakeModel, context};

    fn hosting() -> FakeHosting {
        FakeHosting::default()
            .with_releases(vec![
                release("v0.9-beta", "2024-03-01T00:00:00Z"),
                release("v1.0-production", "2024-04-01T00:00:00Z"),
                release("v2.0-production", "2024-05-01T00:00:00Z"),
            ])
            .with_commits(vec![commit("a1", "Add export", None)])
    }

    async fn drive(
        hosting: FakeHosting,
        mode: Option<Mode>,
        input: &str,
    ) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(hosting, FakeModel::default());
        ctx.config.output_dir = dir.path().to_path_buf();
        let mut console = Console::new(input.as_bytes(), Vec::new(), false);
        let args = GenerateArgs {
            repo: Some("owner/repo".to_string()),
            mode,
        };

        run(&ctx, args, &mut console).await.unwrap();

        let output = String::from_utf8(console.into_output()).unwrap();
        (output, dir)
    }

    #[test]
    fn parses_selections() {
        assert_eq!(parse_selection("q", 2).unwrap(), Selection::Quit);
        assert_eq!(parse_selection("Q", 2).unwrap(), Selection::Quit);
        assert_eq!(parse_selection(" 2 ", 2).unwrap(), Selection::Index(1));
        assert!(parse_selection("3", 2).is_err());
        assert!(parse_selection("0", 2).is_err());
        assert!(parse_selection("two", 2).is_err());
    }

    #[tokio::test]
    async fn lists_sorted_production_releases() {
        let (output, _dir) = drive(hosting(), Some(Mode::Single), "q\n").await;
        assert!(output.contains("Found 2 production releases."));
        assert!(output.contains("1. v2.0-production (2024-05-01)\n2. v1.0-production (2024-04-01)"));
        assert!(!output.contains("v0.9-beta"));
    }

    #[tokio::test]
    async fn single_mode_survives_bad_input() {
        let fake = hosting();
        let (output, dir) = drive(fake.clone(), None, "1\nabc\n9\n2\n1\nq\n").await;

        assert!(output.contains("Invalid input: invalid selection: please enter a number"));
        assert!(output.contains("release number must be between 1 and 2"));
        assert!(output.contains("This is the oldest release"));
        assert!(output.contains("\nAnalyzing 1 commits...\nProcessing commit 1/1\n"));
        assert!(output.contains("Changelog saved to:"));
        assert_eq!(
            fake.compare_requests(),
            vec![("v1.0-production".to_string(), "v2.0-production".to_string())]
        );
        assert!(dir.path().join("changelog_v2.0-production.md").exists());
    }

    #[tokio::test]
    async fn compare_mode_rejects_equal_indexes() {
        let fake = hosting();
        let (output, _dir) = drive(fake.clone(), Some(Mode::Compare), "1\n1\nq\n").await;

        assert!(output.contains("first release must be newer than second release"));
        assert!(fake.compare_requests().is_empty());
    }

    #[tokio::test]
    async fn compare_mode_writes_comparison() {
        let fake = hosting();
        let (output, dir) = drive(fake.clone(), None, "2\n1\n2\nq\n").await;

        assert!(output.contains("Newer: v2.0-production\nOlder: v1.0-production"));
        assert!(
            dir.path()
                .join("comparison_v1.0-production_to_v2.0-production.md")
                .exists()
        );
    }

    #[tokio::test]
    async fn invalid_mode_stops() {
        let fake = hosting();
        let (output, _dir) = drive(fake.clone(), None, "3\n").await;
        assert!(output.contains("Invalid mode selected."));
        assert!(fake.compare_requests().is_empty());
    }

    #[tokio::test]
    async fn reports_missing_releases() {
        let (output, _dir) = drive(FakeHosting::default(), None, "").await;
        assert!(output.contains("No releases found."));
    }
}
