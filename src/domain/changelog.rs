use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::release::Release;
use crate::error::AppResult;

/// Makes a tag safe to embed in a file name. Path separators, `_` and `%`
/// are percent-escaped, so the result never contains `_` and the
/// `_to_` separator of comparison names stays unambiguous.
pub fn sanitize_filename(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    for ch in tag.chars() {
        match ch {
            '/' => out.push_str("%2F"),
            '_' => out.push_str("%5F"),
            '\\' => out.push_str("%5C"),
            '%' => out.push_str("%25"),
            other => out.push(other),
        }
    }
    out
}

/// What a changelog describes; decides its file name and header lines.
#[derive(Debug, Clone)]
pub enum ChangelogTarget {
    Release {
        tag: String,
        published_at: String,
    },
    Comparison {
        older: String,
        newer: String,
        date: NaiveDate,
    },
}

impl ChangelogTarget {
    pub fn release(release: &Release) -> Self {
        Self::Release {
            tag: release.tag_name.clone(),
            published_at: release.published_at.clone().unwrap_or_default(),
        }
    }

    pub fn comparison(older: &Release, newer: &Release, date: NaiveDate) -> Self {
        Self::Comparison {
            older: older.tag_name.clone(),
            newer: newer.tag_name.clone(),
            date,
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Self::Release { tag, .. } => format!("changelog_{}.md", sanitize_filename(tag)),
            Self::Comparison { older, newer, .. } => format!(
                "comparison_{}_to_{}.md",
                sanitize_filename(older),
                sanitize_filename(newer)
            ),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Release { tag, .. } => format!("# Changelog for {tag}"),
            Self::Comparison { older, newer, .. } => format!("# Changes from {older} to {newer}"),
        }
    }

    pub fn date_line(&self) -> String {
        match self {
            Self::Release { published_at, .. } => format!("Release Date: {published_at}"),
            Self::Comparison { date, .. } => {
                format!("Comparison Date: {}", date.format("%Y-%m-%d"))
            }
        }
    }

    pub fn render(&self, changelog: &str) -> String {
        format!("{}\n\n{}\n\n{}", self.title(), self.date_line(), changelog)
    }
}

/// Writes the changelog document under `output_dir`, creating it if needed.
pub fn persist(output_dir: &Path, target: &ChangelogTarget, changelog: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(target.file_name());
    fs::write(&path, target.render(changelog))?;
    Ok(path)
}
