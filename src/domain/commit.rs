use serde::Deserialize;

pub const NO_DIFF_FALLBACK: &str = "No detailed changes available";

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetail,
    /// Filled by a second request after the compare call; `None` when that
    /// request failed or has not run.
    #[serde(default)]
    pub files: Option<Vec<FileChange>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: Author,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileChange {
    pub filename: String,
    #[serde(default)]
    pub patch: Option<String>,
}

impl Commit {
    pub fn message(&self) -> &str {
        &self.commit.message
    }

    pub fn author_name(&self) -> &str {
        &self.commit.author.name
    }

    /// Per-file patches as `File: <name>\n<patch>` blocks. Files without a
    /// patch (binary, renames, oversized) are skipped.
    pub fn diff_text(&self) -> String {
        let blocks = self
            .files
            .iter()
            .flatten()
            .filter_map(|file| {
                file.patch
                    .as_deref()
                    .filter(|patch| !patch.is_empty())
                    .map(|patch| format!("File: {}\n{}", file.filename, patch))
            })
            .collect::<Vec<_>>();

        if blocks.is_empty() {
            NO_DIFF_FALLBACK.to_string()
        } else {
            blocks.join("\n\n")
        }
    }
}

/// Raw patches joined by newlines, as used for a standalone commit review.
pub fn concatenate_patches(files: &[FileChange]) -> String {
    files
        .iter()
        .filter_map(|file| file.patch.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub(crate) fn commit(sha: &str, message: &str, files: Option<Vec<FileChange>>) -> Commit {
    Commit {
        sha: sha.to_string(),
        commit: CommitDetail {
            message: message.to_string(),
            author: Author {
                name: "Ada".to_string(),
                date: None,
            },
        },
        files,
    }
}
