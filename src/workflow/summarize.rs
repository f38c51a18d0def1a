use crate::domain::commit::Commit;
use crate::domain::message::ChatMessage;
use crate::error::AppResult;
use crate::services::LanguageModelService;
use crate::workflow::prompts::{CHANGELOG_PROMPT, CHANGES_PROMPT, COMMIT_SUMMARY_PROMPT};

pub fn commit_messages(commit: &Commit) -> Vec<ChatMessage> {
    let user = format!(
        "Commit message: {}\nAuthor: {}\n\nCode Changes:\n{}",
        commit.message(),
        commit.author_name(),
        commit.diff_text()
    );
    vec![
        ChatMessage::system(COMMIT_SUMMARY_PROMPT),
        ChatMessage::user(user),
    ]
}

pub fn changelog_messages(summaries: &[String]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(CHANGELOG_PROMPT),
        ChatMessage::user(summaries.join("\n")),
    ]
}

pub async fn summarize_commit(
    language_model: &dyn LanguageModelService,
    commit: &Commit,
) -> AppResult<String> {
    language_model.complete(&commit_messages(commit)).await
}

/// Consolidates per-commit summaries, in the given order, into one
/// changelog. Runs even when there are no summaries.
pub async fn synthesize_changelog(
    language_model: &dyn LanguageModelService,
    summaries: &[String],
) -> AppResult<String> {
    language_model.complete(&changelog_messages(summaries)).await
}

pub async fn summarize_changes(
    language_model: &dyn LanguageModelService,
    diff: &str,
) -> AppResult<String> {
    let messages = vec![ChatMessage::system(CHANGES_PROMPT), ChatMessage::user(diff)];
    language_model.complete(&messages).await
}
