use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{AppConfig, Secrets, StoredConfig};
use crate::context::AppContext;
use crate::domain::commit::{Commit, FileChange};
use crate::domain::message::ChatMessage;
use crate::domain::release::Release;
use crate::error::{AppError, AppResult};
use crate::services::{HostingService, LanguageModelService};
use crate::workflow::changelog::{Progress, ProgressSink};
use crate::workflow::prompts::CHANGELOG_PROMPT;

#[derive(Default)]
struct HostingLog {
    compare: Vec<(String, String)>,
    diffs: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeHosting {
    releases: Vec<Release>,
    commits: Vec<Commit>,
    diffs: HashMap<String, Vec<FileChange>>,
    log: Arc<Mutex<HostingLog>>,
}

impl FakeHosting {
    pub fn with_releases(mut self, releases: Vec<Release>) -> Self {
        self.releases = releases;
        self
    }

    pub fn with_commits(mut self, commits: Vec<Commit>) -> Self {
        self.commits = commits;
        self
    }

    pub fn with_diff(mut self, sha: &str, patch: &str) -> Self {
        self.diffs.insert(
            sha.to_string(),
            vec![FileChange {
                filename: "changed.rs".to_string(),
                patch: Some(patch.to_string()),
            }],
        );
        self
    }

    pub fn compare_requests(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().compare.clone()
    }

    pub fn diff_requests(&self) -> Vec<String> {
        self.log.lock().unwrap().diffs.clone()
    }
}

#[async_trait]
impl HostingService for FakeHosting {
    async fn fetch_releases(&self, _repository: &str) -> Vec<Release> {
        self.releases.clone()
    }

    async fn list_commits(&self, _repository: &str, count: u32) -> Vec<Commit> {
        self.commits.iter().take(count as usize).cloned().collect()
    }

    async fn compare_commits(&self, _repository: &str, base: &str, head: &str) -> Vec<Commit> {
        self.log
            .lock()
            .unwrap()
            .compare
            .push((base.to_string(), head.to_string()));
        self.commits.clone()
    }

    async fn get_commit_diff(&self, _repository: &str, sha: &str) -> Option<Vec<FileChange>> {
        // Later commits finish first so ordering is actually exercised.
        let position = self.commits.iter().position(|c| c.sha == sha).unwrap_or(0);
        for _ in 0..self.commits.len().saturating_sub(position) {
            tokio::task::yield_now().await;
        }
        self.log.lock().unwrap().diffs.push(sha.to_string());
        self.diffs.get(sha).cloned()
    }
}

/// Echoes a deterministic reply derived from the prompt and records every
/// request.
#[derive(Clone, Default)]
pub struct FakeModel {
    fail_on: Option<String>,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl FakeModel {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModelService for FakeModel {
    async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let system = messages.first().map(|m| m.content.as_str()).unwrap_or_default();
        let user = messages.last().map(|m| m.content.as_str()).unwrap_or_default();

        if let Some(marker) = &self.fail_on
            && user.contains(marker.as_str())
        {
            return Err(AppError::LanguageModel("empty completion".to_string()));
        }
        if system == CHANGELOG_PROMPT {
            Ok(format!("## Changes\n{user}"))
        } else {
            Ok(format!("- {}", user.lines().next().unwrap_or_default()))
        }
    }
}

impl ProgressSink for Vec<Progress> {
    fn report(&mut self, progress: Progress) -> AppResult<()> {
        self.push(progress);
        Ok(())
    }
}

pub fn context(hosting: FakeHosting, model: FakeModel) -> AppContext {
    let stored = StoredConfig {
        model_engine: Some("gpt-test".to_string()),
        diff_concurrency: Some(3),
        ..StoredConfig::default()
    };
    let secrets = Secrets {
        github_token: Some("ghp_test".to_string()),
        llm_api_key: Some("sk-test".to_string()),
        llm_base_url: None,
    };
    let config = AppConfig::resolve(stored, secrets).unwrap();
    AppContext::new(config, Arc::new(hosting), Arc::new(model))
}
