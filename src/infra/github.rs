use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::commit::{Commit, FileChange};
use crate::domain::release::Release;
use crate::error::{AppError, AppResult};
use crate::services::HostingService;

const PAGE_SIZE: u32 = 100;
const USER_AGENT: &str = concat!("relnotes/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    http: Client,
    api_base: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_base: String, token: String, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| AppError::Hosting(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// Builds `{api_base}/repos/{repository}/{path}`. Each `/`-separated part
    /// of `path` becomes its own percent-encoded segment, so tags keep their
    /// slashes but `#`, `?` and `%` never leak into the query or fragment.
    fn repo_url(&self, repository: &str, path: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|err| AppError::Hosting(format!("invalid API base {}: {err}", self.api_base)))?;
        url.path_segments_mut()
            .map_err(|()| AppError::Hosting(format!("API base {} cannot hold a path", self.api_base)))?
            .pop_if_empty()
            .push("repos")
            .extend(repository.split('/').filter(|part| !part.is_empty()))
            .extend(path.split('/'));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        repository: &str,
        path: &str,
        query: &[(&str, u32)],
    ) -> AppResult<T> {
        let url = self.repo_url(repository, path)?;
        debug!(%url, ?query, "GET");
        let response = self
            .http
            .get(url.clone())
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|err| AppError::Hosting(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Hosting(format!("{url} responded with {status}")));
        }

        response
            .json()
            .await
            .map_err(|err| AppError::Hosting(format!("failed to parse response from {url}: {err}")))
    }
}

#[async_trait]
impl HostingService for GitHubClient {
    async fn fetch_releases(&self, repository: &str) -> Vec<Release> {
        let mut releases = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<Release> = match self
                .get_json(repository, "releases", &[("page", page), ("per_page", PAGE_SIZE)])
                .await
            {
                Ok(batch) => batch,
                Err(err) => {
                    warn!(%repository, page, "failed to fetch releases: {err}");
                    return Vec::new();
                }
            };
            if batch.is_empty() {
                break;
            }
            releases.extend(batch);
            page += 1;
        }

        debug!(%repository, count = releases.len(), "fetched releases");
        releases
    }

    async fn list_commits(&self, repository: &str, count: u32) -> Vec<Commit> {
        let per_page = count.clamp(1, PAGE_SIZE);
        match self
            .get_json::<Vec<Commit>>(repository, "commits", &[("per_page", per_page)])
            .await
        {
            Ok(commits) => commits,
            Err(err) => {
                warn!(%repository, count, "failed to fetch recent commits: {err}");
                Vec::new()
            }
        }
    }

    async fn compare_commits(&self, repository: &str, base: &str, head: &str) -> Vec<Commit> {
        let path = format!("compare/{base}...{head}");
        match self.get_json::<CompareResponse>(repository, &path, &[]).await {
            Ok(compare) => compare.commits,
            Err(err) => {
                warn!(%repository, %base, %head, "failed to fetch commits between tags: {err}");
                Vec::new()
            }
        }
    }

    async fn get_commit_diff(&self, repository: &str, sha: &str) -> Option<Vec<FileChange>> {
        let path = format!("commits/{sha}");
        match self.get_json::<CommitResponse>(repository, &path, &[]).await {
            Ok(commit) => Some(commit.files),
            Err(err) => {
                warn!(%repository, %sha, "failed to fetch commit diff: {err}");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct CompareResponse {
    commits: Vec<Commit>,
}

#[derive(Deserialize)]
struct CommitResponse {
    #[serde(default)]
    files: Vec<FileChange>,
}
