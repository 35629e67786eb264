//! GitHub backend for the hosting API
//!
//! Talks to the GitHub REST v3 API with a plain reqwest client. A 404 on a
//! content or license lookup is reported as [`Lookup::NotFound`]; every other
//! non-success status is a [`HostError`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{ContentFile, HostError, HostingApi, Lookup, Repository, RepositoryLicense};

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for repository listing (GitHub's maximum)
const PER_PAGE: usize = 100;

/// GitHub API backend
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for api.github.com
    pub fn new(token: Option<String>) -> anyhow::Result<Self> {
        Self::with_options(DEFAULT_API_URL, token, DEFAULT_TIMEOUT)
    }

    /// Create a client for a specific API endpoint (GitHub Enterprise, tests)
    pub fn with_options(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("modsync/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");

        match &self.token {
            Some(token) => request.header("Authorization", format!("token {token}")),
            None => request,
        }
    }

    /// GET a JSON document; 404 maps to `NotFound`
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Lookup<T> {
        debug!("GET {}", url);

        let response = match self.request(url).send().await {
            Ok(response) => response,
            Err(e) => return Lookup::Failed(transport_error(e)),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Lookup::NotFound;
        }
        if !status.is_success() {
            return Lookup::Failed(HostError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response.json::<T>().await {
            Ok(body) => Lookup::Found(body),
            Err(e) if e.is_timeout() => Lookup::Failed(HostError::Timeout),
            Err(e) => Lookup::Failed(HostError::Decode(format!("{url}: {e}"))),
        }
    }
}

fn transport_error(err: reqwest::Error) -> HostError {
    if err.is_timeout() {
        HostError::Timeout
    } else {
        HostError::Transport(err.to_string())
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn list_repositories(&self, user: &str) -> Result<Vec<Repository>, HostError> {
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/users/{}/repos?per_page={}&page={}",
                self.base_url, user, PER_PAGE, page
            );

            let batch: Vec<Repository> = match self.get_json(&url).await {
                Lookup::Found(batch) => batch,
                // An unknown user is not an empty catalog
                Lookup::NotFound => return Err(HostError::Status { status: 404, url }),
                Lookup::Failed(err) => return Err(err),
            };

            let last_page = batch.len() < PER_PAGE;
            repos.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }

        debug!("Listed {} repositories for {}", repos.len(), user);
        Ok(repos)
    }

    async fn get_contents(&self, repo: &Repository, path: &str) -> Lookup<ContentFile> {
        let url = format!(
            "{}/repos/{}/contents/{}",
            self.base_url, repo.full_name, path
        );
        self.get_json(&url).await
    }

    async fn get_license(&self, repo: &Repository) -> Lookup<RepositoryLicense> {
        let url = format!("{}/repos/{}/license", self.base_url, repo.full_name);
        self.get_json(&url).await
    }

    fn name(&self) -> &'static str {
        "github"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard, token: Option<&str>) -> GitHubClient {
        GitHubClient::with_options(
            &server.url(),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn repo_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "name": name,
            "full_name": format!("alice/{name}"),
            "clone_url": format!("https://github.com/alice/{name}.git"),
            "private": false
        })
    }

    #[tokio::test]
    async fn test_get_contents_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/alice/mod-a/contents/update.json")
            .match_header("authorization", "token secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "name": "update.json",
                    "path": "update.json",
                    "download_url": "https://raw.githubusercontent.com/alice/mod-a/main/update.json"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let github = client(&server, Some("secret"));
        let lookup = github
            .get_contents(&Repository::on_github("alice", "mod-a"), "update.json")
            .await;

        match lookup {
            Lookup::Found(file) => assert_eq!(
                file.download_url.as_deref(),
                Some("https://raw.githubusercontent.com/alice/mod-a/main/update.json")
            ),
            other => panic!("expected Found, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_and_server_error_are_distinct() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/alice/mod-a/contents/module.prop")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/alice/mod-a/license")
            .with_status(502)
            .create_async()
            .await;

        let github = client(&server, None);
        let repo = Repository::on_github("alice", "mod-a");

        assert_eq!(
            github.get_contents(&repo, "module.prop").await,
            Lookup::NotFound
        );
        match github.get_license(&repo).await {
            Lookup::Failed(HostError::Status { status, .. }) => assert_eq!(status, 502),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_license_spdx() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/alice/mod-a/license")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "name": "LICENSE",
                    "license": {"key": "gpl-3.0", "name": "GNU General Public License v3.0", "spdx_id": "GPL-3.0"}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let github = client(&server, None);
        match github.get_license(&Repository::on_github("alice", "mod-a")).await {
            Lookup::Found(license) => assert_eq!(license.spdx_id(), Some("GPL-3.0")),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/alice/mod-a/contents/changelog.md")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let github = client(&server, None);
        let lookup = github
            .get_contents(&Repository::on_github("alice", "mod-a"), "changelog.md")
            .await;
        assert!(matches!(lookup, Lookup::Failed(HostError::Decode(_))));
    }

    #[tokio::test]
    async fn test_list_repositories_follows_pages() {
        let mut server = mockito::Server::new_async().await;

        let first: Vec<_> = (0..PER_PAGE).map(|i| repo_json(&format!("repo-{i:03}"))).collect();
        let page_one = server
            .mock("GET", "/users/alice/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(serde_json::Value::Array(first).to_string())
            .create_async()
            .await;
        let page_two = server
            .mock("GET", "/users/alice/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(serde_json::json!([repo_json("last")]).to_string())
            .create_async()
            .await;

        let github = client(&server, None);
        let repos = github.list_repositories("alice").await.unwrap();

        assert_eq!(repos.len(), PER_PAGE + 1);
        assert_eq!(repos[0].name, "repo-000");
        assert_eq!(repos[PER_PAGE].name, "last");
        assert_eq!(repos[PER_PAGE].full_name, "alice/last");
        page_one.assert_async().await;
        page_two.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_repositories_unknown_user() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/nobody/repos")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let github = client(&server, None);
        let err = github.list_repositories("nobody").await.unwrap_err();
        assert!(matches!(err, HostError::Status { status: 404, .. }));
    }
}
