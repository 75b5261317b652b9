use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Page size GitHub allows per request when walking the full repo list.
const MAX_PER_PAGE: u32 = 100;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication required")]
    AuthRequired,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise instances
    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("RepoLens/0.1.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            token,
            base_url,
        }
    }

    /// Look up a user account.
    ///
    /// Returns Ok(None) on 404 so callers can tell "no such user" apart
    /// from a network or service failure.
    pub async fn get_user(&self, username: &str) -> Result<Option<GitHubUser>> {
        let url = format!(
            "{}/users/{}",
            self.base_url,
            urlencoding::encode(username)
        );

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == 404 {
            return Ok(None);
        }

        if response.status() == 401 {
            return Err(GitHubError::AuthRequired);
        }

        if response.status() == 403 || response.status() == 429 {
            return Err(GitHubError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let user: GitHubUser = response.json().await?;
        Ok(Some(user))
    }

    /// Fetch one page of a user's repositories, newest activity first.
    ///
    /// `has_next_page` comes from the Link response header, which GitHub
    /// only sends when there are more pages.
    pub async fn list_repos(&self, username: &str, per_page: u32, page: u32) -> Result<RepoPage> {
        let url = format!(
            "{}/users/{}/repos",
            self.base_url,
            urlencoding::encode(username)
        );

        let mut request = self.client.get(&url).query(&[
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("sort", "updated".to_string()),
        ]);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == 401 {
            return Err(GitHubError::AuthRequired);
        }

        if response.status() == 403 || response.status() == 429 {
            return Err(GitHubError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let has_next_page = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(link_has_next)
            .unwrap_or(false);

        let repositories: Vec<GitHubRepo> = response.json().await?;

        Ok(RepoPage {
            repositories,
            has_next_page,
        })
    }

    /// Walk every page of a user's repositories.
    pub async fn list_all_repos(&self, username: &str) -> Result<Vec<GitHubRepo>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.list_repos(username, MAX_PER_PAGE, page).await?;
            debug!(
                username,
                page,
                count = batch.repositories.len(),
                "fetched repository page"
            );
            all.extend(batch.repositories);

            if !batch.has_next_page {
                break;
            }
            page += 1;
        }

        Ok(all)
    }
}

/// One page of repository results.
#[derive(Debug, Clone)]
pub struct RepoPage {
    pub repositories: Vec<GitHubRepo>,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub html_url: String,
}

/// True when a Link header advertises a rel="next" page.
fn link_has_next(header: &str) -> bool {
    header
        .split(',')
        .any(|part| part.contains("rel=\"next\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_header_with_next_page() {
        let header = "<https://api.github.com/user/1/repos?page=2>; rel=\"next\", \
                      <https://api.github.com/user/1/repos?page=5>; rel=\"last\"";
        assert!(link_has_next(header));
    }

    #[test]
    fn link_header_on_last_page() {
        let header = "<https://api.github.com/user/1/repos?page=4>; rel=\"prev\", \
                      <https://api.github.com/user/1/repos?page=1>; rel=\"first\"";
        assert!(!link_has_next(header));
    }

    #[test]
    fn deserialize_user() {
        let json = r#"{
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat",
            "bio": null,
            "location": "San Francisco",
            "public_repos": 8
        }"#;

        let user: GitHubUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.login, "octocat");
        assert!(user.bio.is_none());
        assert_eq!(user.location.as_deref(), Some("San Francisco"));
    }

    #[test]
    fn deserialize_repo_without_language() {
        let json = r#"{
            "id": 1296269,
            "name": "Hello-World",
            "description": null,
            "language": null,
            "html_url": "https://github.com/octocat/Hello-World",
            "fork": false
        }"#;

        let repo: GitHubRepo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 1296269);
        assert!(repo.language.is_none());
        assert!(repo.description.is_none());
    }
}
