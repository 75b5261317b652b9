// GitHub provider implementation - bridges the API client with the RepoFetcher trait
use async_trait::async_trait;
use repolens_api::{GitHubClient, GitHubRepo, GitHubUser};

use crate::{
    models::{RepoPage, Repository, UserProfile},
    session::RepoFetcher,
    Result,
};

/// Wrapper around GitHubClient that implements RepoFetcher
pub struct GitHubFetcher {
    client: GitHubClient,
}

impl GitHubFetcher {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: GitHubClient::new(token),
        }
    }

    pub fn with_base_url(token: Option<String>, base_url: String) -> Self {
        Self {
            client: GitHubClient::with_base_url(token, base_url),
        }
    }
}

#[async_trait]
impl RepoFetcher for GitHubFetcher {
    async fn get_user_info(&self, username: &str) -> Result<Option<UserProfile>> {
        let user = self.client.get_user(username).await?;
        Ok(user.map(user_to_profile))
    }

    async fn get_user_repos_limited(&self, username: &str, count: u32) -> Result<RepoPage> {
        let page = self.client.list_repos(username, count, 1).await?;
        Ok(RepoPage {
            repositories: page.repositories.into_iter().map(github_to_repo).collect(),
            has_next_page: page.has_next_page,
        })
    }

    async fn get_user_repos_all(&self, username: &str) -> Result<Vec<Repository>> {
        let repos = self.client.list_all_repos(username).await?;
        Ok(repos.into_iter().map(github_to_repo).collect())
    }
}

/// Convert a GitHub API repo to our internal Repository model
fn github_to_repo(gh: GitHubRepo) -> Repository {
    Repository {
        id: gh.id,
        name: gh.name,
        description: gh.description,
        language: gh.language,
        url: gh.html_url,
    }
}

fn user_to_profile(gh: GitHubUser) -> UserProfile {
    UserProfile {
        login: gh.login,
        avatar_url: gh.avatar_url,
        html_url: gh.html_url,
        bio: gh.bio,
        location: gh.location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_conversion_keeps_optional_fields() {
        let gh = GitHubRepo {
            id: 42,
            name: "hello".to_string(),
            description: None,
            language: Some("Rust".to_string()),
            html_url: "https://github.com/octocat/hello".to_string(),
        };

        let repo = github_to_repo(gh);
        assert_eq!(repo.id, 42);
        assert!(repo.description.is_none());
        assert_eq!(repo.language.as_deref(), Some("Rust"));
    }
}
