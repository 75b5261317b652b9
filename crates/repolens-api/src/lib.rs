// GitHub REST API client
pub mod github;

// Re-export common types
pub use github::{GitHubClient, GitHubError, GitHubRepo, GitHubUser, RepoPage};
