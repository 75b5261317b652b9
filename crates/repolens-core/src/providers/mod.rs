// Platform provider implementations
pub mod github;

pub use github::GitHubFetcher;
