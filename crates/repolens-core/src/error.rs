use thiserror::Error;

/// All the ways things can go wrong in RepoLens
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<repolens_api::GitHubError> for Error {
    fn from(err: repolens_api::GitHubError) -> Self {
        Error::ApiError(err.to_string())
    }
}
