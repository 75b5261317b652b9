// Core business logic lives here - the brain of the operation
pub mod browse;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod session;

pub use browse::BrowseState;
pub use config::{Config, ThemeMode};
pub use error::Error;
pub use session::{Envelope, FetchUpdate, RepoFetcher, SearchTicket, Session};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
