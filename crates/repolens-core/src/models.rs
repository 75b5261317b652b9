use serde::{Deserialize, Serialize};

/// How many repositories fit on one page of results.
pub const PAGE_SIZE: usize = 10;

/// Repository model - the star of the show
///
/// Immutable once fetched; the whole list is discarded when a new
/// username is searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    /// Primary language reported for the repository, when there is one.
    pub language: Option<String>,
    pub url: String,
}

/// Profile metadata for the account being browsed.
///
/// Replaced wholesale on every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// One page of repositories plus whether more pages exist upstream.
#[derive(Debug, Clone)]
pub struct RepoPage {
    pub repositories: Vec<Repository>,
    pub has_next_page: bool,
}
