//! Fetch orchestration for a username search.
//!
//! A search kicks off the profile fetch and the repository fetches
//! concurrently. Results come back as [`Envelope`]s tagged with the epoch
//! of the search that issued them; [`Session::apply`] drops anything from
//! a superseded search, so a slow response can never clobber the state of
//! a newer one. In-flight requests are not aborted, just ignored.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::browse::BrowseState;
use crate::models::{RepoPage, Repository, UserProfile, PAGE_SIZE};
use crate::Result;

/// Delay before the quick first-page fetch so the loading indicator does
/// not flash on fast responses. Cosmetic, not a correctness requirement.
const LOADING_FLASH_DELAY: Duration = Duration::from_millis(200);

/// What the orchestration needs from a repository host.
///
/// A trait so the session can be exercised against a mock in tests and so
/// another provider could slot in without touching the orchestration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoFetcher: Send + Sync {
    /// `Ok(None)` means the account does not exist, which is an expected
    /// outcome and distinct from a request failure.
    async fn get_user_info(&self, username: &str) -> Result<Option<UserProfile>>;

    async fn get_user_repos_limited(&self, username: &str, count: u32) -> Result<RepoPage>;

    async fn get_user_repos_all(&self, username: &str) -> Result<Vec<Repository>>;
}

/// Handle for one search: the username plus the epoch it was issued under.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub epoch: u64,
    pub username: String,
}

/// A fetch result on its way back to the session.
#[derive(Debug)]
pub enum FetchUpdate {
    Profile(Option<UserProfile>),
    FirstPage(RepoPage),
    FullList(Vec<Repository>),
    Failed(String),
}

/// A fetch result tagged with the epoch of the search that issued it.
#[derive(Debug)]
pub struct Envelope {
    pub epoch: u64,
    pub update: FetchUpdate,
}

/// Single owner of everything the view needs for the current search.
#[derive(Debug, Default)]
pub struct Session {
    epoch: u64,
    username: Option<String>,
    profile: Option<UserProfile>,
    user_not_found: bool,
    loading: bool,
    error_message: Option<String>,
    browse: BrowseState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, discarding all state from the previous one.
    ///
    /// Returns `None` for blank input. Bumping the epoch is what retires
    /// any responses still in flight for the previous username.
    pub fn begin_search(&mut self, input: &str) -> Option<SearchTicket> {
        let username = input.trim();
        if username.is_empty() {
            return None;
        }

        self.epoch += 1;
        self.username = Some(username.to_string());
        self.profile = None;
        self.user_not_found = false;
        self.loading = true;
        self.error_message = None;
        self.browse.clear();

        Some(SearchTicket {
            epoch: self.epoch,
            username: username.to_string(),
        })
    }

    /// Apply a fetch result, unless it belongs to a superseded search.
    pub fn apply(&mut self, envelope: Envelope) {
        if envelope.epoch != self.epoch {
            debug!(
                stale = envelope.epoch,
                current = self.epoch,
                "dropping stale fetch result"
            );
            return;
        }

        match envelope.update {
            FetchUpdate::Profile(Some(profile)) => {
                self.user_not_found = false;
                self.profile = Some(profile);
                self.error_message = None;
            }
            FetchUpdate::Profile(None) => {
                self.user_not_found = true;
                self.profile = None;
                self.loading = false;
                self.browse.clear();
            }
            FetchUpdate::FirstPage(page) => {
                // Repository results for a missing account are abandoned
                if self.user_not_found {
                    return;
                }
                self.browse
                    .install_first_page(page.repositories, page.has_next_page);
                self.loading = false;
            }
            FetchUpdate::FullList(repositories) => {
                if self.user_not_found {
                    return;
                }
                self.browse.set_repositories(repositories);
                self.loading = false;
                self.error_message = None;
            }
            FetchUpdate::Failed(message) => {
                self.error_message = Some(message);
                self.loading = false;
            }
        }
    }

    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.browse.set_name_filter(filter);
    }

    pub fn set_language_filter(&mut self, filter: impl Into<String>) {
        self.browse.set_language_filter(filter);
    }

    pub fn change_page(&mut self, delta: isize) {
        self.browse.change_page(delta);
    }

    pub fn browse(&self) -> &BrowseState {
        &self.browse
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn user_not_found(&self) -> bool {
        self.user_not_found
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Run the fetch sequence for one search ticket.
///
/// The profile fetch runs concurrently with the repository fetches; the
/// first page goes out after a short delay, then the full list follows.
/// Every result is sent back tagged with the ticket's epoch. Failures are
/// converted into user-visible messages here and never escape.
pub async fn run_search(
    fetcher: Arc<dyn RepoFetcher>,
    ticket: SearchTicket,
    tx: UnboundedSender<Envelope>,
) {
    let SearchTicket { epoch, username } = ticket;

    let profile_task = {
        let fetcher = Arc::clone(&fetcher);
        let username = username.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let update = match fetcher.get_user_info(&username).await {
                Ok(profile) => FetchUpdate::Profile(profile),
                Err(err) => {
                    error!(%username, %err, "profile fetch failed");
                    FetchUpdate::Failed("Error fetching data.".to_string())
                }
            };
            let _ = tx.send(Envelope { epoch, update });
        })
    };

    tokio::time::sleep(LOADING_FLASH_DELAY).await;

    match fetcher
        .get_user_repos_limited(&username, PAGE_SIZE as u32)
        .await
    {
        Ok(page) => {
            let _ = tx.send(Envelope {
                epoch,
                update: FetchUpdate::FirstPage(page),
            });
        }
        Err(err) => {
            error!(%username, %err, "first repository page fetch failed");
            let _ = tx.send(Envelope {
                epoch,
                update: FetchUpdate::Failed("Error fetching data.".to_string()),
            });
            let _ = profile_task.await;
            return;
        }
    }

    match fetcher.get_user_repos_all(&username).await {
        Ok(repositories) => {
            let _ = tx.send(Envelope {
                epoch,
                update: FetchUpdate::FullList(repositories),
            });
        }
        Err(err) => {
            error!(%username, %err, "full repository list fetch failed");
            let _ = tx.send(Envelope {
                epoch,
                update: FetchUpdate::Failed("Error fetching all repositories.".to_string()),
            });
        }
    }

    let _ = profile_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tokio::sync::mpsc;

    fn repo(id: u64, name: &str) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            description: None,
            language: Some("Rust".to_string()),
            url: format!("https://github.com/octocat/{name}"),
        }
    }

    fn profile(login: &str) -> UserProfile {
        UserProfile {
            login: login.to_string(),
            avatar_url: format!("https://avatars.githubusercontent.com/{login}"),
            html_url: format!("https://github.com/{login}"),
            bio: None,
            location: None,
        }
    }

    #[test]
    fn blank_input_starts_no_search() {
        let mut session = Session::new();
        assert!(session.begin_search("").is_none());
        assert!(session.begin_search("   ").is_none());
        assert!(!session.loading());
    }

    #[test]
    fn begin_search_clears_previous_state() {
        let mut session = Session::new();
        let ticket = session.begin_search("octocat").unwrap();
        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::Profile(Some(profile("octocat"))),
        });
        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::FullList(vec![repo(1, "hello")]),
        });
        assert!(session.profile().is_some());
        assert_eq!(session.browse().total_len(), 1);

        let next = session.begin_search("torvalds").unwrap();
        assert!(next.epoch > ticket.epoch);
        assert!(session.profile().is_none());
        assert!(session.loading());
        assert_eq!(session.browse().total_len(), 0);
        assert_eq!(session.browse().name_filter(), "");
    }

    #[test]
    fn stale_epoch_is_dropped() {
        let mut session = Session::new();
        let old = session.begin_search("octocat").unwrap();
        let _new = session.begin_search("torvalds").unwrap();

        session.apply(Envelope {
            epoch: old.epoch,
            update: FetchUpdate::FullList(vec![repo(1, "stale")]),
        });

        assert_eq!(session.browse().total_len(), 0);
        assert!(session.loading());
    }

    #[test]
    fn user_not_found_abandons_repository_results() {
        let mut session = Session::new();
        let ticket = session.begin_search("ghost").unwrap();

        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::Profile(None),
        });
        assert!(session.user_not_found());
        assert!(!session.loading());

        // The repository fetches were already in flight; their results land
        // after the not-found verdict and must be ignored.
        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::FirstPage(RepoPage {
                repositories: vec![repo(1, "phantom")],
                has_next_page: false,
            }),
        });
        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::FullList(vec![repo(1, "phantom")]),
        });

        assert!(session.browse().displayed().is_empty());
        assert_eq!(session.browse().total_len(), 0);
    }

    #[test]
    fn failure_sets_message_and_keeps_partial_data() {
        let mut session = Session::new();
        let ticket = session.begin_search("octocat").unwrap();

        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::FirstPage(RepoPage {
                repositories: vec![repo(1, "hello")],
                has_next_page: false,
            }),
        });
        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::Failed("Error fetching all repositories.".to_string()),
        });

        assert_eq!(
            session.error_message(),
            Some("Error fetching all repositories.")
        );
        assert!(!session.loading());
        assert_eq!(session.browse().displayed().len(), 1);
    }

    #[test]
    fn profile_success_clears_an_earlier_error() {
        let mut session = Session::new();
        let ticket = session.begin_search("octocat").unwrap();

        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::Failed("Error fetching data.".to_string()),
        });
        assert!(session.error_message().is_some());

        session.apply(Envelope {
            epoch: ticket.epoch,
            update: FetchUpdate::Profile(Some(profile("octocat"))),
        });
        assert!(session.error_message().is_none());
        assert!(session.profile().is_some());
    }

    #[tokio::test]
    async fn run_search_happy_path() {
        let mut fetcher = MockRepoFetcher::new();
        fetcher
            .expect_get_user_info()
            .returning(|login| Ok(Some(profile(login))));
        fetcher.expect_get_user_repos_limited().returning(|_, _| {
            Ok(RepoPage {
                repositories: vec![repo(1, "hello")],
                has_next_page: true,
            })
        });
        fetcher
            .expect_get_user_repos_all()
            .returning(|_| Ok((1..=25).map(|i| repo(i, &format!("r{i}"))).collect()));

        let mut session = Session::new();
        let ticket = session.begin_search("octocat").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        run_search(Arc::new(fetcher), ticket, tx).await;

        while let Ok(envelope) = rx.try_recv() {
            session.apply(envelope);
        }

        assert_eq!(session.profile().unwrap().login, "octocat");
        assert!(!session.loading());
        assert!(session.error_message().is_none());
        assert_eq!(session.browse().total_len(), 25);
        assert_eq!(session.browse().displayed().len(), 10);
        assert!(session.browse().has_next_page());
    }

    #[tokio::test]
    async fn run_search_user_not_found() {
        let mut fetcher = MockRepoFetcher::new();
        fetcher.expect_get_user_info().returning(|_| Ok(None));
        // The repository fetches still run; their results get abandoned.
        fetcher.expect_get_user_repos_limited().returning(|_, _| {
            Ok(RepoPage {
                repositories: vec![repo(1, "phantom")],
                has_next_page: false,
            })
        });
        fetcher
            .expect_get_user_repos_all()
            .returning(|_| Ok(vec![repo(1, "phantom")]));

        let mut session = Session::new();
        let ticket = session.begin_search("ghost").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        run_search(Arc::new(fetcher), ticket, tx).await;

        while let Ok(envelope) = rx.try_recv() {
            session.apply(envelope);
        }

        assert!(session.user_not_found());
        assert!(session.profile().is_none());
        assert_eq!(session.browse().total_len(), 0);
        assert!(session.browse().displayed().is_empty());
    }

    #[tokio::test]
    async fn run_search_first_page_failure_skips_full_fetch() {
        let mut fetcher = MockRepoFetcher::new();
        fetcher
            .expect_get_user_info()
            .returning(|login| Ok(Some(profile(login))));
        fetcher
            .expect_get_user_repos_limited()
            .returning(|_, _| Err(Error::ApiError("boom".to_string())));
        fetcher.expect_get_user_repos_all().times(0);

        let mut session = Session::new();
        let ticket = session.begin_search("octocat").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        run_search(Arc::new(fetcher), ticket, tx).await;

        while let Ok(envelope) = rx.try_recv() {
            session.apply(envelope);
        }

        assert_eq!(session.error_message(), Some("Error fetching data."));
        assert!(!session.loading());
    }
}
