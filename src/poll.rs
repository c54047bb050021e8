use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::github::{must_review, search_candidates, ApiError, GitHubApi, PullRequest};
use crate::output::{render, MenuState};

/// Search parameters for one poll.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub queries: Vec<String>,
    pub per_page: u8,
    pub max_concurrent_lookups: usize,
}

impl From<&Config> for PollSettings {
    fn from(config: &Config) -> Self {
        Self {
            queries: config
                .queries
                .iter()
                .filter(|q| !q.trim().is_empty())
                .cloned()
                .collect(),
            per_page: config.per_page,
            max_concurrent_lookups: config.max_concurrent_lookups.max(1),
        }
    }
}

/// Everything one poll needs, built once at startup and shared by every tick.
///
/// The authenticated login is looked up on first use and kept; a failed
/// lookup fails that tick and is retried on the next one. Review decisions
/// are never kept between ticks.
pub struct Poller<A> {
    api: A,
    settings: PollSettings,
    login: OnceCell<String>,
}

impl<A: GitHubApi> Poller<A> {
    pub fn new(api: A, settings: PollSettings) -> Self {
        Self {
            api,
            settings,
            login: OnceCell::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    async fn login(&self) -> Result<&str, ApiError> {
        let login = self
            .login
            .get_or_try_init(|| async {
                let login = self.api.current_login().await?;
                info!(login = %login, "Authenticated");
                Ok::<_, ApiError>(login)
            })
            .await?;
        Ok(login.as_str())
    }

    /// Search, then keep the PRs that still need the user's review.
    /// The result is ordered oldest first.
    pub async fn poll(&self) -> Result<Vec<PullRequest>, ApiError> {
        let login = self.login().await?;

        let candidates =
            search_candidates(&self.api, &self.settings.queries, self.settings.per_page).await?;
        debug!(candidates = candidates.len(), "classifying");

        let api = &self.api;
        let decisions: Vec<bool> = stream::iter(candidates.clone())
            .map(|pr| async move { must_review(api, &pr, login).await })
            .buffered(self.settings.max_concurrent_lookups)
            .collect()
            .await;

        Ok(candidates
            .into_iter()
            .zip(decisions)
            .filter_map(|(pr, needed)| needed.then_some(pr))
            .collect())
    }

    /// Run one poll and render its outcome.
    pub async fn tick(&self, now: DateTime<Utc>) -> MenuState {
        let result = self.poll().await;
        log_outcome(&result);
        render(&result, now)
    }
}

fn log_outcome(result: &Result<Vec<PullRequest>, ApiError>) {
    match result {
        Ok(prs) => {
            info!("Found {} PRs awaiting your review", prs.len());
            if let Some(oldest) = prs.first() {
                info!("Oldest PR: [{}] {}", oldest.author, oldest.title);
            }
        }
        Err(ApiError::Parse { message }) => error!("Unexpected error: {}", message),
        Err(e) => error!("Error checking GitHub: {}", e),
    }
}
