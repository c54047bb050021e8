use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use octocrab::models::issues::Issue;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::github::error::ApiError;
use crate::github::types::{CommitEvent, PullRequest, Review, TimelineEntry};

/// Largest page size the GitHub REST API accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Upper bound on pages followed for one review list or timeline.
pub const MAX_PAGES: usize = 10;

/// The GitHub calls the poll cycle depends on.
///
/// `GitHubClient` talks to the real API; tests substitute an in-memory fake.
pub trait GitHubApi: Send + Sync {
    /// Login of the user the token belongs to.
    fn current_login(&self) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// One page of issue search results, oldest first.
    fn search_pull_requests(
        &self,
        query: &str,
        per_page: u8,
    ) -> impl Future<Output = Result<Vec<PullRequest>, ApiError>> + Send;

    /// All submitted reviews on a pull request.
    fn list_reviews(
        &self,
        pr: &PullRequest,
    ) -> impl Future<Output = Result<Vec<Review>, ApiError>> + Send;

    /// All "committed" events from a pull request's timeline.
    fn list_commit_events(
        &self,
        pr: &PullRequest,
    ) -> impl Future<Output = Result<Vec<CommitEvent>, ApiError>> + Send;
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
}

/// Authenticated octocrab client with a fixed deadline on every request.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    timeout: Duration,
}

impl GitHubClient {
    /// Create an authenticated GitHub client using a personal access token
    pub fn new(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        // rustls 0.23+ needs a process-wide crypto provider; a second install is a no-op error
        let _ = rustls::crypto::ring::default_provider().install_default();

        if token.chars().any(char::is_control) {
            bail!("GitHub token contains control characters");
        }

        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_url.to_string())
            .map_err(|e| anyhow!("invalid api_url {}: {e}", base_url))?
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| anyhow!("Failed to create GitHub client: {e}"))?;

        Ok(Self { octocrab, timeout })
    }

    async fn send<T>(
        &self,
        request: impl Future<Output = octocrab::Result<T>>,
    ) -> Result<T, ApiError> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::timed_out()),
        }
    }

    /// Fetch `route` and every page after it, up to `MAX_PAGES`.
    async fn get_all<T>(&self, route: &str) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        debug!(route, "GET");
        let params = PageParams {
            per_page: MAX_PER_PAGE,
        };
        let mut first: Page<T> = self
            .send(self.octocrab.get(route, Some(&params)))
            .await?;
        let items = first.take_items();

        collect_pages(items, first.next, MAX_PAGES, |uri| async move {
            let page: Option<Page<T>> = self.send(self.octocrab.get_page(&Some(uri))).await?;
            Ok(page.map(|mut page| (page.take_items(), page.next)))
        })
        .await
    }
}

/// Append pages while the previous one points at a next page.
///
/// `first` is the content of page one and `next` its cursor. Reaching
/// `max_pages` with a cursor still pending is an error: a truncated list
/// could hide the newest reviews or commits.
async fn collect_pages<T, C, F, Fut>(
    first: Vec<T>,
    mut next: Option<C>,
    max_pages: usize,
    mut fetch: F,
) -> Result<Vec<T>, ApiError>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<Option<(Vec<T>, Option<C>)>, ApiError>>,
{
    let mut items = first;
    let mut pages = 1;

    while let Some(cursor) = next.take() {
        if pages >= max_pages {
            return Err(ApiError::parse(format!(
                "listing has more than {} pages",
                max_pages
            )));
        }
        match fetch(cursor).await? {
            Some((page_items, following)) => {
                items.extend(page_items);
                next = following;
                pages += 1;
            }
            None => break,
        }
    }

    Ok(items)
}

impl GitHubApi for GitHubClient {
    async fn current_login(&self) -> Result<String, ApiError> {
        let user = self.send(self.octocrab.current().user()).await?;
        Ok(user.login)
    }

    async fn search_pull_requests(
        &self,
        query: &str,
        per_page: u8,
    ) -> Result<Vec<PullRequest>, ApiError> {
        let page: Page<Issue> = self
            .send(
                self.octocrab
                    .search()
                    .issues_and_pull_requests(query)
                    .sort("created")
                    .order("asc")
                    .per_page(per_page.clamp(1, MAX_PER_PAGE))
                    .send(),
            )
            .await?;

        debug!(query, total = ?page.total_count, returned = page.items.len(), "search complete");

        let mut prs = Vec::with_capacity(page.items.len());
        for issue in page.items {
            if let Some(pr) = PullRequest::from_issue(issue)? {
                prs.push(pr);
            }
        }
        Ok(prs)
    }

    async fn list_reviews(&self, pr: &PullRequest) -> Result<Vec<Review>, ApiError> {
        let route = format!("/repos/{}/{}/pulls/{}/reviews", pr.owner, pr.repo, pr.number);
        let reviews: Vec<octocrab::models::pulls::Review> = self.get_all(&route).await?;
        Ok(reviews.into_iter().filter_map(Review::from_model).collect())
    }

    async fn list_commit_events(&self, pr: &PullRequest) -> Result<Vec<CommitEvent>, ApiError> {
        let route = format!("/repos/{}/{}/issues/{}/timeline", pr.owner, pr.repo, pr.number);
        let entries: Vec<TimelineEntry> = self.get_all(&route).await?;

        let mut commits = Vec::new();
        for entry in entries {
            if let Some(commit) = entry.into_commit_event()? {
                commits.push(commit);
            }
        }
        Ok(commits)
    }
}
