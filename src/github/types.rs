use chrono::{DateTime, Utc};
use octocrab::models::issues::Issue;
use octocrab::models::pulls;
use serde::Deserialize;

use crate::github::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub url: String,   // HTML URL, also the dedup key
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub author: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl PullRequest {
    /// Return a short reference in the format "owner/repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }

    /// Convert a search hit into a pull request.
    ///
    /// Returns `Ok(None)` for plain issues. Owner and repo come from
    /// `repository_url`, which has the shape `.../repos/{owner}/{repo}`.
    pub fn from_issue(issue: Issue) -> Result<Option<Self>, ApiError> {
        if issue.pull_request.is_none() {
            return Ok(None);
        }

        let (owner, repo) = split_repository_url(issue.repository_url.as_str())?;

        Ok(Some(PullRequest {
            url: issue.html_url.to_string(),
            owner,
            repo,
            number: issue.number,
            author: issue.user.login,
            title: issue.title,
            created_at: issue.created_at,
        }))
    }
}

fn split_repository_url(url: &str) -> Result<(String, String), ApiError> {
    let parts: Vec<&str> = url.trim_end_matches('/').rsplitn(3, '/').collect();
    match parts.as_slice() {
        [repo, owner, rest] if !repo.is_empty() && !owner.is_empty() && rest.ends_with("/repos") => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ApiError::parse(format!("invalid repository_url: {}", url))),
    }
}

/// A submitted review on a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub author: String,
    pub submitted_at: DateTime<Utc>,
}

impl Review {
    /// Pending reviews have no `submitted_at`, and reviews by deleted accounts
    /// have no user. Neither can be a submitted review by the current user.
    pub fn from_parts(author: Option<String>, submitted_at: Option<DateTime<Utc>>) -> Option<Self> {
        Some(Review {
            author: author?,
            submitted_at: submitted_at?,
        })
    }

    pub fn from_model(review: pulls::Review) -> Option<Self> {
        Self::from_parts(review.user.map(|u| u.login), review.submitted_at)
    }
}

/// A "committed" entry from a pull request's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitEvent {
    pub committed_at: DateTime<Utc>,
}

/// Raw timeline entry. Timeline entries are heterogeneous, so only the
/// fields needed to date a commit are declared.
#[derive(Debug, Deserialize)]
pub struct TimelineEntry {
    pub event: Option<String>,
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
}

#[derive(Debug, Deserialize)]
pub struct GitSignature {
    pub date: Option<DateTime<Utc>>,
}

impl TimelineEntry {
    /// Extract the commit timestamp of a "committed" event.
    ///
    /// Returns `Ok(None)` for every other event type. The author date is
    /// preferred, the committer date is the fallback.
    pub fn into_commit_event(self) -> Result<Option<CommitEvent>, ApiError> {
        if self.event.as_deref() != Some("committed") {
            return Ok(None);
        }

        let date = self
            .author
            .and_then(|a| a.date)
            .or_else(|| self.committer.and_then(|c| c.date))
            .ok_or_else(|| ApiError::parse("committed event without a commit date"))?;

        Ok(Some(CommitEvent { committed_at: date }))
    }
}
