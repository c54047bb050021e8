use tracing::warn;

use crate::github::client::GitHubApi;
use crate::github::types::{CommitEvent, PullRequest, Review};

/// Decide whether `login` still has to review a PR.
///
/// True when `login` never submitted a review, or when a commit landed
/// strictly after their latest review.
pub fn needs_review(login: &str, reviews: &[Review], commits: &[CommitEvent]) -> bool {
    let last_review = reviews
        .iter()
        .filter(|review| review.author.eq_ignore_ascii_case(login))
        .map(|review| review.submitted_at)
        .max();

    match last_review {
        None => true,
        Some(reviewed_at) => commits.iter().any(|c| c.committed_at > reviewed_at),
    }
}

/// Fetch reviews and timeline for `pr` and apply [`needs_review`].
///
/// Lookup failures are logged and answered with `true`: showing a PR that
/// was already handled is better than hiding one that was not.
pub async fn must_review<A: GitHubApi>(api: &A, pr: &PullRequest, login: &str) -> bool {
    match tokio::try_join!(api.list_reviews(pr), api.list_commit_events(pr)) {
        Ok((reviews, commits)) => needs_review(login, &reviews, &commits),
        Err(e) => {
            warn!(pr = %pr.short_ref(), error = %e, "review lookup failed, keeping PR in the list");
            true
        }
    }
}
