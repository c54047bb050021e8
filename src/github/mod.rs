pub mod client;
pub mod error;
pub mod review;
pub mod search;
pub mod types;

pub use client::{GitHubApi, GitHubClient};
pub use error::ApiError;
pub use review::{must_review, needs_review};
pub use search::search_candidates;
pub use types::{CommitEvent, PullRequest, Review};
