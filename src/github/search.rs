use std::collections::HashSet;

use tracing::debug;

use crate::github::client::GitHubApi;
use crate::github::error::ApiError;
use crate::github::types::PullRequest;

/// Search GitHub with every query and merge the results.
///
/// The same PR may match several queries, so results are deduplicated by URL
/// (first occurrence wins) and then sorted oldest first. A failing query
/// aborts the whole search: a partial list would hide work.
pub async fn search_candidates<A: GitHubApi>(
    api: &A,
    queries: &[String],
    per_page: u8,
) -> Result<Vec<PullRequest>, ApiError> {
    let mut all_prs = Vec::new();

    for query in queries {
        let prs = api.search_pull_requests(query, per_page).await?;
        debug!(query = %query, found = prs.len(), "query complete");
        all_prs.extend(prs);
    }

    Ok(merge_by_url(all_prs))
}

/// Deduplicate by URL, then stable-sort by creation time ascending.
pub fn merge_by_url(prs: Vec<PullRequest>) -> Vec<PullRequest> {
    let mut seen_urls = HashSet::new();
    let mut unique_prs: Vec<_> = prs
        .into_iter()
        .filter(|pr| seen_urls.insert(pr.url.clone()))
        .collect();

    unique_prs.sort_by_key(|pr| pr.created_at);
    unique_prs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{CommitEvent, Review};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashMap;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn pr(number: u64, hours_after_base: i64) -> PullRequest {
        PullRequest {
            url: format!("https://github.com/octo/widgets/pull/{}", number),
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
            number,
            author: "alice".to_string(),
            title: format!("PR {}", number),
            created_at: base_time() + Duration::hours(hours_after_base),
        }
    }

    struct QueryApi {
        results: HashMap<String, Result<Vec<PullRequest>, ApiError>>,
    }

    impl GitHubApi for QueryApi {
        async fn current_login(&self) -> Result<String, ApiError> {
            Ok("me".to_string())
        }

        async fn search_pull_requests(
            &self,
            query: &str,
            _per_page: u8,
        ) -> Result<Vec<PullRequest>, ApiError> {
            self.results.get(query).cloned().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn list_reviews(&self, _pr: &PullRequest) -> Result<Vec<Review>, ApiError> {
            Ok(Vec::new())
        }

        async fn list_commit_events(&self, _pr: &PullRequest) -> Result<Vec<CommitEvent>, ApiError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_merge_removes_duplicate_urls() {
        let merged = merge_by_url(vec![pr(1, 0), pr(2, 1), pr(1, 0), pr(3, 2), pr(2, 1)]);
        let numbers: Vec<u64> = merged.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_merge_sorts_oldest_first() {
        let merged = merge_by_url(vec![pr(3, 30), pr(1, 5), pr(2, 10)]);
        let numbers: Vec<u64> = merged.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_search_candidates_unions_queries() {
        let api = QueryApi {
            results: HashMap::from([
                ("requested".to_string(), Ok(vec![pr(2, 2), pr(4, 4)])),
                ("reviewed".to_string(), Ok(vec![pr(1, 1), pr(2, 2)])),
            ]),
        };
        let queries = vec!["requested".to_string(), "reviewed".to_string()];

        let prs = search_candidates(&api, &queries, 100).await.unwrap();
        let numbers: Vec<u64> = prs.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 4]);
    }

    #[tokio::test]
    async fn test_search_candidates_fails_when_any_query_fails() {
        let api = QueryApi {
            results: HashMap::from([
                ("requested".to_string(), Ok(vec![pr(1, 1)])),
                ("reviewed".to_string(), Err(ApiError::status(502, "Bad Gateway"))),
            ]),
        };
        let queries = vec!["requested".to_string(), "reviewed".to_string()];

        let err = search_candidates(&api, &queries, 100).await.unwrap_err();
        assert_eq!(err, ApiError::status(502, "Bad Gateway"));
    }
}
