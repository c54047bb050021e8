use chrono::{DateTime, Utc};

use crate::github::types::PullRequest;
use crate::output::menu::{MenuRow, MenuState};

/// Title length shown next to the count in the status line
pub const STATUS_TITLE_MAX: usize = 20;
/// Title length shown in each menu row
pub const MENU_TITLE_MAX: usize = 50;
/// Error text length shown in the status line
pub const ERROR_MESSAGE_MAX: usize = 50;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Cut `title` to `max_chars` characters and mark the cut with "...".
/// Counts characters, not bytes, so multi-byte titles are never split.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &title[..byte_idx]),
        None => title.to_string(),
    }
}

/// Keep the first `max_chars` characters of an error message.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

/// Format how long ago `created_at` was: "42m ago", "3h ago", "5d ago", "2w ago".
/// Each unit is floor-divided; future timestamps count as zero.
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);

    if seconds < HOUR {
        format!("{}m ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{}h ago", seconds / HOUR)
    } else if seconds < WEEK {
        format!("{}d ago", seconds / DAY)
    } else {
        format!("{}w ago", seconds / WEEK)
    }
}

/// Status line for a filtered, oldest-first PR list.
pub fn status_title(prs: &[PullRequest]) -> String {
    match prs.first() {
        None => "🟢 PRs: 0".to_string(),
        Some(oldest) => format!(
            "🔴 PRs: {} | [{}] {}",
            prs.len(),
            oldest.author,
            truncate_title(&oldest.title, STATUS_TITLE_MAX)
        ),
    }
}

/// One row per PR, newest first, each bound to the PR's web URL.
pub fn menu_rows(prs: &[PullRequest], now: DateTime<Utc>) -> Vec<MenuRow> {
    prs.iter()
        .rev()
        .map(|pr| MenuRow {
            label: format!(
                "[{}] {} ({})",
                pr.author,
                truncate_title(&pr.title, MENU_TITLE_MAX),
                relative_time(pr.created_at, now)
            ),
            url: Some(pr.url.clone()),
        })
        .collect()
}

/// Status line shown when a poll fails.
pub fn error_title(message: &str) -> String {
    format!("❌ {}", truncate_message(message, ERROR_MESSAGE_MAX))
}

/// Plain text: the status line, then numbered rows.
pub fn format_plain(state: &MenuState) -> String {
    let mut lines = vec![state.title.clone()];
    for (idx, row) in state.rows.iter().enumerate() {
        match &row.url {
            Some(url) => lines.push(format!("{:>3}. {}  {}", idx + 1, row.label, url)),
            None => lines.push(format!("     {}", row.label)),
        }
    }
    lines.join("\n")
}

/// SwiftBar / xbar plugin output: title, separator, then one line per row.
/// A bare "|" would start the parameter list, so labels swap it for "¦".
pub fn format_swiftbar(state: &MenuState) -> String {
    let mut lines = vec![state.title.replace('|', "¦"), "---".to_string()];
    for row in &state.rows {
        let label = row.label.replace('|', "¦");
        match &row.url {
            Some(url) => lines.push(format!("🔀 {} | href={}", label, url)),
            None => lines.push(label),
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn sample_pr(number: u64, author: &str, title: &str, age: Duration) -> PullRequest {
        PullRequest {
            url: format!("https://github.com/owner/repo/pull/{}", number),
            owner: "owner".to_string(),
            repo: "repo".to_string(),
            number,
            author: author.to_string(),
            title: title.to_string(),
            created_at: now() - age,
        }
    }

    #[test]
    fn test_relative_time_minutes() {
        assert_eq!(relative_time(now() - Duration::minutes(59), now()), "59m ago");
        assert_eq!(relative_time(now() - Duration::seconds(30), now()), "0m ago");
    }

    #[test]
    fn test_relative_time_hours() {
        assert_eq!(relative_time(now() - Duration::minutes(90), now()), "1h ago");
        assert_eq!(relative_time(now() - Duration::hours(23), now()), "23h ago");
    }

    #[test]
    fn test_relative_time_days() {
        assert_eq!(relative_time(now() - Duration::hours(24), now()), "1d ago");
        assert_eq!(relative_time(now() - Duration::days(6), now()), "6d ago");
    }

    #[test]
    fn test_relative_time_weeks() {
        assert_eq!(relative_time(now() - Duration::days(8), now()), "1w ago");
        assert_eq!(relative_time(now() - Duration::days(21), now()), "3w ago");
    }

    #[test]
    fn test_relative_time_future_is_zero() {
        assert_eq!(relative_time(now() + Duration::minutes(5), now()), "0m ago");
    }

    #[test]
    fn test_truncate_title_short() {
        assert_eq!(truncate_title("Fix bug", 20), "Fix bug");
        assert_eq!(truncate_title("Exactly twenty chars", 20), "Exactly twenty chars");
    }

    #[test]
    fn test_truncate_title_status_cap() {
        let title = "abcdefghijklmnopqrstuvwxy"; // 25 chars
        assert_eq!(truncate_title(title, STATUS_TITLE_MAX), "abcdefghijklmnopqrst...");
    }

    #[test]
    fn test_truncate_title_menu_cap() {
        let title = "x".repeat(60);
        let cut = truncate_title(&title, MENU_TITLE_MAX);
        assert_eq!(cut, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_truncate_title_unicode() {
        assert_eq!(truncate_title("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_status_title_empty() {
        assert_eq!(status_title(&[]), "🟢 PRs: 0");
    }

    #[test]
    fn test_status_title_uses_oldest() {
        let prs = vec![
            sample_pr(1, "alice", "Fix bug", Duration::days(3)),
            sample_pr(2, "bob", "Add feature", Duration::hours(1)),
        ];
        assert_eq!(status_title(&prs), "🔴 PRs: 2 | [alice] Fix bug");
    }

    #[test]
    fn test_status_title_truncates() {
        let prs = vec![sample_pr(1, "alice", "abcdefghijklmnopqrstuvwxy", Duration::days(1))];
        assert_eq!(status_title(&prs), "🔴 PRs: 1 | [alice] abcdefghijklmnopqrst...");
    }

    #[test]
    fn test_menu_rows_newest_first() {
        let prs = vec![
            sample_pr(1, "alice", "Oldest", Duration::days(14)),
            sample_pr(2, "bob", "Middle", Duration::hours(3)),
            sample_pr(3, "carol", "Newest", Duration::minutes(5)),
        ];
        let rows = menu_rows(&prs, now());

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "[carol] Newest (5m ago)",
                "[bob] Middle (3h ago)",
                "[alice] Oldest (2w ago)",
            ]
        );
        assert_eq!(rows[0].url.as_deref(), Some("https://github.com/owner/repo/pull/3"));
    }

    #[test]
    fn test_error_title_truncates_to_fifty() {
        let message = "e".repeat(80);
        let title = error_title(&message);
        assert_eq!(title, format!("❌ {}", "e".repeat(50)));
    }

    #[test]
    fn test_format_swiftbar() {
        let state = MenuState {
            title: "🔴 PRs: 1 | [alice] Fix bug".to_string(),
            rows: vec![MenuRow {
                label: "[alice] a|b (1h ago)".to_string(),
                url: Some("https://github.com/o/r/pull/1".to_string()),
            }],
        };
        assert_eq!(
            format_swiftbar(&state),
            "🔴 PRs: 1 ¦ [alice] Fix bug\n---\n🔀 [alice] a¦b (1h ago) | href=https://github.com/o/r/pull/1"
        );
    }

    #[test]
    fn test_format_plain_numbers_rows() {
        let state = MenuState {
            title: "🔴 PRs: 1 | [alice] Fix bug".to_string(),
            rows: vec![MenuRow {
                label: "[alice] Fix bug (1h ago)".to_string(),
                url: Some("https://github.com/o/r/pull/1".to_string()),
            }],
        };
        assert_eq!(
            format_plain(&state),
            "🔴 PRs: 1 | [alice] Fix bug\n  1. [alice] Fix bug (1h ago)  https://github.com/o/r/pull/1"
        );
    }
}
