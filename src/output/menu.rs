use chrono::{DateTime, Utc};

use crate::credentials::ENV_TOKEN_VAR;
use crate::github::types::PullRequest;
use crate::output::formatter::{error_title, menu_rows, status_title};

/// A clickable entry; rows without a URL are informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub label: String,
    pub url: Option<String>,
}

/// Everything the menu shows: a status line and the rows below it.
/// Rebuilt from scratch on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub title: String,
    pub rows: Vec<MenuRow>,
}

impl MenuState {
    /// Shown before the first poll completes
    pub fn pending() -> Self {
        Self {
            title: "PRs: -".to_string(),
            rows: Vec::new(),
        }
    }

    /// Shown instead of polling when no token is configured
    pub fn missing_token() -> Self {
        Self {
            title: format!("⚠️ Set {} env var", ENV_TOKEN_VAR),
            rows: vec![
                MenuRow {
                    label: format!("Set {} environment variable", ENV_TOKEN_VAR),
                    url: None,
                },
                MenuRow {
                    label: "See README for instructions".to_string(),
                    url: None,
                },
            ],
        }
    }

    /// Error title; previously rendered rows are dropped.
    pub fn error(message: &str) -> Self {
        Self {
            title: error_title(message),
            rows: Vec::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title.starts_with('❌')
    }

    /// URL of the n-th row (0-based), if that row is clickable
    pub fn url_at(&self, index: usize) -> Option<&str> {
        self.rows.get(index).and_then(|row| row.url.as_deref())
    }
}

/// Turn the outcome of one poll into the menu to display.
pub fn render<E: std::fmt::Display>(
    result: &Result<Vec<PullRequest>, E>,
    now: DateTime<Utc>,
) -> MenuState {
    match result {
        Ok(prs) => MenuState {
            title: status_title(prs),
            rows: menu_rows(prs, now),
        },
        Err(e) => MenuState::error(&e.to_string()),
    }
}
