use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::output::MenuState;

const FLASH_SECS: u64 = 3;

pub struct App {
    pub menu: MenuState,
    pub list_state: ListState,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Option<Instant>,
    pub poll_interval: Duration,
    /// False when there is no token; the menu then stays on the setup hint.
    pub polling_enabled: bool,
    pub needs_refresh: bool,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl App {
    /// App waiting for its first poll
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            menu: MenuState::pending(),
            list_state: ListState::default(),
            flash_message: None,
            last_refresh: None,
            poll_interval,
            polling_enabled: true,
            needs_refresh: true,
            should_quit: false,
            is_loading: false,
            spinner_frame: 0,
        }
    }

    /// App that shows the missing-token hint and never polls
    pub fn missing_token(poll_interval: Duration) -> Self {
        Self {
            menu: MenuState::missing_token(),
            polling_enabled: false,
            needs_refresh: false,
            ..Self::new(poll_interval)
        }
    }

    pub fn next_row(&mut self) {
        let len = self.menu.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.menu.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn selected_url(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.menu.url_at(i))
    }

    /// Open the selected PR in the browser
    pub fn open_selected(&mut self) {
        let Some(url) = self.selected_url().map(str::to_string) else {
            return;
        };
        match crate::browser::open_url(&url) {
            Ok(()) => self.show_flash(format!("Opened: {}", url)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to open browser");
                self.show_flash(format!("Failed to open browser: {}", e));
            }
        }
    }

    /// Handle the poll timer. A tick that lands while a poll is still in
    /// flight is dropped, not queued.
    pub fn on_refresh_timer(&mut self, poll_in_flight: bool) {
        if poll_in_flight {
            tracing::debug!("previous poll still running, skipping tick");
        } else if self.polling_enabled {
            self.needs_refresh = true;
        }
    }

    /// Claim the pending refresh request if a poll may start now.
    ///
    /// Returns false while another poll is in flight; the request stays
    /// pending so a manual refresh starts once the slot frees up.
    pub fn start_poll(&mut self, poll_in_flight: bool) -> bool {
        if !self.needs_refresh || poll_in_flight || !self.polling_enabled {
            return false;
        }
        self.needs_refresh = false;
        self.is_loading = true;
        true
    }

    /// Install the result of a finished poll
    pub fn finish_poll(&mut self, menu: MenuState) {
        self.update_menu(menu);
        self.is_loading = false;
    }

    /// Ask for a poll now instead of waiting for the timer
    pub fn request_refresh(&mut self) {
        if self.polling_enabled {
            self.needs_refresh = true;
            self.show_flash("Refreshing...".to_string());
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Replace the whole menu with the result of a poll
    pub fn update_menu(&mut self, menu: MenuState) {
        self.menu = menu;

        // Preserve selection if possible
        let len = self.menu.rows.len();
        if len == 0 {
            self.list_state.select(None);
        } else if let Some(selected) = self.list_state.selected() {
            if selected >= len {
                self.list_state.select(Some(len - 1));
            }
        } else {
            self.list_state.select(Some(0));
        }

        self.last_refresh = Some(Instant::now());
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MenuRow;

    fn menu_with_rows(n: usize) -> MenuState {
        MenuState {
            title: format!("🔴 PRs: {} | [a] t", n),
            rows: (0..n)
                .map(|i| MenuRow {
                    label: format!("row {}", i),
                    url: Some(format!("https://github.com/o/r/pull/{}", i)),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_app_wants_first_poll() {
        let app = App::new(Duration::from_secs(5));
        assert!(app.needs_refresh);
        assert!(app.polling_enabled);
        assert_eq!(app.menu.title, "PRs: -");
    }

    #[test]
    fn test_missing_token_never_polls() {
        let mut app = App::missing_token(Duration::from_secs(5));
        assert!(!app.needs_refresh);
        app.request_refresh();
        assert!(!app.needs_refresh);
        assert!(app.menu.title.starts_with("⚠️"));
    }

    #[test]
    fn test_update_menu_selects_first_row() {
        let mut app = App::new(Duration::from_secs(5));
        app.update_menu(menu_with_rows(3));
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.selected_url(), Some("https://github.com/o/r/pull/0"));
        assert!(app.last_refresh.is_some());
    }

    #[test]
    fn test_update_menu_clamps_selection() {
        let mut app = App::new(Duration::from_secs(5));
        app.update_menu(menu_with_rows(3));
        app.list_state.select(Some(2));
        app.update_menu(menu_with_rows(1));
        assert_eq!(app.list_state.selected(), Some(0));

        app.update_menu(MenuState::error("boom"));
        assert_eq!(app.list_state.selected(), None);
        assert_eq!(app.selected_url(), None);
    }

    #[test]
    fn test_timer_tick_dropped_while_poll_in_flight() {
        let mut app = App::new(Duration::from_secs(5));
        assert!(app.start_poll(false));
        assert!(app.is_loading);

        // Two timer ticks arrive while the first poll runs
        app.on_refresh_timer(true);
        app.on_refresh_timer(true);
        assert!(!app.needs_refresh);
        assert!(!app.start_poll(true));

        app.finish_poll(menu_with_rows(1));
        assert!(!app.is_loading);
        // Nothing was queued behind the slow poll
        assert!(!app.start_poll(false));

        app.on_refresh_timer(false);
        assert!(app.start_poll(false));
    }

    #[test]
    fn test_manual_refresh_waits_for_free_slot() {
        let mut app = App::new(Duration::from_secs(5));
        assert!(app.start_poll(false));

        app.request_refresh();
        assert!(!app.start_poll(true));
        assert!(app.needs_refresh);

        app.finish_poll(menu_with_rows(2));
        assert!(app.start_poll(false));
        assert!(!app.needs_refresh);
    }

    #[test]
    fn test_missing_token_never_starts_poll() {
        let mut app = App::missing_token(Duration::from_secs(5));
        app.on_refresh_timer(false);
        assert!(!app.start_poll(false));
        assert!(!app.is_loading);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = App::new(Duration::from_secs(5));
        app.update_menu(menu_with_rows(2));
        app.next_row();
        assert_eq!(app.list_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.list_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.list_state.selected(), Some(1));
    }
}
