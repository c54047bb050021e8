pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use ratatui::DefaultTerminal;
use tracing::error;

use crate::github::GitHubApi;
use crate::output::MenuState;
use crate::poll::Poller;

const TICK_RATE: Duration = Duration::from_millis(250);

type PendingPoll = Option<tokio::task::JoinHandle<MenuState>>;

/// Run the interactive menu until the user quits.
///
/// At most one poll runs at a time: a timer tick that arrives while the
/// previous poll is still in flight is dropped. Without a poller (no token)
/// the menu only shows the setup hint.
pub async fn run_tui<A>(mut app: App, poller: Option<Arc<Poller<A>>>) -> anyhow::Result<()>
where
    A: GitHubApi + 'static,
{
    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, poller).await;
    ratatui::restore();
    result
}

async fn event_loop<A>(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    poller: Option<Arc<Poller<A>>>,
) -> anyhow::Result<()>
where
    A: GitHubApi + 'static,
{
    let mut events = EventHandler::new(TICK_RATE, app.poll_interval);
    let mut pending_poll: PendingPoll = None;

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(app, key),
            Event::Resize => {}
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
            Event::Refresh => app.on_refresh_timer(pending_poll.is_some()),
        }

        // Check if the background poll has completed
        if pending_poll.as_ref().is_some_and(|handle| handle.is_finished()) {
            if let Some(handle) = pending_poll.take() {
                let menu = match handle.await {
                    Ok(menu) => menu,
                    Err(e) => {
                        error!("Unexpected error: {}", e);
                        MenuState::error(&e.to_string())
                    }
                };
                app.finish_poll(menu);
            }
        }

        if let Some(poller) = &poller {
            if app.start_poll(pending_poll.is_some()) {
                let poller = Arc::clone(poller);
                pending_poll = Some(tokio::spawn(async move { poller.tick(Utc::now()).await }));
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true
        }
        KeyCode::Char('j') | KeyCode::Down => app.next_row(),
        KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
        KeyCode::Enter | KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('r') => app.request_refresh(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Duration::from_secs(5));
        handle_key_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_refresh_key() {
        let mut app = App::new(Duration::from_secs(5));
        app.needs_refresh = false;
        handle_key_event(&mut app, key(KeyCode::Char('r'), KeyModifiers::NONE));
        assert!(app.needs_refresh);
    }
}
