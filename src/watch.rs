use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::github::GitHubApi;
use crate::output::MenuState;
use crate::poll::Poller;

/// Poll forever without a UI, calling `on_change` whenever the menu changes.
///
/// Each poll is awaited before the next tick is taken, so polls never
/// overlap; ticks missed while a slow poll ran are skipped, not queued.
pub async fn run_watch<A, F>(poller: &Poller<A>, every: Duration, mut on_change: F)
where
    A: GitHubApi,
    F: FnMut(&MenuState),
{
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last: Option<MenuState> = None;

    loop {
        ticker.tick().await;

        let state = poller.tick(Utc::now()).await;
        if last.as_ref() != Some(&state) {
            on_change(&state);
            last = Some(state);
        } else {
            debug!("menu unchanged");
        }
    }
}

/// [`run_watch`] until Ctrl-C.
pub async fn run_watch_until_interrupted<A, F>(poller: &Poller<A>, every: Duration, on_change: F)
where
    A: GitHubApi,
    F: FnMut(&MenuState),
{
    tokio::select! {
        _ = run_watch(poller, every, on_change) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }
}
