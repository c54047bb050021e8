use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal size changed; the next draw picks up the new area
    Resize,
    /// UI heartbeat for flash expiry and the spinner
    Tick,
    /// Poll timer fired
    Refresh,
}

/// Merges terminal input and the two timers into one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, refresh_every: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(pump_terminal(tx.clone()));
        tokio::spawn(pump_timers(tx, tick_rate, refresh_every));

        EventHandler { rx }
    }

    pub async fn next(&mut self) -> Event {
        self.rx.recv().await.unwrap_or(Event::Tick)
    }
}

async fn pump_terminal(tx: UnboundedSender<Event>) {
    let mut reader = EventStream::new();

    while let Some(event) = reader.next().await {
        let event = match event {
            // Filter for Press only (Windows compatibility)
            Ok(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
            Ok(TermEvent::Resize(..)) => Event::Resize,
            Ok(_) => continue,
            Err(e) => {
                warn!("terminal input error: {}", e);
                break;
            }
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Send `Tick` every `tick_rate` and `Refresh` every `refresh_every`.
///
/// The first refresh comes one full period after start; the app asks for its
/// first poll itself. Refreshes missed while the receiver lagged are
/// dropped rather than delivered in a burst.
async fn pump_timers(tx: UnboundedSender<Event>, tick_rate: Duration, refresh_every: Duration) {
    let mut ticks = interval(tick_rate);
    let mut refreshes = interval_at(Instant::now() + refresh_every, refresh_every);
    refreshes.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            _ = ticks.tick() => Event::Tick,
            _ = refreshes.tick() => Event::Refresh,
        };
        if tx.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_refresh_fires_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        tokio::spawn(pump_timers(
            tx,
            Duration::from_secs(1),
            Duration::from_secs(5),
        ));

        let mut refreshed_at = Vec::new();
        while refreshed_at.len() < 3 {
            if rx.recv().await == Some(Event::Refresh) {
                refreshed_at.push(start.elapsed().as_secs());
            }
        }

        assert_eq!(refreshed_at, vec![5, 10, 15]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_stop_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let pump = tokio::spawn(pump_timers(
            tx,
            Duration::from_millis(250),
            Duration::from_secs(5),
        ));
        drop(rx);

        tokio::time::timeout(Duration::from_secs(1), pump)
            .await
            .expect("timer task should exit")
            .unwrap();
    }
}
