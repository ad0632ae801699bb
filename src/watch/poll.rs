//! Fixed-cadence poll loop driving the status tracker and the watch view.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use tracing::warn;

use super::tracker::PodStatusTracker;
use crate::kubectl::{table, Kubectl};
use crate::ui;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Everything the watch screen needs to draw one frame.
pub struct WatchView {
    pub namespace: String,
    /// Parsed rows of the most recent successful listing, header included.
    pub rows: Vec<Vec<String>>,
    pub last_poll: Option<DateTime<Local>>,
    pub spinner: &'static str,
    pub error: Option<String>,
}

/// Run the watch loop until the operator quits.
///
/// Each tick races the kubectl fetch against the fixed poll delay and waits
/// for the longer of the two, so ticks are strictly sequential and the
/// tracker is never updated concurrently. A failed fetch skips the tick and
/// leaves tracker state untouched.
pub async fn run(
    terminal: &mut ui::Term,
    kubectl: &Kubectl,
    tracker: &mut PodStatusTracker,
    interval: Duration,
) -> Result<()> {
    let namespace = tracker.namespace().to_string();
    let mut view = WatchView {
        namespace: namespace.clone(),
        rows: Vec::new(),
        last_poll: None,
        spinner: SPINNER_FRAMES[0],
        error: None,
    };
    let mut frames = tokio::time::interval(Duration::from_millis(100));
    let mut frame_count = 0usize;

    loop {
        let fetch = kubectl.pods_raw(&namespace);
        let delay = tokio::time::sleep(interval);
        tokio::pin!(fetch);
        tokio::pin!(delay);
        let mut fetched: Option<Result<String>> = None;
        let mut elapsed = false;

        while fetched.is_none() || !elapsed {
            tokio::select! {
                result = &mut fetch, if fetched.is_none() => fetched = Some(result),
                () = &mut delay, if !elapsed => elapsed = true,
                _ = frames.tick() => {
                    frame_count += 1;
                    view.spinner = SPINNER_FRAMES[frame_count % SPINNER_FRAMES.len()];
                    terminal.draw(|frame| ui::watch_view::render(frame, &view))?;
                    if quit_requested()? {
                        return Ok(());
                    }
                }
            }
        }

        if let Some(result) = fetched {
            match result {
                Ok(raw) => {
                    tracker.update(&raw);
                    view.rows = table::parse(&raw);
                    view.last_poll = Some(Local::now());
                    view.error = None;
                }
                Err(e) => {
                    warn!("pod listing failed: {}", e);
                    view.error = Some(e.to_string());
                }
            }
        }
    }
}

/// Drain pending terminal events, reporting whether the operator asked to
/// leave the watch.
fn quit_requested() -> Result<bool> {
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(key) = event::read()? {
            match (key.code, key.modifiers) {
                (KeyCode::Char('q') | KeyCode::Esc, _) => return Ok(true),
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(true),
                _ => {}
            }
        }
    }
    Ok(false)
}
