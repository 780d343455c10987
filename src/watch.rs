//! Debounced watching of a single file.
//!
//! The containing directory is observed non-recursively and events are
//! filtered to the exact target path, so editors that save via a
//! temporary file and rename still produce a qualifying event while
//! sibling files never trigger the handler.

use crate::Result;

use anyhow::{Context, bail};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::time::{Duration, Instant};

/// How often the event loop wakes up to check the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Accepts at most one trigger per window, measured from the previous
/// accepted trigger. Events inside the window are dropped outright and
/// do not extend the window.
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    last: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True if an event at `now` should trigger the handler.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last {
            Some(prev) if now.duration_since(prev) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Watch `path` and invoke `on_change` for each debounced modification.
///
/// Blocks the calling thread until `stop` is set (the loop checks it
/// between events). The handler runs synchronously on this thread, so
/// at most one invocation is ever in flight.
pub fn watch_path<F>(
    path: &Path,
    debounce: Duration,
    stop: &AtomicBool,
    mut on_change: F,
) -> Result<()>
where
    F: FnMut(),
{
    let target = path
        .canonicalize()
        .with_context(|| format!("resolve watched path {}", path.display()))?;
    let dir = match target.parent() {
        Some(dir) => dir.to_path_buf(),
        None => bail!("watched path {} has no parent directory", target.display()),
    };

    let (tx, rx) = channel::<notify::Result<Event>>();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = tx.send(res);
        },
        Config::default(),
    )
    .context("create filesystem watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watch directory {}", dir.display()))?;

    let mut debounce = Debounce::new(debounce);

    loop {
        if stop.load(Ordering::SeqCst) {
            return Ok(());
        }

        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                if is_change(&event, &target) && debounce.accept(Instant::now()) {
                    on_change();
                }
            }
            Ok(Err(e)) => {
                eprintln!("watch error on {}: {}", target.display(), e);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

/// A qualifying event touches exactly the watched file and is a write
/// or a create (save-via-rename shows up as a create).
fn is_change(event: &Event, target: &Path) -> bool {
    let relevant_kind = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
    relevant_kind && event.paths.iter().any(|p| p == target)
}
