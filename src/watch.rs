//! Watch loop that regenerates routes when the pages directory changes.
//!
//! The first relevant event opens a fixed debounce window. Events inside the
//! window are absorbed without extending it, and when the window closes the
//! whole pipeline runs once. Events that arrive while a run is executing
//! wait in the channel and open the next window.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::WatchError;

// ═══════════════════════════════════════════════════════════════════════════════
// DEBOUNCER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Debouncing { deadline: Instant },
}

/// Trailing-edge debouncer: fires once per window, measured from the first
/// event of a burst.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    /// Records an event. Returns true when this event opened a new window.
    pub fn record(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Idle => {
                self.state = DebounceState::Debouncing {
                    deadline: now + self.delay,
                };
                true
            }
            DebounceState::Debouncing { .. } => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Debouncing { deadline } => Some(deadline),
        }
    }

    /// Returns true (and goes back to idle) once the window has closed.
    pub fn take_ready(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Debouncing { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WATCHER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct RouteWatcher {
    /// Absolute pages directory, plus its symlink-resolved form when that
    /// differs. Backends report event paths in either form.
    pages_dirs: Vec<PathBuf>,
    /// Directory actually registered with the OS watcher.
    watch_root: PathBuf,
    debouncer: Debouncer,
    event_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    watcher: RecommendedWatcher,
}

impl RouteWatcher {
    /// Starts watching `pages_dir`. If it does not exist yet, its nearest
    /// existing ancestor is watched instead so the directory's creation is
    /// seen.
    pub fn new(pages_dir: &Path, delay: Duration) -> Result<Self, WatchError> {
        let watch_err = |path: &Path, reason: String| WatchError::WatchPath {
            path: path.to_path_buf(),
            reason,
        };

        // Event paths are always absolute.
        let pages_dir =
            std::path::absolute(pages_dir).map_err(|e| watch_err(pages_dir, e.to_string()))?;
        let watch_root = pages_dir
            .ancestors()
            .find(|dir| dir.is_dir())
            .map(Path::to_path_buf)
            .ok_or_else(|| watch_err(&pages_dir, "no existing directory to watch".to_string()))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = event_tx.send(res);
        })?;
        watcher
            .watch(&watch_root, RecursiveMode::Recursive)
            .map_err(|e| watch_err(&watch_root, e.to_string()))?;
        tracing::info!("watching {}", watch_root.display());

        let mut pages_dirs = vec![pages_dir.clone()];
        if let Some(resolved) = resolve_below(&watch_root, &pages_dir) {
            if resolved != pages_dir {
                pages_dirs.push(resolved);
            }
        }

        Ok(Self {
            pages_dirs,
            watch_root,
            debouncer: Debouncer::new(delay),
            event_rx,
            watcher,
        })
    }

    /// Runs until `shutdown` resolves, calling `regenerate` once per closed
    /// debounce window. A regeneration that has started always finishes.
    pub async fn run<F, S>(mut self, mut regenerate: F, shutdown: S)
    where
        F: FnMut(),
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let deadline = self.debouncer.deadline();
            let sleep_until = tokio::time::Instant::from_std(deadline.unwrap_or_else(Instant::now));

            tokio::select! {
                biased;

                _ = &mut shutdown => break,

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    if self.debouncer.take_ready(Instant::now()) {
                        tracing::info!("change detected, regenerating routes");
                        regenerate();
                    }
                }

                Some(res) = self.event_rx.recv() => match res {
                    Ok(event) => self.handle_event(event),
                    Err(e) => tracing::warn!("watch error: {e}"),
                },
            }
        }

        self.stop();
    }

    fn handle_event(&mut self, event: Event) {
        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }
        let relevant = event.paths.iter().any(|path| {
            self.pages_dirs
                .iter()
                .any(|pages_dir| !is_ignored_path(pages_dir, path))
        });
        if relevant && self.debouncer.record(Instant::now()) {
            tracing::debug!("{:?} {:?}, debouncing", event.kind, event.paths);
        }
    }

    fn stop(mut self) {
        if let Err(e) = self.watcher.unwatch(&self.watch_root) {
            tracing::debug!("unwatch {}: {e}", self.watch_root.display());
        }
        tracing::info!("watcher stopped");
    }
}

/// `path` with its existing ancestor `root` canonicalized. The part below
/// `root` may not exist yet.
fn resolve_below(root: &Path, path: &Path) -> Option<PathBuf> {
    let rest = path.strip_prefix(root).ok()?;
    let root = root.canonicalize().ok()?;
    Some(root.join(rest))
}

/// Paths outside the pages directory, anything under a dot-directory or
/// dot-file, and `_mock.js` files never trigger regeneration.
pub fn is_ignored_path(pages_dir: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(pages_dir) else {
        return true;
    };
    let mut names = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy());
    names.any(|name| name.starts_with('.') || name == "_mock.js")
}
