//! Rebuild on source changes.

use std::path::Path;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::build::BuildCoordinator;
use crate::error::DevError;

/// Keeps the OS watcher alive; dropping it stops watching.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

/// Watch `source` recursively and request a build for every change event.
pub fn watch_source(
    source: &Path,
    coordinator: BuildCoordinator,
) -> Result<SourceWatcher, DevError> {
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if !is_change(&event.kind) {
                    return;
                }
                debug!(kind = ?event.kind, paths = ?event.paths, "source changed");
                coordinator.trigger();
            }
            Err(e) => error!(error = %e, "watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(source, RecursiveMode::Recursive)?;
    info!(root = %source.display(), "watching directory");

    Ok(SourceWatcher { _watcher: watcher })
}

/// Everything but plain reads counts as a change.
fn is_change(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_))
}
