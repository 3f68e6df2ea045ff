//! File watching for the checker's `--watch` mode.
//!
//! Every change to the watched file re-reads it in full and hands the new
//! text to a callback. The parent directory is watched so editors that
//! save by rename are still seen.

use anyhow::{anyhow, Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    FileChanged,
    WatcherError(notify::Error),
}

/// Whether a filesystem event touches `target`
pub fn is_relevant(event: &Event, target: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == target)
}

/// Watch `path` until Ctrl-C, calling `on_change` with the file's text after each change.
///
/// Content identical to the previous run is skipped. Errors returned by
/// `on_change` stop the loop.
pub async fn watch_file<F>(path: &Path, mut on_change: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    let target: PathBuf = path
        .canonicalize()
        .with_context(|| format!("Cannot watch {}", path.display()))?;
    let dir = target
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", target.display()))?
        .to_path_buf();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let filter_target = target.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if is_relevant(&event, &filter_target) {
                    let _ = tx.send(WatcherEvent::FileChanged);
                }
            }
            Err(e) => {
                let _ = tx.send(WatcherEvent::WatcherError(e));
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    log::info!("Watching {} for changes", target.display());

    let mut last_content: Option<String> = None;
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(WatcherEvent::FileChanged) => {
                    let content = match tokio::fs::read_to_string(&target).await {
                        Ok(content) => content,
                        Err(e) => {
                            // Mid-save; the next event will carry the new file
                            log::debug!("Skipping unreadable {}: {}", target.display(), e);
                            continue;
                        }
                    };
                    if last_content.as_deref() == Some(content.as_str()) {
                        continue;
                    }
                    on_change(&content)?;
                    last_content = Some(content);
                }
                Some(WatcherEvent::WatcherError(e)) => {
                    log::warn!("File watcher error: {}", e);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopped watching {}", target.display());
                break;
            }
        }
    }

    Ok(())
}
