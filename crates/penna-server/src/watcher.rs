//! File watching for rebuild-on-change.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A markdown post was modified
    PostModified(PathBuf),

    /// The site configuration was modified
    ConfigModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Generic modification
    Modified(PathBuf),
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive events. Paths that do
    /// not exist are skipped rather than failing the watcher.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        // Forward events onto the async channel, debounced. A burst of
        // changes is coalesced into its last event: after the first event
        // of a burst, keep draining until the channel has been quiet for
        // the debounce window, then flush. Editors that write a file in
        // several steps trigger a single rebuild this way, and the final
        // change of a burst is never dropped.
        let async_tx_clone = async_tx.clone();
        std::thread::spawn(move || {
            let debounce_duration = Duration::from_millis(100);

            while let Ok(first) = sync_rx.recv() {
                let mut latest = first;
                while let Ok(next) = sync_rx.recv_timeout(debounce_duration) {
                    latest = next;
                }

                for path in latest.paths {
                    let watch_event = classify_event(&path, &latest.kind);
                    if let Some(e) = watch_event {
                        let _ = async_tx_clone.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => {
            if ext == "md" || ext == "markdown" {
                Some(WatchEvent::PostModified(path.to_path_buf()))
            } else if ext == "toml" {
                Some(WatchEvent::ConfigModified(path.to_path_buf()))
            } else {
                Some(WatchEvent::Modified(path.to_path_buf()))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let test_file = temp.path().join("2024-01-01-test.md");

        // Create the watcher first (so it catches file creation)
        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&test_file, "---\ntitle: Created\n---\n").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }

    #[tokio::test]
    async fn rapid_changes_still_produce_an_event() {
        let temp = tempdir().unwrap();
        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Write a burst of changes immediately, with no settling delay.
        // Events landing inside the debounce window must be coalesced and
        // flushed once the burst goes quiet, not silently dropped.
        for i in 0..5 {
            let path = temp.path().join(format!("2024-01-01-burst-{}.md", i));
            fs::write(&path, "---\ntitle: Burst\n---\n").unwrap();
        }

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for debounced event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }

    #[test]
    fn classifies_post_and_config_changes() {
        use notify::event::{DataChange, ModifyKind};

        let kind = notify::EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert!(matches!(
            classify_event(Path::new("posts/2024-01-01-a.md"), &kind),
            Some(WatchEvent::PostModified(_))
        ));
        assert!(matches!(
            classify_event(Path::new("blog.toml"), &kind),
            Some(WatchEvent::ConfigModified(_))
        ));
        assert!(matches!(
            classify_event(Path::new("styles/site.css"), &kind),
            Some(WatchEvent::Modified(_))
        ));
    }
}
