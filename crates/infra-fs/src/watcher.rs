// Input Directory Watcher
// notify-based; emits the path of every newly created .txt file.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

fn is_txt(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("txt")
}

/// Watches the input directory (non-recursive) for created .txt files
pub struct TranslationWatcher {
    _watcher: notify::RecommendedWatcher,
    receiver: mpsc::Receiver<PathBuf>,
}

impl TranslationWatcher {
    pub fn new(input_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
            if let Ok(event) = res {
                if let EventKind::Create(_) = event.kind {
                    for path in &event.paths {
                        if is_txt(path) && !path.is_dir() {
                            let _ = tx.blocking_send(path.clone());
                        }
                    }
                }
            }
        })?;

        watcher.watch(input_dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Next created .txt file, or None when the watcher has shut down
    pub async fn next_created(&mut self) -> Option<PathBuf> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn detects_created_txt_file() {
        let temp = TempDir::new().unwrap();
        let mut watcher = TranslationWatcher::new(temp.path()).unwrap();

        // non-txt files must never be reported
        fs::write(temp.path().join("notes.md"), "ignored").await.unwrap();

        // some backends register the watch asynchronously, so keep creating
        // files until an event comes through instead of sleeping once
        let mut first = None;
        for attempt in 0..50u32 {
            fs::write(temp.path().join(format!("sample-{attempt}.txt")), "src\nmt\n")
                .await
                .unwrap();
            if let Ok(created) = timeout(Duration::from_millis(200), watcher.next_created()).await {
                first = Some(created.expect("watcher channel closed"));
                break;
            }
        }
        let first = first.expect("no create event arrived");
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("txt"));

        // drain whatever else is queued; the .md file must not show up
        while let Ok(Some(path)) = timeout(Duration::from_millis(200), watcher.next_created()).await
        {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));
        }
    }
}
