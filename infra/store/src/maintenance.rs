use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use walkdir::WalkDir;

pub(crate) const TMP_MARKER: &str = ".foliotmp.";

/// Temp files younger than this may belong to a write still in flight.
const STALE_AFTER: Duration = Duration::from_secs(300);

pub(crate) async fn purge_tmp(root: &Path) -> usize {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now, STALE_AFTER)).await {
        Ok((removed, failed)) => {
            if removed > 0 || failed > 0 {
                info!(removed, failed, "Purged leftover temp files");
            }
            removed
        },
        Err(err) => {
            warn!(error = %err, "Temp file purge task failed");
            0
        },
    }
}

fn remove_stale(root: &Path, now: SystemTime, stale_after: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    let candidates = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER)));

    for entry in candidates {
        let age = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age < stale_after) {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "Cannot remove temp file");
                failed += 1;
            },
        }
    }

    (removed, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stale_temp_files_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let collection = dir.path().join("skills");
        std::fs::create_dir_all(&collection).unwrap();
        std::fs::write(collection.join("a.json"), b"{}").unwrap();
        std::fs::write(collection.join(format!("a.json{TMP_MARKER}7")), b"{").unwrap();

        let fresh = remove_stale(dir.path(), SystemTime::now(), STALE_AFTER);
        assert_eq!(fresh, (0, 0));

        let later = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(remove_stale(dir.path(), later, STALE_AFTER), (1, 0));
        assert!(collection.join("a.json").exists());
    }
}
