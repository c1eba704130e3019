//! Per-ticket lock files
//!
//! A lock is a file created with `create_new`, so only one process can hold
//! it. The file carries a token unique to the holder. Locks left behind by a
//! crashed process are broken once they are older than [`STALE_LOCK_AGE`].
//!
//! Breaking and releasing both move the file aside to a unique tombstone
//! first and check the token there, so a lock that changed hands in between
//! is put back instead of deleted.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{HelpdeskError, Result};

/// Locks older than this are considered abandoned
pub const STALE_LOCK_AGE: Duration = Duration::from_secs(30);

const RETRY_DELAY: Duration = Duration::from_millis(20);

/// Held lock; released on drop
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    token: String,
}

impl FileLock {
    /// Acquire the lock at `path`, waiting up to `timeout`
    ///
    /// Timing out is reported as a transient store failure.
    pub async fn acquire(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let token = format!("{}:{}\n", std::process::id(), Uuid::new_v4());
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(token.as_bytes()).await?;
                    file.flush().await?;
                    debug!(lock = %path.display(), "lock acquired");
                    return Ok(Self { path, token });
                },
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if let Some(seen) = Self::stale_token(&path).await {
                        Self::break_stale(&path, &seen).await;
                        continue;
                    }
                    if tokio::time::Instant::now() >= deadline {
                        return Err(HelpdeskError::TransientStore(format!(
                            "timed out waiting for lock {}",
                            path.display()
                        )));
                    }
                    tokio::time::sleep(RETRY_DELAY).await;
                },
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Token of the lock at `path` if it is older than [`STALE_LOCK_AGE`]
    async fn stale_token(path: &Path) -> Option<String> {
        let metadata = tokio::fs::metadata(path).await.ok()?;
        let age = SystemTime::now()
            .duration_since(metadata.modified().ok()?)
            .ok()?;
        if age <= STALE_LOCK_AGE {
            return None;
        }
        tokio::fs::read_to_string(path).await.ok()
    }

    async fn break_stale(path: &Path, seen: &str) {
        let tombstone = tombstone_for(path);
        if tokio::fs::rename(path, &tombstone).await.is_err() {
            // someone else moved it first
            return;
        }
        let moved = tokio::fs::read_to_string(&tombstone).await.unwrap_or_default();
        if moved == seen {
            warn!(lock = %path.display(), "broke stale lock");
        } else {
            debug!(lock = %path.display(), "lock changed hands while breaking, restoring");
            let _ = tokio::fs::hard_link(&tombstone, path).await;
        }
        let _ = tokio::fs::remove_file(&tombstone).await;
    }
}

fn tombstone_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.{}.stale", Uuid::new_v4()))
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let tombstone = tombstone_for(&self.path);
        if let Err(e) = std::fs::rename(&self.path, &tombstone) {
            warn!(lock = %self.path.display(), error = %e, "failed to release lock");
            return;
        }
        let moved = std::fs::read_to_string(&tombstone).unwrap_or_default();
        if moved != self.token {
            warn!(lock = %self.path.display(), "lock was taken over, leaving it in place");
            let _ = std::fs::hard_link(&tombstone, &self.path);
        }
        let _ = std::fs::remove_file(&tombstone);
    }
}
