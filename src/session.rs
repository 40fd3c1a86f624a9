//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - Opening the persisted session file
//! - Client creation and shutdown of the sender pool

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::client::updates::UpdatesLike;
use grammers_client::Client;
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to the Telegram session.
#[derive(Debug)]
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock at `path`, failing fast if another process
    /// holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::LockError(format!("{}: {}", path.display(), e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %path.display(), "session lock acquired");
                Ok(Self {
                    path: path.to_path_buf(),
                    lock_file: Some(lock_file),
                })
            }
            Err(_) => {
                warn!(path = %path.display(), "session is in use by another process");
                Err(Error::SessionLocked)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock manually. The lock file stays on disk: deleting it
    /// would let a waiter and a newcomer lock two different inodes.
    pub fn release(&mut self) {
        if let Some(file) = self.lock_file.take() {
            let _ = file.unlock();
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Open the session file, creating it if this is the first run. The parent
/// directory must already exist.
pub fn open_session(path: &Path) -> Result<Arc<SqliteSession>> {
    let session = SqliteSession::open(path)
        .map_err(|e| Error::SessionOpen(format!("{}: {}", path.display(), e)))?;
    Ok(Arc::new(session))
}

/// Connected client together with the sender pool runner and the session lock.
pub struct TelegramClient {
    pub client: Client,
    pub handle: SenderPoolHandle,
    api_hash: String,
    runner: tokio::task::JoinHandle<()>,
    // Updates are never consumed, but the runner expects a live receiver.
    _updates: mpsc::UnboundedReceiver<UpdatesLike>,
    _lock: SessionLock,
}

impl TelegramClient {
    /// Lock the session, open it and start the sender pool.
    pub async fn connect(config: &Config) -> Result<Self> {
        // The lock file lives beside the session file, so the directory comes first.
        ensure_parent_dir(&config.session_file)?;
        let lock = SessionLock::acquire(&config.lock_file())?;
        let session = open_session(&config.session_file)?;

        let pool = SenderPool::new(session, config.api_id);
        let client = Client::new(&pool);

        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;
        let runner = tokio::spawn(async move {
            runner.run().await;
        });

        info!(session = %config.session_file.display(), "connected to Telegram");

        Ok(Self {
            client,
            handle,
            api_hash: config.api_hash.clone(),
            runner,
            _updates: updates,
            _lock: lock,
        })
    }

    pub fn api_hash(&self) -> &str {
        &self.api_hash
    }

    /// Stop the sender pool and release the session lock.
    pub async fn disconnect(self) {
        let Self {
            client,
            handle,
            runner,
            _lock,
            ..
        } = self;
        drop(client);

        if !handle.quit() {
            debug!("sender pool already stopped");
        }
        if let Err(e) = runner.await {
            warn!("sender pool runner ended abnormally: {}", e);
        }
        info!("disconnected from Telegram");
    }
}

impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}
