//! Pool of browser sessions for concurrent batch workers.
//!
//! Each worker owns its session for the duration of its share of the batch;
//! sessions are never shared. The semaphore bounds how many browsers are
//! alive at once.

use crate::browser::{BrowserKind, BrowserSession, DriverLauncher, LaunchOptions};
use crate::config::BrowserSettings;
use crate::error::SessionError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A session borrowed from the pool.
pub struct SessionHandle {
    session: BrowserSession,
    _permit: OwnedSemaphorePermit,
    active_count: Arc<AtomicUsize>,
}

impl SessionHandle {
    pub fn session(&self) -> &BrowserSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut BrowserSession {
        &mut self.session
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Launches and bounds browser sessions.
pub struct SessionPool {
    launcher: Arc<dyn DriverLauncher>,
    settings: BrowserSettings,
    semaphore: Arc<Semaphore>,
    max_sessions: usize,
    active_count: Arc<AtomicUsize>,
}

impl SessionPool {
    /// Create a pool allowing up to `max_sessions` live browsers.
    pub fn new(launcher: Arc<dyn DriverLauncher>, settings: BrowserSettings, max_sessions: usize) -> Self {
        let max_sessions = max_sessions.max(1);
        Self {
            launcher,
            settings,
            semaphore: Arc::new(Semaphore::new(max_sessions)),
            max_sessions,
            active_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Initialize (or re-initialize) `session` with the configured platform.
    pub async fn initialize(&self, session: &mut BrowserSession) -> Result<BrowserKind, SessionError> {
        session
            .initialize(
                &self.settings.platform,
                &self.settings.platforms,
                self.launcher.as_ref(),
                &LaunchOptions::from(&self.settings),
            )
            .await
    }

    /// Acquire a slot and launch a fresh session in it.
    ///
    /// Waits while `max_sessions` sessions are out.
    pub async fn acquire(&self) -> Result<SessionHandle, SessionError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| SessionError::Launch(format!("session pool closed: {e}")))?;

        let mut session = BrowserSession::new();
        self.initialize(&mut session).await?;
        self.active_count.fetch_add(1, Ordering::SeqCst);

        Ok(SessionHandle {
            session,
            _permit: permit,
            active_count: Arc::clone(&self.active_count),
        })
    }

    /// Close the handle's browser and return its slot.
    pub async fn release(&self, mut handle: SessionHandle) {
        handle.session.close().await;
    }

    /// Number of sessions currently out.
    pub fn active(&self) -> usize {
        self.active_count.load(Ordering::SeqCst)
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Free slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
