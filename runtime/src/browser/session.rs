//! Browser session lifecycle.
//!
//! A session moves `Uninitialized -> Active -> Closed`. Only an Active
//! session has a driver; every page operation on any other state fails with
//! `SessionError::NotActive`. Nothing is retried here: faults go straight
//! back to the caller, which decides whether to re-initialize.

use super::platform::{match_platform, BrowserKind, PlatformRule};
use super::wait::PollPolicy;
use super::{DriverLauncher, ElementHandle, LaunchOptions, Locator, PageDriver};
use crate::error::{SessionError, WaitError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    Closed,
}

/// A single browser instance and its current page.
pub struct BrowserSession {
    driver: Option<Box<dyn PageDriver>>,
    state: SessionState,
    kind: Option<BrowserKind>,
    /// When the current instance was launched.
    started_at: Option<Instant>,
    navigations: u64,
}

impl Default for BrowserSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserSession {
    /// Create an uninitialized session.
    pub fn new() -> Self {
        Self {
            driver: None,
            state: SessionState::Uninitialized,
            kind: None,
            started_at: None,
            navigations: 0,
        }
    }

    /// Wrap an already-launched driver as an Active session.
    pub fn with_driver(kind: BrowserKind, driver: Box<dyn PageDriver>) -> Self {
        Self {
            driver: Some(driver),
            state: SessionState::Active,
            kind: Some(kind),
            started_at: Some(Instant::now()),
            navigations: 0,
        }
    }

    /// Match `platform` against `rules` and launch the matching browser.
    ///
    /// With no match the session is left as it was and
    /// `UnsupportedPlatform` is returned. An Active session is closed before
    /// the new instance is launched.
    pub async fn initialize(
        &mut self,
        platform: &str,
        rules: &[PlatformRule],
        launcher: &dyn DriverLauncher,
        options: &LaunchOptions,
    ) -> Result<BrowserKind, SessionError> {
        let kind = match_platform(platform, rules)
            .ok_or_else(|| SessionError::UnsupportedPlatform(platform.to_string()))?;

        if self.state == SessionState::Active {
            self.close().await;
        }

        let driver = launcher.launch(kind, options).await?;
        self.driver = Some(driver);
        self.state = SessionState::Active;
        self.kind = Some(kind);
        self.started_at = Some(Instant::now());
        self.navigations = 0;
        info!("{kind} session initialized for platform '{platform}'");
        Ok(kind)
    }

    /// Release the browser. Closing a session that is not Active does
    /// nothing.
    pub async fn close(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            if let Err(e) = driver.close().await {
                warn!("error closing browser: {e}");
            }
            debug!(
                "session closed after {} navigation(s), {:?}",
                self.navigations,
                self.age().unwrap_or_default()
            );
        }
        if self.state == SessionState::Active {
            self.state = SessionState::Closed;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Browser kind of the current or last instance.
    pub fn kind(&self) -> Option<BrowserKind> {
        self.kind
    }

    /// Navigations performed by the current instance.
    pub fn navigation_count(&self) -> u64 {
        self.navigations
    }

    /// How long the current instance has been alive.
    pub fn age(&self) -> Option<Duration> {
        self.started_at.map(|t| t.elapsed())
    }

    fn driver(&mut self) -> Result<&mut dyn PageDriver, SessionError> {
        match self.driver.as_mut() {
            Some(d) if self.state == SessionState::Active => Ok(d.as_mut()),
            _ => Err(SessionError::NotActive),
        }
    }

    pub async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        debug!("navigate {url}");
        self.driver()?.navigate(url).await?;
        self.navigations += 1;
        Ok(())
    }

    /// First element matching `locator` in the document.
    pub async fn find(&mut self, locator: &Locator) -> Result<Option<ElementHandle>, SessionError> {
        self.driver()?.find(None, locator).await
    }

    /// First element matching `locator` under `scope`.
    pub async fn find_in(
        &mut self,
        scope: ElementHandle,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>, SessionError> {
        self.driver()?.find(Some(scope), locator).await
    }

    pub async fn click(&mut self, element: ElementHandle) -> Result<(), SessionError> {
        self.driver()?.click(element).await
    }

    pub async fn type_text(&mut self, element: ElementHandle, text: &str) -> Result<(), SessionError> {
        self.driver()?.type_text(element, text).await
    }

    pub async fn read_text(&mut self, element: ElementHandle) -> Result<String, SessionError> {
        self.driver()?.read_text(element).await
    }

    pub async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.driver()?.attribute(element, name).await
    }

    /// Poll until `locator` matches.
    pub async fn wait_for(
        &mut self,
        locator: &Locator,
        policy: &PollPolicy,
    ) -> Result<ElementHandle, WaitError> {
        let (_, handle) = self.wait_for_any(std::slice::from_ref(locator), policy).await?;
        Ok(handle)
    }

    /// Poll until any of `locators` matches. Returns the index of the first
    /// locator (in slice order) that matched on the winning poll.
    pub async fn wait_for_any(
        &mut self,
        locators: &[Locator],
        policy: &PollPolicy,
    ) -> Result<(usize, ElementHandle), WaitError> {
        let mut backoff = policy.start();
        loop {
            for (i, locator) in locators.iter().enumerate() {
                if let Some(handle) = self.find(locator).await? {
                    return Ok((i, handle));
                }
            }
            if !backoff.wait().await {
                return Err(WaitError::Timeout(policy.timeout()));
            }
        }
    }
}
