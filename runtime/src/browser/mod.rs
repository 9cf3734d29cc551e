//! Browser capability: the page-driving seam, platform matching, bounded
//! polling, and the session state machine.
//!
//! `PageDriver` is the only thing that talks to a real browser. Everything
//! above it (resolver, extractor, orchestrator) goes through
//! `BrowserSession`, which enforces the lifecycle.

pub mod chromium;
pub mod platform;
pub mod session;
pub mod wait;

use crate::error::SessionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub use platform::BrowserKind;
pub use session::{BrowserSession, SessionState};

/// A CSS selector identifying an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to an element found on the current page.
///
/// Handles are invalidated by the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

/// Launch parameters passed to a `DriverLauncher`.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub no_sandbox: bool,
    pub page_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            no_sandbox: true,
            page_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::BrowserSettings> for LaunchOptions {
    fn from(settings: &crate::config::BrowserSettings) -> Self {
        Self {
            executable: settings.executable.clone(),
            headless: settings.headless,
            no_sandbox: settings.no_sandbox,
            page_timeout: settings.page_timeout(),
        }
    }
}

/// Drives a single browser page.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// faults that leave the page in an unknown state.
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate and wait for the page load.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// First element matching `locator`, searched under `scope` when given,
    /// otherwise the whole document.
    async fn find(
        &mut self,
        scope: Option<ElementHandle>,
        locator: &Locator,
    ) -> Result<Option<ElementHandle>, SessionError>;

    async fn click(&mut self, element: ElementHandle) -> Result<(), SessionError>;

    /// Focus the element and type `text` into it.
    async fn type_text(&mut self, element: ElementHandle, text: &str) -> Result<(), SessionError>;

    /// Rendered text of the element (empty when it has none).
    async fn read_text(&mut self, element: ElementHandle) -> Result<String, SessionError>;

    async fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    /// Shut the browser down.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Creates page drivers for a browser kind.
#[async_trait]
pub trait DriverLauncher: Send + Sync {
    async fn launch(
        &self,
        kind: BrowserKind,
        options: &LaunchOptions,
    ) -> Result<Box<dyn PageDriver>, SessionError>;
}
