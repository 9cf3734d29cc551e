//! Fame runtime: resolve artists to public profile pages, extract their
//! biographies, and turn them into a fame feature.
//!
//! The pipeline is `name -> profile URL -> biography -> fame`:
//!
//! - [`text`] normalizes names and scores their similarity,
//! - [`browser`] owns the headless browser session,
//! - [`resolve`] guesses or searches for the profile URL,
//! - [`extract`] reads the biography,
//! - [`fame`] scores it,
//! - [`batch`] runs the pipeline over a dataset with caching,
//! - [`query`] answers one-off lookups.

pub mod batch;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fame;
pub mod pool;
pub mod pricing;
pub mod query;
pub mod resolve;
pub mod text;

pub use batch::{BatchOrchestrator, BatchOutcome, EntityOutcome};
pub use browser::{BrowserSession, DriverLauncher, PageDriver};
pub use config::FameConfig;
pub use error::SessionError;
pub use query::get_fame;
