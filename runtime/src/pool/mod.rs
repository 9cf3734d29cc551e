//! Browser session pooling for concurrent batch runs.

pub mod manager;

pub use manager::{SessionHandle, SessionPool};
