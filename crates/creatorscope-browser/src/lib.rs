//! Browser sessions for JavaScript-rendered listing and bio pages.
//!
//! Provides headless Chromium control behind the [`BrowserActions`] trait,
//! per-domain request pacing and cookie persistence for session reuse.

pub mod actions;
pub mod cookies;
pub mod engine;
pub mod error;
pub mod fingerprint;

pub use actions::BrowserActions;
pub use cookies::{CookieJar, StoredCookie};
pub use engine::{BrowserEngine, LaunchOptions};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
