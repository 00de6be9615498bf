//! Cookie persistence so an authenticated session survives between runs.

use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Browser cookie in a form that can be written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

/// JSON file holding the cookies of one site session.
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read saved cookies. A missing file means no saved session.
    pub fn load(&self) -> Result<Option<Vec<StoredCookie>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let cookies = serde_json::from_str(&contents).map_err(|e| {
            BrowserError::CookieStore(format!("{}: {e}", self.path.display()))
        })?;
        Ok(Some(cookies))
    }

    /// Overwrite the jar with the given cookies, creating parent directories.
    pub fn save(&self, cookies: &[StoredCookie]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let contents = serde_json::to_string_pretty(cookies)
            .map_err(|e| BrowserError::CookieStore(e.to_string()))?;
        fs::write(&self.path, contents)?;
        tracing::debug!(
            "Saved {} cookies to {}",
            cookies.len(),
            self.path.display()
        );
        Ok(())
    }
}
