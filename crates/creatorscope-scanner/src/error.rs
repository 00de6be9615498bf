use crate::orchestrator::RunPhase;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("invalid seed URL {url}: {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("run cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: RunPhase, to: RunPhase },

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] creatorscope_core::ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] creatorscope_browser::BrowserError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
