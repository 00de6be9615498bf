//! Creatorscope Core - Foundation crate for the creatorscope scraper.
//!
//! This crate provides the shared record types, the field validation rules,
//! error handling and configuration management that the browser and scanner
//! crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`RoleType`, `CandidateRecord`)
//! - [`validation`] - Email and role predicates applied to every record
//!
//! # Example
//!
//! ```rust
//! use creatorscope_core::{is_valid_email, RoleType};
//!
//! assert!(is_valid_email("hello@creator.co"));
//! assert!(RoleType::Ugc.matches("Top UGC Creator"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, Credentials, ScrapingConfig, SiteConfig, SocialConfig,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{CandidateRecord, RoleType};
pub use validation::{find_email, first_valid_email, heading_matches_role, is_valid_email};
