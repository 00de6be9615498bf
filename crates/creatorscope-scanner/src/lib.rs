//! Creatorscope Scanner - creator listing scraping pipeline.
//!
//! This crate turns listing pages into exported creator rows. It plans the
//! listing pages of each category, extracts candidate records from cards,
//! confirms them on their profile pages and enriches missing emails from
//! social bios before handing the rows to an export sink.
//!
//! # Features
//!
//! - Ordered selector fallbacks for every element the pipeline reads
//! - Cross-category deduplication of creators
//! - Cookie-backed listing session with form login fallback
//! - Best-effort extraction: a bad card or page never aborts the run
//!
//! # Example
//!
//! ```rust,ignore
//! use creatorscope_scanner::{CsvExporter, ScrapeOrchestrator, SocialBioResolver};
//! use std::sync::Arc;
//!
//! let bio = SocialBioResolver::new(Arc::new(bio_engine), &config.social.base_url, 10_000);
//! let orchestrator = ScrapeOrchestrator::new(Arc::new(listing_engine), bio, &config)?;
//!
//! let mut sink = CsvExporter::new(&config.scraping.output_dir);
//! let (run, summary) = orchestrator.run(&mut sink).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod bio;
#[allow(missing_docs)]
pub mod dedup;
#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod export;
pub mod fetch;
pub mod filter;
pub mod orchestrator;
pub mod parser;
pub mod profile;
#[allow(missing_docs)]
pub mod session;
#[allow(missing_docs)]
pub mod strategy;
pub mod url_builder;

// Re-export commonly used types
pub use bio::SocialBioResolver;
pub use dedup::DeduplicationTracker;
pub use error::{Result, ScanError};
pub use export::{CsvExporter, ExportRow, ExportSink};
pub use filter::{admit, Admission};
pub use orchestrator::{
    CategorySummary, RunPhase, RunSummary, ScrapeOrchestrator, ScrapeRun, ScrapeSettings,
};
pub use parser::CardExtractor;
pub use profile::{ProfileResolution, ProfileResolver};
pub use session::{ListingSession, SessionOrigin};
pub use strategy::SelectorChain;
pub use url_builder::plan_page_urls;
