//! Scrape run orchestration.
//!
//! A run walks both categories in order, enriches the accepted records with
//! emails from social bios and hands the rows with an email to an
//! [`ExportSink`]. All state lives in the [`ScrapeRun`] the orchestrator
//! returns; nothing is kept between runs.

use crate::bio::SocialBioResolver;
use crate::dedup::DeduplicationTracker;
use crate::error::{Result, ScanError};
use crate::export::{ExportRow, ExportSink};
use crate::fetch::{fetch_page, PageKind};
use crate::filter::admit;
use crate::parser::{CardExtractor, CARD_SELECTOR};
use crate::profile::ProfileResolver;
use crate::url_builder::plan_page_urls;
use chrono::{DateTime, Utc};
use creatorscope_browser::BrowserActions;
use creatorscope_core::{AppConfig, CandidateRecord, RoleType};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Stage of a scrape run. Stages only move forward, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Created, nothing fetched yet
    Idle,
    /// Collecting ugc creators
    ScrapingUgc,
    /// Collecting video editors
    ScrapingVideo,
    /// Looking up missing emails
    Enriching,
    /// Writing rows to the sink
    Exporting,
    /// Finished
    Done,
}

impl RunPhase {
    /// The only stage this one may advance to.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::ScrapingUgc),
            Self::ScrapingUgc => Some(Self::ScrapingVideo),
            Self::ScrapingVideo => Some(Self::Enriching),
            Self::Enriching => Some(Self::Exporting),
            Self::Exporting => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Scraping stage of a category.
    #[must_use]
    pub fn scraping(role: RoleType) -> Self {
        match role {
            RoleType::Ugc => Self::ScrapingUgc,
            RoleType::VideoEditor => Self::ScrapingVideo,
        }
    }
}

/// Everything one run collected.
#[derive(Debug, Clone)]
pub struct ScrapeRun {
    /// Run identifier, also recorded on the tracing span
    pub id: Uuid,
    phase: RunPhase,
    ugc_rows: Vec<CandidateRecord>,
    video_rows: Vec<CandidateRecord>,
    seen_ugc: DeduplicationTracker,
    /// When the run was created
    pub started_at: DateTime<Utc>,
    /// When the run reached [`RunPhase::Done`]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeRun {
    /// A fresh run in [`RunPhase::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: RunPhase::Idle,
            ugc_rows: Vec::new(),
            video_rows: Vec::new(),
            seen_ugc: DeduplicationTracker::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Current stage.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Move to `to`, which must be the stage directly after the current one.
    pub fn advance(&mut self, to: RunPhase) -> Result<()> {
        if self.phase.next() != Some(to) {
            return Err(ScanError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::debug!(from = ?self.phase, ?to, "Run phase change");
        self.phase = to;
        if to == RunPhase::Done {
            self.finished_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Accepted records of a category.
    #[must_use]
    pub fn rows(&self, role: RoleType) -> &[CandidateRecord] {
        match role {
            RoleType::Ugc => &self.ugc_rows,
            RoleType::VideoEditor => &self.video_rows,
        }
    }

    fn rows_mut(&mut self, role: RoleType) -> &mut Vec<CandidateRecord> {
        match role {
            RoleType::Ugc => &mut self.ugc_rows,
            RoleType::VideoEditor => &mut self.video_rows,
        }
    }

    /// Profile URLs accepted under ugc.
    #[must_use]
    pub fn seen_ugc(&self) -> &DeduplicationTracker {
        &self.seen_ugc
    }

    /// Video editor URLs that were also accepted as ugc. Always empty for a
    /// run driven by [`ScrapeOrchestrator`].
    #[must_use]
    pub fn overlapping_urls(&self) -> Vec<&str> {
        self.video_rows
            .iter()
            .map(|r| r.profile_url.as_str())
            .filter(|url| self.seen_ugc.contains(url))
            .collect()
    }
}

impl Default for ScrapeRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Records that passed every filter
    pub accepted: usize,
    /// Accepted records with an email after enrichment
    pub with_email: usize,
    /// Emails found through social bios
    pub emails_filled: usize,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,
    /// ugc counts
    pub ugc: CategorySummary,
    /// Video editor counts
    pub video_editor: CategorySummary,
}

impl RunSummary {
    /// Counts for `role`.
    #[must_use]
    pub fn category(&self, role: RoleType) -> &CategorySummary {
        match role {
            RoleType::Ugc => &self.ugc,
            RoleType::VideoEditor => &self.video_editor,
        }
    }

    fn category_mut(&mut self, role: RoleType) -> &mut CategorySummary {
        match role {
            RoleType::Ugc => &mut self.ugc,
            RoleType::VideoEditor => &mut self.video_editor,
        }
    }
}

/// Knobs the orchestrator reads from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Listing pages per category
    pub pages_per_category: u32,
    /// Accepted records per category
    pub max_profiles: usize,
    /// Wait for listing cards to render
    pub listing_timeout_ms: u64,
    /// Wait for profile and bio pages to render
    pub profile_timeout_ms: u64,
    /// Seed URL of the ugc listing
    pub ugc_url: String,
    /// Seed URL of the video editor listing
    pub video_url: String,
}

impl ScrapeSettings {
    /// Settings from the scraping and site sections of the config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            pages_per_category: config.scraping.pages_per_category,
            max_profiles: config.scraping.max_profiles_per_category,
            listing_timeout_ms: config.scraping.listing_timeout_secs * 1000,
            profile_timeout_ms: config.scraping.profile_timeout_secs * 1000,
            ugc_url: config.site.ugc_url.clone(),
            video_url: config.site.video_url.clone(),
        }
    }

    /// Listing seed URL of a category.
    #[must_use]
    pub fn seed_url(&self, role: RoleType) -> &str {
        match role {
            RoleType::Ugc => &self.ugc_url,
            RoleType::VideoEditor => &self.video_url,
        }
    }
}

/// Drives a complete run over an authenticated listing session.
pub struct ScrapeOrchestrator {
    listing: Arc<dyn BrowserActions>,
    bio: SocialBioResolver,
    extractor: CardExtractor,
    profiles: ProfileResolver,
    settings: ScrapeSettings,
}

impl ScrapeOrchestrator {
    /// Create an orchestrator. `listing` must already be logged in.
    pub fn new(
        listing: Arc<dyn BrowserActions>,
        bio: SocialBioResolver,
        config: &AppConfig,
    ) -> Result<Self> {
        Ok(Self {
            listing,
            bio,
            extractor: CardExtractor::new(&config.site.base_url)?,
            profiles: ProfileResolver::new(&config.site.brand_account)?,
            settings: ScrapeSettings::from_config(config),
        })
    }

    /// Scrape both categories, enrich, export and return the run with its counts.
    pub async fn run(&self, sink: &mut dyn ExportSink) -> Result<(ScrapeRun, RunSummary)> {
        let mut run = ScrapeRun::new();
        let span = tracing::info_span!("scrape_run", run_id = %run.id);

        async {
            let summary = self.execute(&mut run, sink).await?;
            Ok::<_, ScanError>((run, summary))
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, run: &mut ScrapeRun, sink: &mut dyn ExportSink) -> Result<RunSummary> {
        for role in RoleType::ALL {
            run.advance(RunPhase::scraping(role))?;
            let rows = self.scrape_category(role, &run.seen_ugc).await?;
            if role == RoleType::Ugc {
                run.seen_ugc
                    .extend(rows.iter().map(|r| r.profile_url.clone()));
                if run.seen_ugc.is_empty() {
                    tracing::debug!("No ugc creators to exclude from video editors");
                } else {
                    tracing::info!(
                        tracked = run.seen_ugc.len(),
                        "Excluding accepted ugc creators from video editors"
                    );
                }
            }
            *run.rows_mut(role) = rows;
        }

        run.advance(RunPhase::Enriching)?;
        let mut summary = RunSummary {
            run_id: run.id,
            ugc: CategorySummary::default(),
            video_editor: CategorySummary::default(),
        };

        let nothing_scraped = RoleType::ALL.iter().all(|role| run.rows(*role).is_empty());
        if nothing_scraped {
            tracing::warn!("No data to save");
        } else {
            for role in RoleType::ALL {
                if !run.rows(role).is_empty() {
                    summary.category_mut(role).emails_filled =
                        self.enrich(role, run.rows_mut(role)).await;
                }
            }
        }

        run.advance(RunPhase::Exporting)?;
        for role in RoleType::ALL {
            let rows = run.rows(role);
            let exported: Vec<ExportRow> = rows
                .iter()
                .filter(|r| r.has_email())
                .map(ExportRow::from)
                .collect();

            let counts = summary.category_mut(role);
            counts.accepted = rows.len();
            counts.with_email = exported.len();

            if !rows.is_empty() {
                sink.export(role, &exported)?;
            }
        }

        run.advance(RunPhase::Done)?;
        tracing::info!(
            ugc = summary.ugc.with_email,
            video_editor = summary.video_editor.with_email,
            "Scraping complete, creators with emails"
        );
        Ok(summary)
    }

    async fn scrape_category(
        &self,
        role: RoleType,
        seen_ugc: &DeduplicationTracker,
    ) -> Result<Vec<CandidateRecord>> {
        let urls = plan_page_urls(
            self.settings.seed_url(role),
            self.settings.pages_per_category,
        )?;
        let max = self.settings.max_profiles;
        tracing::info!("Scraping {} category", role.display_name());

        let mut rows = Vec::new();
        for (idx, url) in urls.iter().enumerate() {
            if rows.len() >= max {
                tracing::info!("Reached max profiles limit ({})", max);
                break;
            }

            tracing::info!("[{}/{}] {}", idx + 1, urls.len(), url);
            let page_rows = self.scrape_page(url, role, seen_ugc, max - rows.len()).await;
            tracing::info!("Found {} creators", page_rows.len());
            rows.extend(page_rows);
        }

        Ok(rows)
    }

    /// Accept at most `budget` creators from one listing page.
    async fn scrape_page(
        &self,
        url: &str,
        role: RoleType,
        seen_ugc: &DeduplicationTracker,
        budget: usize,
    ) -> Vec<CandidateRecord> {
        let listing = PageKind::Listing {
            selector: CARD_SELECTOR,
        };
        let Some(html) = fetch_page(
            self.listing.as_ref(),
            url,
            listing,
            self.settings.listing_timeout_ms,
        )
        .await
        else {
            return Vec::new();
        };

        let candidates: Vec<CandidateRecord> = self
            .extractor
            .extract_page(&html, role)
            .into_iter()
            .filter(|candidate| admit(candidate, role, seen_ugc).is_accepted())
            .collect();

        let mut accepted = Vec::new();
        for mut candidate in candidates {
            if accepted.len() >= budget {
                break;
            }

            let Some(detail) = fetch_page(
                self.listing.as_ref(),
                &candidate.profile_url,
                PageKind::Profile,
                self.settings.profile_timeout_ms,
            )
            .await
            else {
                continue;
            };

            let resolution = self.profiles.resolve(&detail, role);
            if !resolution.role_confirmed {
                continue;
            }
            if !resolution.handle.is_empty() {
                tracing::debug!(handle = %resolution.handle, url = %candidate.profile_url, "Social handle found");
            }
            candidate.instagram_handle = resolution.handle;
            accepted.push(candidate);
        }

        accepted
    }

    /// Fill missing emails from social bios; returns how many were found.
    async fn enrich(&self, role: RoleType, rows: &mut [CandidateRecord]) -> usize {
        tracing::info!("Starting social email enrichment for {}", role.display_name());

        let mut filled = 0;
        for record in rows.iter_mut().filter(|r| r.needs_enrichment()) {
            let email = self.bio.resolve_email(&record.instagram_handle).await;
            if !email.is_empty() {
                record.email = email;
                filled += 1;
            }
        }

        tracing::info!("Filled {} emails from social bios for {}", filled, role.display_name());
        filled
    }
}
