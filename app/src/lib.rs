//! Creatorscope command-line application.
//!
//! Wires configuration, the two browser sessions and the scrape pipeline
//! together. Both browsers are closed on every exit path once launched.

use anyhow::{Context, Result};
use clap::Parser;
use creatorscope_browser::{BrowserEngine, CookieJar, LaunchOptions};
use creatorscope_core::{AppConfig, Credentials};
use creatorscope_scanner::{
    CsvExporter, ListingSession, RunSummary, ScrapeOrchestrator, SocialBioResolver,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Scrape UGC creators and video editors, enrich emails and export CSVs.
#[derive(Debug, Parser)]
#[command(name = "creatorscope", version, about)]
pub struct Cli {
    /// Listing pages to scrape per category
    #[arg(long)]
    pub pages: Option<u32>,

    /// Minimum delay between requests to the same site, in seconds
    #[arg(long, value_parser = parse_delay)]
    pub delay: Option<Duration>,

    /// Maximum accepted profiles per category
    #[arg(long)]
    pub max_profiles: Option<usize>,

    /// Listing site account email (falls back to CREATORSCOPE_EMAIL)
    #[arg(long)]
    pub email: Option<String>,

    /// Listing site account password (falls back to CREATORSCOPE_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Path to config TOML file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the CSV files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Show the listing browser window
    #[arg(long)]
    pub headful: bool,
}

impl Cli {
    /// Command-line flags win over the config file and environment.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(pages) = self.pages {
            config.scraping.pages_per_category = pages;
        }
        if let Some(delay) = self.delay {
            config.scraping.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(max) = self.max_profiles {
            config.scraping.max_profiles_per_category = max;
        }
        if let Some(dir) = &self.output_dir {
            config.scraping.output_dir.clone_from(dir);
        }
        if self.headful {
            config.browser.headless = false;
        }
    }
}

fn parse_delay(value: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid delay '{value}': {e}"))
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,creatorscope=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Resolve configuration and credentials, then execute one scrape run.
///
/// Missing credentials fail here, before any browser is launched.
pub async fn run(cli: Cli) -> Result<RunSummary> {
    info!("Starting creatorscope v{}", env!("CARGO_PKG_VERSION"));

    let mut config =
        AppConfig::load_with_env(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    let credentials = Credentials::resolve(cli.email.clone(), cli.password.clone())
        .context("Listing site credentials are required")?;
    let cookies_path = config
        .cookies_path()
        .context("Failed to resolve cookie file location")?;

    let options = LaunchOptions::from_config(&config.browser, config.scraping.delay_ms);
    let listing = Arc::new(
        BrowserEngine::launch(options.clone())
            .await
            .context("Failed to launch listing browser")?,
    );
    let social = match BrowserEngine::launch(options.headless()).await {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            close_engine("listing", listing).await;
            return Err(e).context("Failed to launch social bio browser");
        }
    };

    let outcome = scrape(
        &config,
        &credentials,
        CookieJar::new(cookies_path),
        Arc::clone(&listing),
        Arc::clone(&social),
    )
    .await;

    close_engine("listing", listing).await;
    close_engine("social bio", social).await;

    match &outcome {
        Ok(summary) => info!(
            run_id = %summary.run_id,
            ugc_accepted = summary.ugc.accepted,
            ugc_with_email = summary.ugc.with_email,
            video_accepted = summary.video_editor.accepted,
            video_with_email = summary.video_editor.with_email,
            "Run finished"
        ),
        Err(e) => error!("Run failed: {e:#}"),
    }
    outcome
}

async fn scrape(
    config: &AppConfig,
    credentials: &Credentials,
    jar: CookieJar,
    listing: Arc<BrowserEngine>,
    social: Arc<BrowserEngine>,
) -> Result<RunSummary> {
    let timeout_ms = config.scraping.listing_timeout_secs * 1000;
    ListingSession::new(
        listing.as_ref(),
        jar,
        &config.site.base_url,
        &config.site.login_url,
        timeout_ms,
    )?
    .establish(credentials)
        .await
        .context("Could not establish listing site session")?;

    let bio = SocialBioResolver::new(
        social,
        &config.social.base_url,
        config.scraping.profile_timeout_secs * 1000,
    );
    let orchestrator = ScrapeOrchestrator::new(listing, bio, config)?;

    let mut sink = CsvExporter::new(&config.scraping.output_dir);
    let (_, summary) = orchestrator.run(&mut sink).await?;
    Ok(summary)
}

async fn close_engine(name: &str, engine: Arc<BrowserEngine>) {
    match Arc::try_unwrap(engine) {
        Ok(engine) => {
            if let Err(e) = engine.close().await {
                warn!("Failed to close {name} browser: {e}");
            }
        }
        Err(_) => warn!("{name} browser still in use, leaving it to drop"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["creatorscope"]).expect("parse");
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);

        let defaults = AppConfig::default();
        assert_eq!(config.scraping.pages_per_category, defaults.scraping.pages_per_category);
        assert_eq!(config.scraping.delay_ms, defaults.scraping.delay_ms);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "creatorscope",
            "--pages",
            "5",
            "--delay",
            "1.5",
            "--max-profiles",
            "50",
            "--output-dir",
            "out",
            "--headful",
        ])
        .expect("parse");
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);

        assert_eq!(config.scraping.pages_per_category, 5);
        assert_eq!(config.scraping.delay_ms, 1500);
        assert_eq!(config.scraping.max_profiles_per_category, 50);
        assert_eq!(config.scraping.output_dir, PathBuf::from("out"));
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_negative_delay_is_rejected() {
        assert!(Cli::try_parse_from(["creatorscope", "--delay", "-1"]).is_err());
        assert!(Cli::try_parse_from(["creatorscope", "--delay", "soon"]).is_err());
    }

    #[test]
    fn test_flags_apply_over_config_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[scraping]\npages_per_category = 7\ndelay_ms = 250\n")
            .expect("write config");

        let cli = Cli::try_parse_from(["creatorscope", "--pages", "2"]).expect("parse");
        let mut config = AppConfig::load_from(&path).expect("load");
        cli.apply_to(&mut config);

        assert_eq!(config.scraping.pages_per_category, 2);
        assert_eq!(config.scraping.delay_ms, 250);
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_launch() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").expect("write config");

        if std::env::var(creatorscope_core::config::EMAIL_ENV).is_ok()
            || std::env::var(creatorscope_core::config::PASSWORD_ENV).is_ok()
        {
            return;
        }

        let cli = Cli::try_parse_from([
            "creatorscope",
            "--config",
            path.to_str().expect("utf-8 path"),
        ])
        .expect("parse");
        let err = run(cli).await.unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }
}
