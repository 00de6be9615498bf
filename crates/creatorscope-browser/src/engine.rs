use crate::actions::{extract_domain, BrowserActions};
use crate::cookies::StoredCookie;
use crate::error::{BrowserError, Result};
use crate::fingerprint::{FingerprintConfig, HIDE_WEBDRIVER_SCRIPT};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use creatorscope_core::BrowserConfig;
use futures_util::stream::StreamExt;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Interval between selector probes while waiting for an element.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Pause after each scroll step so lazily loaded sections render.
const SCROLL_SETTLE: Duration = Duration::from_millis(1500);

/// Per-domain pacing: a navigation waits until `min_delay` has passed since
/// the previous navigation to the same domain.
#[derive(Debug)]
struct Throttle {
    last_access: HashMap<String, Instant>,
    min_delay: Duration,
}

impl Throttle {
    fn new(min_delay: Duration) -> Self {
        Self {
            last_access: HashMap::new(),
            min_delay,
        }
    }

    /// Time still to wait before `domain` may be hit again at `now`.
    fn remaining(&self, domain: &str, now: Instant) -> Duration {
        self.last_access
            .get(domain)
            .map_or(Duration::ZERO, |last| {
                self.min_delay.saturating_sub(now.saturating_duration_since(*last))
            })
    }

    fn record(&mut self, domain: &str, now: Instant) {
        self.last_access.insert(domain.to_string(), now);
    }
}

/// Options for launching one browser session.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub fingerprint: FingerprintConfig,
    pub navigation_timeout: Duration,
    pub min_delay: Duration,
}

impl LaunchOptions {
    /// Build launch options from the browser section of the app config.
    pub fn from_config(config: &BrowserConfig, delay_ms: u64) -> Self {
        Self {
            headless: config.headless,
            fingerprint: FingerprintConfig::desktop(config.window_width, config.window_height),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            min_delay: Duration::from_millis(delay_ms),
        }
    }

    /// Force headless mode regardless of config (the social bio session never needs a window).
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.headless = true;
        self
    }
}

/// Browser automation engine: one Chromium process driving a single tab.
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    throttle: Mutex<Throttle>,
    navigation_timeout: Duration,
}

impl BrowserEngine {
    /// Launch Chromium and open the tab all actions run in.
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let fingerprint = &options.fingerprint;
        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .request_timeout(options.navigation_timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        for arg in fingerprint.launch_args() {
            builder = builder.arg(arg);
        }
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("browser handler event error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            HIDE_WEBDRIVER_SCRIPT,
        ))
        .await?;

        tracing::debug!(
            headless = options.headless,
            user_agent = %fingerprint.user_agent,
            "Browser session launched"
        );

        Ok(Self {
            browser,
            page,
            handler,
            throttle: Mutex::new(Throttle::new(options.min_delay)),
            navigation_timeout: options.navigation_timeout,
        })
    }

    /// Shut the browser down. Called on every exit path of a run.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler.abort();
        closed?;
        tracing::debug!("Browser session closed");
        Ok(())
    }

    async fn pace(&self, url: &str) -> Result<()> {
        let domain = extract_domain(url)?;
        let wait = self.throttle.lock().await.remaining(&domain, Instant::now());
        if !wait.is_zero() {
            tracing::trace!("Pacing {} for {:?}", domain, wait);
            tokio::time::sleep(wait).await;
        }
        self.throttle.lock().await.record(&domain, Instant::now());
        Ok(())
    }

    async fn evaluate(&self, script: String) -> Result<()> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.pace(url).await?;
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigating to {url}")))?
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.page
            .reload()
            .await
            .map_err(|e| BrowserError::NavigationError(format!("reload: {e}")))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "{selector} not present after {timeout_ms}ms"
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        let quoted = serde_json::to_string(selector)
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?;
        self.evaluate(format!("document.querySelector({quoted}).value = ''"))
            .await?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?
            .click()
            .await?;
        Ok(())
    }

    async fn press_enter(&self, selector: &str) -> Result<()> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?
            .press_key("Enter")
            .await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.evaluate("window.scrollTo(0, document.body.scrollHeight / 2)".to_string())
            .await?;
        tokio::time::sleep(SCROLL_SETTLE).await;
        self.evaluate("window.scrollTo(0, document.body.scrollHeight)".to_string())
            .await?;
        tokio::time::sleep(SCROLL_SETTLE).await;
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<StoredCookie>> {
        let cookies = self.page.get_cookies().await?;
        Ok(cookies
            .into_iter()
            .map(|c| StoredCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                secure: c.secure,
                http_only: c.http_only,
            })
            .collect())
    }

    async fn set_cookies(&self, cookies: &[StoredCookie]) -> Result<()> {
        let params: Vec<CookieParam> = cookies
            .iter()
            .map(|c| {
                let mut param = CookieParam::new(c.name.clone(), c.value.clone());
                param.domain = Some(c.domain.clone());
                param.path = Some(c.path.clone());
                param.secure = Some(c.secure);
                param.http_only = Some(c.http_only);
                param
            })
            .collect();
        self.page.set_cookies(params).await?;
        Ok(())
    }
}
