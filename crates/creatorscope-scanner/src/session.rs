//! Authenticated listing-site session.
//!
//! Saved cookies are tried first; when they no longer log us in, the login
//! form is filled and the fresh cookies are written back for the next run.

use crate::error::{Result, ScanError};
use crate::strategy::{element_text, SelectorChain};
use creatorscope_browser::{BrowserActions, CookieJar};
use creatorscope_core::Credentials;
use scraper::Html;

/// Elements only rendered for a logged-in account.
pub const LOGGED_IN_INDICATORS: &[&str] = &[
    "a[href*='/dashboard']",
    "a[href*='/profile']",
    "a[href*='/account']",
];
/// Link texts only shown to a logged-in account.
const LOGGED_IN_LINK_TEXT: &[&str] = &["Dashboard", "Logout"];
/// Link texts offering to log in.
const LOGIN_LINK_TEXT: &[&str] = &["Login", "Log in", "Sign In"];
/// Login form email field strategies.
pub const EMAIL_FIELD_SELECTORS: &[&str] =
    &["#email", "input[name='email']", "input[type='email']"];
/// Login form password field.
pub const PASSWORD_FIELD_SELECTOR: &str = "input[type='password']";
/// Login form submit strategies; Enter in the password field is the last resort.
pub const SUBMIT_SELECTORS: &[&str] = &["button.submit.btn", "button[type='submit']"];

/// How the session was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    /// Saved cookies were still valid
    Restored,
    /// Logged in through the form
    LoggedIn,
}

/// Logs the listing browser in before any scraping starts.
pub struct ListingSession<'a> {
    browser: &'a dyn BrowserActions,
    jar: CookieJar,
    base_url: String,
    login_url: String,
    timeout_ms: u64,
    indicators: SelectorChain,
    links: SelectorChain,
    email_field: SelectorChain,
    submit: SelectorChain,
}

impl<'a> ListingSession<'a> {
    pub fn new(
        browser: &'a dyn BrowserActions,
        jar: CookieJar,
        base_url: &str,
        login_url: &str,
        timeout_ms: u64,
    ) -> Result<Self> {
        Ok(Self {
            browser,
            jar,
            base_url: base_url.to_string(),
            login_url: login_url.to_string(),
            timeout_ms,
            indicators: SelectorChain::parse(LOGGED_IN_INDICATORS)?,
            links: SelectorChain::parse(&["a"])?,
            email_field: SelectorChain::parse(EMAIL_FIELD_SELECTORS)?,
            submit: SelectorChain::parse(SUBMIT_SELECTORS)?,
        })
    }

    /// Restore or create a logged-in session. Any failure is fatal for the run.
    pub async fn establish(&self, credentials: &Credentials) -> Result<SessionOrigin> {
        if self.restore().await {
            tracing::info!("Restored listing session from saved cookies");
            return Ok(SessionOrigin::Restored);
        }

        self.login(credentials).await?;
        tracing::info!("Logged in to listing site");

        match self.browser.cookies().await {
            Ok(cookies) => match self.jar.save(&cookies) {
                Ok(()) => {
                    tracing::debug!(path = %self.jar.path().display(), "Saved session cookies");
                }
                Err(e) => tracing::warn!(error = %e, "Could not persist session cookies"),
            },
            Err(e) => tracing::warn!(error = %e, "Could not read session cookies"),
        }

        Ok(SessionOrigin::LoggedIn)
    }

    /// Whether the current page belongs to a logged-in account.
    ///
    /// Checks the indicator links first, then link texts. A page away from the
    /// login URL that offers no login link also counts as logged in.
    pub async fn is_logged_in(&self) -> bool {
        if self.indicators.first_present(self.browser, 0).await.is_some() {
            return true;
        }

        let (html, url) = match (self.browser.content().await, self.browser.current_url().await) {
            (Ok(html), Ok(url)) => (html, url),
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!(error = %e, "Could not inspect page for a session");
                return false;
            }
        };
        self.page_shows_session(&html, &url)
    }

    fn page_shows_session(&self, html: &str, url: &str) -> bool {
        let document = Html::parse_document(html);
        let mut offers_login = false;

        for anchor in self.links.select_all(document.root_element()) {
            let text = element_text(anchor);
            if LOGGED_IN_LINK_TEXT.iter().any(|t| text.contains(t)) {
                return true;
            }
            let href = anchor.value().attr("href").unwrap_or_default();
            if LOGIN_LINK_TEXT.iter().any(|t| text.contains(t))
                || href.to_lowercase().contains("login")
            {
                offers_login = true;
            }
        }

        !offers_login && !url.to_lowercase().contains("login")
    }

    async fn restore(&self) -> bool {
        let cookies = match self.jar.load() {
            Ok(Some(cookies)) if !cookies.is_empty() => cookies,
            Ok(_) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable cookie file");
                return false;
            }
        };

        let applied: creatorscope_browser::Result<()> = async {
            self.browser.navigate(&self.base_url).await?;
            self.browser.set_cookies(&cookies).await?;
            self.browser.reload().await
        }
        .await;

        if let Err(e) = applied {
            tracing::warn!(error = %e, "Could not apply saved cookies");
            return false;
        }

        let restored = self.is_logged_in().await;
        if !restored {
            tracing::debug!("Saved cookies did not restore a session");
        }
        restored
    }

    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.browser
            .navigate(&self.login_url)
            .await
            .map_err(|e| auth_failure(format!("login page did not load: {e}")))?;

        let email_field = self
            .email_field
            .first_present(self.browser, self.timeout_ms)
            .await
            .ok_or_else(|| auth_failure("email field not found"))?;
        self.browser
            .fill_field(email_field, &credentials.email)
            .await
            .map_err(|e| auth_failure(format!("could not fill email: {e}")))?;

        self.browser
            .wait_for_selector(PASSWORD_FIELD_SELECTOR, self.timeout_ms)
            .await
            .map_err(|_| auth_failure("password field not found"))?;
        self.browser
            .fill_field(PASSWORD_FIELD_SELECTOR, &credentials.password)
            .await
            .map_err(|e| auth_failure(format!("could not fill password: {e}")))?;

        let submitted = match self.submit.first_present(self.browser, 0).await {
            Some(button) => self.browser.click(button).await,
            None => self.browser.press_enter(PASSWORD_FIELD_SELECTOR).await,
        };
        submitted.map_err(|e| auth_failure(format!("could not submit login form: {e}")))?;

        // Gives the post-login page time to render; the check below decides.
        let any_indicator = LOGGED_IN_INDICATORS.join(", ");
        if let Err(e) = self
            .browser
            .wait_for_selector(&any_indicator, self.timeout_ms)
            .await
        {
            tracing::debug!(error = %e, "No indicator link after login, checking page");
        }

        if self.is_logged_in().await {
            Ok(())
        } else {
            Err(auth_failure("still not logged in after submitting credentials"))
        }
    }
}

fn auth_failure(reason: impl Into<String>) -> ScanError {
    ScanError::Authentication {
        reason: reason.into(),
    }
}
