/// Desktop Chrome user agent every session presents as.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Injected before any page script runs so `navigator.webdriver` reads as unset.
pub(crate) const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Fingerprint configuration for a browser session
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl FingerprintConfig {
    /// Desktop user agent with the given viewport
    pub fn desktop(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            viewport_width,
            viewport_height,
        }
    }

    /// Chromium launch arguments carrying this fingerprint
    pub(crate) fn launch_args(&self) -> Vec<String> {
        vec![
            format!("--user-agent={}", self.user_agent),
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-dev-shm-usage".to_string(),
        ]
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self::desktop(1920, 1080)
    }
}
