use creatorscope_browser::actions::BrowserActions;
use creatorscope_browser::{BrowserEngine, FingerprintConfig, LaunchOptions};
use std::time::{Duration, Instant};

fn options(min_delay: Duration) -> LaunchOptions {
    LaunchOptions {
        headless: true,
        fingerprint: FingerprintConfig::default(),
        navigation_timeout: Duration::from_secs(30),
        min_delay,
    }
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_browser_engine_launch_and_close() {
    let engine = BrowserEngine::launch(options(Duration::ZERO)).await;
    assert!(engine.is_ok(), "Failed to launch browser engine");
    engine.unwrap().close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation_and_content() {
    let engine = BrowserEngine::launch(options(Duration::ZERO)).await.unwrap();

    engine.navigate("https://example.com").await.unwrap();
    engine.wait_for_selector("body", 5_000).await.unwrap();
    assert!(engine.content().await.unwrap().contains("<body"));
    assert!(!engine.exists("div.profile-listing-holder").await.unwrap());

    engine.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_same_domain_navigation_is_paced() {
    let delay = Duration::from_millis(800);
    let engine = BrowserEngine::launch(options(delay)).await.unwrap();

    let start = Instant::now();
    engine.navigate("https://example.com").await.unwrap();
    engine.navigate("https://example.com/page2").await.unwrap();
    assert!(start.elapsed() >= delay);

    engine.close().await.unwrap();
}
