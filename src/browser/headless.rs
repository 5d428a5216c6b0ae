use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Launch a headless browser and navigate to the given URL.
pub async fn launch_headless_browser(url: &str) -> Result<(Browser, Page)> {
    info!("Launching headless browser...");
    debug!("target URL: {}", url);

    let config = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--remote-debugging-port=0",
        ])
        .build()
        .map_err(|e| {
            error!("failed to configure headless browser: {}", e);
            anyhow::anyhow!("failed to configure headless browser: {}", e)
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("failed to launch headless browser: {}", e);
        anyhow::anyhow!("failed to launch headless browser: {}", e)
    })?;
    debug!("headless browser started");

    // Drive the CDP event stream in the background.
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Short pause so the browser state has settled before we open a page.
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("failed to open page: {}", e);
        anyhow::anyhow!("failed to open page: {}", e)
    })?;

    info!("✓ headless browser navigated to: {}", url);

    Ok((browser, page))
}
