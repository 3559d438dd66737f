//! Page-fetch capability consumed by the source adapters.

use crate::error::FetchError;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches one page worth of raw content from an absolute URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP fetcher. Good enough for portals that render server-side or
/// expose a JSON API.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching URL: {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;
        debug!("Downloaded {} bytes", body.len());
        Ok(body)
    }
}

/// Browser-based fetcher using headless Chrome, for portals that only
/// render their listings client-side.
pub struct BrowserFetcher {
    browser: Arc<Browser>,
}

impl BrowserFetcher {
    pub fn new() -> Result<Self, FetchError> {
        info!("Launching headless Chrome...");
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| FetchError::Browser(e.to_string()))?;
        Ok(Self {
            browser: Arc::new(browser),
        })
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let browser = self.browser.clone();
        let url = url.to_string();
        // Chrome tab operations block, so they run off the scheduler thread.
        tokio::task::spawn_blocking(move || -> Result<String, FetchError> {
            let tab = browser
                .new_tab()
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            tab.navigate_to(&url)
                .and_then(|t| t.wait_until_navigated())
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            let result = tab
                .evaluate("document.documentElement.outerHTML", false)
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            let html = result
                .value
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            Ok(html)
        })
        .await
        .map_err(|e| FetchError::Browser(e.to_string()))?
    }
}
