use crate::config::BrowserConfig;
use crate::crawler::{CrawlReport, Crawler};
use crate::{Result, SessionError};
use tracing::info;

#[cfg(feature = "browser")]
use super::ChromeSession;

/// Hands out browser sessions built from one browser configuration
pub struct SessionManager {
    config: BrowserConfig,
}

impl SessionManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Launches a fresh browser session
    #[cfg(feature = "browser")]
    pub async fn acquire(&self) -> std::result::Result<ChromeSession, SessionError> {
        info!(
            "Launching browser ({})",
            if self.config.headless { "headless" } else { "visible" }
        );
        ChromeSession::launch(&self.config).await
    }

    /// Crawls `url` in a session of its own
    ///
    /// The session is closed before this returns, whether the crawl
    /// succeeded or not.
    #[cfg(feature = "browser")]
    pub async fn crawl(&self, crawler: &Crawler, url: &str) -> Result<CrawlReport> {
        let session = self.acquire().await?;
        crawler.run(session, url).await
    }

    #[cfg(not(feature = "browser"))]
    pub async fn crawl(&self, _crawler: &Crawler, url: &str) -> Result<CrawlReport> {
        info!("Cannot crawl {} without a browser", url);
        Err(SessionError::Launch(
            "browser support not compiled. Rebuild with: cargo build --features browser"
                .to_string(),
        )
        .into())
    }
}
