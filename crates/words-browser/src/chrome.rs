use anyhow::{anyhow, Context};
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use words_crawler::{async_trait, Renderer};

use crate::config::BrowserConfig;

const SCROLL_TOP: &str = "document.documentElement.scrollTop";
const SCROLL_VIEWPORT: &str = "window.scrollBy(0, document.documentElement.clientHeight)";

/// Renders pages in a single Chromium tab driven over CDP.
pub struct ChromeRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    profile: Option<TempDir>,
}

impl ChromeRenderer {
    pub async fn launch(config: &BrowserConfig) -> anyhow::Result<Self> {
        let profile = tempfile::Builder::new().prefix("words-chrome-").tempdir()?;

        let (width, height) = config.window_size;
        let mut builder = LaunchConfig::builder()
            .window_size(width, height)
            .user_data_dir(profile.path())
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-notifications")
            .arg("--mute-audio");
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(proxy) = &config.socks_proxy {
            log::info!("Using SOCKS proxy {proxy}");
            builder = builder.arg(format!("--proxy-server={}", proxy.proxy_server()));
        }
        let launch_config = builder
            .build()
            .map_err(|e| anyhow!("Couldn't configure browser got: {e}"))?;

        let (browser, mut events) = Browser::launch(launch_config)
            .await
            .context("Couldn't launch browser")?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    log::debug!("Browser event error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("Couldn't open browser tab")?;

        Ok(Self {
            browser,
            handler,
            page,
            profile: Some(profile),
        })
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&mut self, url: &str) -> anyhow::Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Couldn't navigate to {url}"))?;
        Ok(())
    }

    async fn current_source(&mut self) -> anyhow::Result<String> {
        Ok(self.page.content().await?)
    }

    async fn current_url(&mut self) -> anyhow::Result<String> {
        self.page
            .url()
            .await?
            .ok_or_else(|| anyhow!("Page has no URL"))
    }

    async fn scroll_position(&mut self) -> anyhow::Result<f64> {
        let position = self
            .page
            .evaluate(SCROLL_TOP)
            .await?
            .into_value::<f64>()
            .context("Couldn't read scroll position")?;
        Ok(position)
    }

    async fn scroll_by_one_viewport(&mut self) -> anyhow::Result<()> {
        self.page.evaluate(SCROLL_VIEWPORT).await?;
        Ok(())
    }

    async fn quit(&mut self) -> anyhow::Result<()> {
        let Some(profile) = self.profile.take() else {
            return Ok(());
        };
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            log::warn!("Couldn't wait for browser exit got: {e}");
        }
        self.handler.abort();
        if let Err(e) = profile.close() {
            log::warn!("Couldn't remove browser profile got: {e}");
        }
        closed.context("Couldn't close browser")?;
        Ok(())
    }
}
