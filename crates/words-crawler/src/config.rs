use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_scrolls")]
    pub max_scrolls: usize,

    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Seconds to wait after a page is opened
    #[serde(default = "default_page_load_delay")]
    pub page_load_delay: f64,

    /// Seconds to wait after each effective scroll step
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay: f64,

    /// Seconds allowed to render a page and all of its scroll steps
    #[serde(default = "default_render_timeout")]
    pub render_timeout: Option<f64>,

    #[serde(default = "default_on_render_error")]
    pub on_render_error: OnError,

    #[serde(default = "default_handle_sigint")]
    pub handle_sigint: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: vec![],
            max_depth: default_max_depth(),
            max_scrolls: default_max_scrolls(),
            min_word_length: default_min_word_length(),
            page_load_delay: default_page_load_delay(),
            scroll_delay: default_scroll_delay(),
            render_timeout: default_render_timeout(),
            on_render_error: default_on_render_error(),
            handle_sigint: default_handle_sigint(),
        }
    }
}

fn default_max_depth() -> usize {
    0
}

fn default_max_scrolls() -> usize {
    0
}

fn default_min_word_length() -> usize {
    3
}

fn default_page_load_delay() -> f64 {
    3.0
}

fn default_scroll_delay() -> f64 {
    1.0
}

fn default_render_timeout() -> Option<f64> {
    None
}

fn default_on_render_error() -> OnError {
    OnError::Fail
}

fn default_handle_sigint() -> bool {
    true
}

impl CrawlerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seeds.is_empty() {
            return Err(ConfigError::NoSeed);
        }
        if self.min_word_length == 0 {
            return Err(ConfigError::MinWordLength);
        }
        check_delay("pageLoadDelay", self.page_load_delay)?;
        check_delay("scrollDelay", self.scroll_delay)?;
        if let Some(secs) = self.render_timeout {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::RenderTimeout(secs));
            }
        }
        Ok(())
    }

    // Only meaningful on a validated config
    pub fn page_load_delay(&self) -> Duration {
        Duration::from_secs_f64(self.page_load_delay)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_secs_f64(self.scroll_delay)
    }

    pub fn render_timeout(&self) -> Option<Duration> {
        self.render_timeout.map(Duration::from_secs_f64)
    }
}

fn check_delay(name: &'static str, secs: f64) -> Result<(), ConfigError> {
    if secs.is_finite() && secs >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Delay { name, secs })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no seed URL given")]
    NoSeed,
    #[error("minWordLength must be greater than 0")]
    MinWordLength,
    #[error("{name} must be a positive number of seconds, got: {secs}")]
    Delay { name: &'static str, secs: f64 },
    #[error("renderTimeout must be greater than 0, got: {0}")]
    RenderTimeout(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}
