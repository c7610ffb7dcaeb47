mod chrome;
mod config;

pub use chrome::ChromeRenderer;
pub use config::{BrowserConfig, ProxyError, SocksProxy};
