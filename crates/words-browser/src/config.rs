use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default)]
    pub socks_proxy: Option<SocksProxy>,

    /// Browser binary, looked up by chromiumoxide when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            socks_proxy: None,
            chrome_executable: None,
            window_size: default_window_size(),
        }
    }
}

fn default_headless() -> bool {
    true
}

fn default_window_size() -> (u32, u32) {
    (1280, 1024)
}

/// A SOCKS5 proxy, written as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SocksProxy {
    pub host: String,
    pub port: u16,
}

impl SocksProxy {
    pub fn proxy_server(&self) -> String {
        format!("socks5://{self}")
    }
}

impl fmt::Display for SocksProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyError {
    #[error("invalid proxy {0:?}, expected host:port")]
    Format(String),
    #[error("invalid proxy host in {0:?}")]
    Host(String),
    #[error("invalid proxy port in {0:?}, expected 0-65535")]
    Port(String),
}

impl FromStr for SocksProxy {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        let [host, port] = parts[..] else {
            return Err(ProxyError::Format(s.to_string()));
        };
        if host.is_empty() {
            return Err(ProxyError::Host(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| ProxyError::Port(s.to_string()))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl TryFrom<String> for SocksProxy {
    type Error = ProxyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SocksProxy> for String {
    fn from(proxy: SocksProxy) -> Self {
        proxy.to_string()
    }
}
