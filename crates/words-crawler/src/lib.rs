mod config;
mod crawler;
mod emit;
mod extract;
mod frontier;
pub mod links;
mod renderer;
mod unescape;
mod vocabulary;

pub use config::{ConfigError, CrawlerConfig, OnError};
pub use crawler::crawl_words;
pub use emit::write_words;
pub use extract::Extractor;
pub use frontier::{Frontier, Visit};
pub use renderer::{snapshots, Renderer, ScrollPolicy, Snapshot};
pub use vocabulary::Vocabulary;

pub use anyhow;
pub use async_trait::async_trait;
