use std::collections::HashSet;

use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use tokio::time::timeout;

use crate::config::{CrawlerConfig, OnError};
use crate::extract::Extractor;
use crate::frontier::{Frontier, Visit};
use crate::links;
use crate::renderer::{snapshots, Renderer, ScrollPolicy};
use crate::vocabulary::Vocabulary;

/// Words and followable links gathered from every snapshot of one page.
#[derive(Debug, Default)]
struct Harvest {
    words: Vec<String>,
    links: Vec<String>,
}

impl Harvest {
    fn dedup_links(&mut self) {
        let mut seen = HashSet::new();
        self.links.retain(|link| seen.insert(link.clone()));
    }
}

struct Crawler<'a> {
    config: &'a CrawlerConfig,
    extractor: Extractor,
    frontier: Frontier,
    vocabulary: Vocabulary,
}

impl<'a> Crawler<'a> {
    fn new(config: &'a CrawlerConfig) -> Self {
        Self {
            config,
            extractor: Extractor::new(config.min_word_length),
            frontier: Frontier::new(config.seeds.iter().cloned()),
            vocabulary: Vocabulary::new(),
        }
    }

    fn scroll_policy(&self) -> ScrollPolicy {
        ScrollPolicy {
            max_scrolls: self.config.max_scrolls,
            page_load_delay: self.config.page_load_delay(),
            scroll_delay: self.config.scroll_delay(),
        }
    }

    async fn run<R>(mut self, renderer: &mut R) -> Result<Vocabulary>
    where
        R: Renderer + ?Sized,
    {
        while let Some(Visit { url, depth }) = self.frontier.next_visit() {
            log::info!("Scraping {url} (depth {depth})");
            match self.harvest(&mut *renderer, &url, depth).await {
                Ok(Harvest { words, links }) => {
                    self.vocabulary.extend(&words);
                    let unvisited = links
                        .into_iter()
                        .filter(|link| !self.frontier.is_visited(link))
                        .collect::<Vec<_>>();
                    self.frontier.push(unvisited, depth + 1);
                }
                Err(e) => match self.config.on_render_error {
                    OnError::SkipAndLog => {
                        log::error!("Skipping {url} got: {e:#}");
                    }
                    OnError::Fail => return Err(e.context(format!("Couldn't render {url}"))),
                },
            }
        }

        log::info!(
            "Crawled {} page(s), found {} distinct word(s)",
            self.frontier.visited_count(),
            self.vocabulary.len()
        );
        Ok(self.vocabulary)
    }

    async fn harvest<R>(&self, renderer: &mut R, url: &str, depth: usize) -> Result<Harvest>
    where
        R: Renderer + ?Sized,
    {
        let follow_links = depth < self.config.max_depth;
        let render = async {
            let mut harvest = Harvest::default();
            let pages = snapshots(&mut *renderer, url, self.scroll_policy());
            futures::pin_mut!(pages);
            while let Some(page) = pages.try_next().await? {
                harvest.words.extend(self.extractor.words(&page.html));
                if follow_links {
                    let allowed = self
                        .extractor
                        .links(&page.html, &page.url)
                        .into_iter()
                        .filter(|link| links::is_allowed(link));
                    harvest.links.extend(allowed);
                }
            }
            Ok::<_, anyhow::Error>(harvest)
        };

        let mut harvest = match self.config.render_timeout() {
            Some(limit) => timeout(limit, render)
                .await
                .map_err(|_| anyhow!("Timed out after {limit:?}"))??,
            None => render.await?,
        };
        harvest.dedup_links();
        Ok(harvest)
    }
}

/// Crawls `config.seeds` up to `config.max_depth` link hops and returns the
/// vocabulary found on every rendered page.
///
/// The renderer is released before returning, whatever the outcome.
pub async fn crawl_words<R>(config: &CrawlerConfig, mut renderer: R) -> Result<Vocabulary>
where
    R: Renderer,
{
    let res = match config.validate() {
        Ok(()) => {
            let crawl = Crawler::new(config).run(&mut renderer);
            if config.handle_sigint {
                tokio::select! {
                    res = crawl => res,
                    Ok(()) = tokio::signal::ctrl_c() => Err(anyhow!("Interrupted")),
                }
            } else {
                crawl.await
            }
        }
        Err(e) => Err(anyhow!("Invalid crawler config: {e}")),
    };

    if let Err(e) = renderer.quit().await {
        log::warn!("Couldn't release renderer got: {e:#}");
    }

    res
}
