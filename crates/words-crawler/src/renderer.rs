use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, Stream};

/// A browser session able to load a page and scroll through it.
#[async_trait]
pub trait Renderer: Send {
    async fn open(&mut self, url: &str) -> anyhow::Result<()>;

    /// Markup of the page as currently rendered.
    async fn current_source(&mut self) -> anyhow::Result<String>;

    /// Address of the page as currently loaded, after any redirect.
    async fn current_url(&mut self) -> anyhow::Result<String>;

    /// Vertical scroll offset of the document.
    async fn scroll_position(&mut self) -> anyhow::Result<f64>;

    async fn scroll_by_one_viewport(&mut self) -> anyhow::Result<()>;

    /// Releases the session, called exactly once at the end of a crawl.
    async fn quit(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollPolicy {
    pub max_scrolls: usize,
    pub page_load_delay: Duration,
    pub scroll_delay: Duration,
}

/// Markup of a page at one scroll step, with the address it was served from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Load,
    Scroll { done: usize, position: f64 },
    Done,
}

/// Lazily renders `url` and yields its successive HTML snapshots.
///
/// The first snapshot is taken once the page is loaded, then one per scroll
/// step, up to `max_scrolls` of them. Scrolling stops early as soon as a step
/// leaves the scroll position unchanged.
pub fn snapshots<'a, R>(
    renderer: &'a mut R,
    url: &'a str,
    policy: ScrollPolicy,
) -> impl Stream<Item = anyhow::Result<Snapshot>> + 'a
where
    R: Renderer + ?Sized,
{
    stream::try_unfold((renderer, Step::Load), move |(renderer, step)| async move {
        let next = advance(&mut *renderer, url, policy, step).await?;
        Ok::<_, anyhow::Error>(next.map(|(page, step)| (page, (renderer, step))))
    })
}

async fn advance<R>(
    renderer: &mut R,
    url: &str,
    policy: ScrollPolicy,
    step: Step,
) -> anyhow::Result<Option<(Snapshot, Step)>>
where
    R: Renderer + ?Sized,
{
    match step {
        Step::Load => {
            renderer.open(url).await?;
            tokio::time::sleep(policy.page_load_delay).await;
            let page = snapshot(renderer).await?;
            let next = if policy.max_scrolls > 0 {
                let position = renderer.scroll_position().await?;
                Step::Scroll { done: 0, position }
            } else {
                Step::Done
            };
            Ok(Some((page, next)))
        }
        Step::Scroll { done, position } if done < policy.max_scrolls => {
            renderer.scroll_by_one_viewport().await?;
            let current = renderer.scroll_position().await?;
            if current == position {
                log::debug!("Scrolling {url} stopped after {done} step(s)");
                return Ok(None);
            }
            tokio::time::sleep(policy.scroll_delay).await;
            let page = snapshot(renderer).await?;
            let next = Step::Scroll {
                done: done + 1,
                position: current,
            };
            Ok(Some((page, next)))
        }
        Step::Scroll { .. } | Step::Done => Ok(None),
    }
}

async fn snapshot<R>(renderer: &mut R) -> anyhow::Result<Snapshot>
where
    R: Renderer + ?Sized,
{
    let html = renderer.current_source().await?;
    let url = renderer.current_url().await?;
    Ok(Snapshot { url, html })
}
