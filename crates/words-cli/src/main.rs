use std::env;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use serde::{Deserialize, Serialize};
use tokio::runtime;
use words_browser::{BrowserConfig, ChromeRenderer, SocksProxy};
use words_crawler::{
    crawl_words, links, write_words, CrawlerConfig, Extractor, OnError, Vocabulary,
};

/// Words scraper
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[command(name = "crawl")]
    Crawl(CrawlArgs),
    #[command(name = "extract")]
    Extract(ExtractArgs),
    #[command(hide = true)]
    Completion,
}

/// Crawl pages and save the words they contain by descending frequency
#[derive(Debug, clap::Args)]
pub struct CrawlArgs {
    /// URLs to start crawling from
    #[arg(required = true)]
    pub urls: Vec<String>,
    /// Path to the output file that will contain one word per line
    #[arg(long, short)]
    pub output_file: PathBuf,
    /// Optional default yaml configuration file
    #[arg(env = "WORDS_CRAWLER_CONFIG", long)]
    pub crawler_config: Option<PathBuf>,
    /// Override scraping depth, 0 only scrapes the given URLs
    #[arg(long)]
    pub depth: Option<usize>,
    /// Override maximum number of page scrolls
    #[arg(long)]
    pub max_scrolls: Option<usize>,
    /// Override minimum word length
    #[arg(long)]
    pub min_word_length: Option<usize>,
    /// Override page loading delay in seconds
    #[arg(long)]
    pub page_load_delay: Option<f64>,
    /// Override page scrolling delay in seconds
    #[arg(long)]
    pub page_scroll_delay: Option<f64>,
    /// Give up rendering a page after this many seconds
    #[arg(long)]
    pub render_timeout: Option<f64>,
    /// Show browser GUI
    #[arg(long)]
    pub show_gui: bool,
    /// SOCKS proxy e.g. 127.0.0.1:1080
    #[arg(long)]
    pub socks_proxy: Option<SocksProxy>,
    /// Path to the Chrome/Chromium executable
    #[arg(long)]
    pub chrome_executable: Option<PathBuf>,
    /// Override page rendering error handling strategy
    #[arg(value_enum, long)]
    pub on_render_error: Option<OnError>,
    /// No SIGINT handling, an interrupted crawl won't release the browser
    #[arg(long)]
    pub no_sigint: bool,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordsConfig {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl TryFrom<&CrawlArgs> for WordsConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CrawlArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(path) = &args.crawler_config {
            serde_yaml::from_reader(fs_err::File::open(path)?)
                .with_context(|| format!("Couldn't read {}", path.display()))?
        } else {
            WordsConfig::default()
        };
        let crawler = &mut conf.crawler;
        crawler.seeds = args.urls.clone();
        if let Some(depth) = args.depth {
            crawler.max_depth = depth;
        }
        if let Some(max_scrolls) = args.max_scrolls {
            crawler.max_scrolls = max_scrolls;
        }
        if let Some(min_word_length) = args.min_word_length {
            crawler.min_word_length = min_word_length;
        }
        if let Some(page_load_delay) = args.page_load_delay {
            crawler.page_load_delay = page_load_delay;
        }
        if let Some(page_scroll_delay) = args.page_scroll_delay {
            crawler.scroll_delay = page_scroll_delay;
        }
        if let Some(render_timeout) = args.render_timeout {
            crawler.render_timeout = Some(render_timeout);
        }
        if let Some(on_render_error) = args.on_render_error {
            crawler.on_render_error = on_render_error;
        }
        if args.no_sigint {
            crawler.handle_sigint = false;
        }
        let browser = &mut conf.browser;
        if args.show_gui {
            browser.headless = false;
        }
        if let Some(socks_proxy) = &args.socks_proxy {
            browser.socks_proxy = Some(socks_proxy.clone());
        }
        if let Some(chrome_executable) = &args.chrome_executable {
            browser.chrome_executable = Some(chrome_executable.clone());
        }
        Ok(conf)
    }
}

/// Writes the words next to `path` first so that a failure never leaves a
/// truncated output file behind.
fn save_words(vocabulary: &Vocabulary, path: &Path) -> anyhow::Result<usize> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    let written = write_words(vocabulary, BufWriter::new(&mut file))?;
    file.persist(path)
        .with_context(|| format!("Couldn't write {}", path.display()))?;
    Ok(written)
}

pub fn crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let WordsConfig {
        crawler: crawler_conf,
        browser: browser_conf,
    } = (&args).try_into()?;
    crawler_conf.validate().context("Invalid crawler config")?;

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let vocabulary = rt.block_on(async {
        let renderer = ChromeRenderer::launch(&browser_conf).await?;
        crawl_words(&crawler_conf, renderer).await
    })?;

    let written = save_words(&vocabulary, &args.output_file)?;
    println!("Saved {written} words");
    Ok(())
}

/// Extract words from a local html page and print them to stdout
#[derive(Debug, clap::Args)]
pub struct ExtractArgs {
    /// A local html page to extract words from
    #[arg(long)]
    pub file: PathBuf,
    /// Minimum word length
    #[arg(long, default_value_t = 3)]
    pub min_word_length: usize,
    /// Print the links that would be followed instead of the words
    #[arg(long)]
    pub links: bool,
    /// URL the page was served from, relative links are resolved against it
    #[arg(long, requires = "links")]
    pub base_url: Option<String>,
}

pub fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    if args.min_word_length == 0 {
        anyhow::bail!("Minimum word length must be greater than 0");
    }
    let page = fs_err::read_to_string(&args.file)?;
    let extractor = Extractor::new(args.min_word_length);
    let mut out = io::stdout().lock();
    if args.links {
        for link in extractor
            .links(&page, args.base_url.as_deref().unwrap_or_default())
            .into_iter()
            .filter(|link| links::is_allowed(link))
        {
            writeln!(out, "{link}")?;
        }
    } else {
        let vocabulary = extractor.words(&page).into_iter().collect::<Vocabulary>();
        write_words(&vocabulary, out)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Crawl(args) => {
            if !args.quiet {
                if env::var_os("RUST_LOG").is_none() {
                    env::set_var("RUST_LOG", "words_crawler=info,words_browser=warn");
                }
                env_logger::init();
            }
            crawl(args)
        }
        SubCommand::Extract(args) => {
            env::set_var("RUST_LOG", "words_crawler=warn");
            env_logger::init();
            extract(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "words", &mut io::stdout());
            Ok(())
        }
    }
}
