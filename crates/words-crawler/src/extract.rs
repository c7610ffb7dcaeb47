use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::unescape::unescape;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--(.*?)-->").unwrap();
    static ref SCRIPT: Regex = Regex::new(r"(?is)<script.*?>.*?</script>").unwrap();
    static ref STYLE: Regex = Regex::new(r"(?is)<style.*?>.*?</style>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<.*?>").unwrap();
    static ref ANCHOR: Selector = Selector::parse("a[href]").unwrap();
}

/// Turns one HTML snapshot into candidate words and outbound links.
///
/// Words come from two passes over the markup: the text of HTML comments,
/// and the visible text once `script`/`style` blocks and every remaining tag
/// are stripped. Character references are decoded in both. A word is any
/// whitespace delimited token whose length (in chars) reaches
/// `min_word_length`; no case folding or punctuation stripping is applied.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    min_word_length: usize,
}

impl Extractor {
    pub fn new(min_word_length: usize) -> Self {
        Self { min_word_length }
    }

    pub fn words(&self, html: &str) -> Vec<String> {
        let comments = comments_text(html);
        let text = visible_text(html);
        comments
            .split_whitespace()
            .chain(text.split_whitespace())
            .filter(|word| self.is_long_enough(word))
            .map(String::from)
            .collect()
    }

    pub fn is_long_enough(&self, word: &str) -> bool {
        word.chars().count() >= self.min_word_length
    }

    /// Every `href` of an anchor element resolved against `page_url`, in
    /// document order, duplicates kept.
    ///
    /// When `page_url` is not a valid absolute URL only absolute hrefs are
    /// kept. Hrefs that do not resolve are dropped.
    pub fn links(&self, html: &str, page_url: &str) -> Vec<String> {
        let base = Url::parse(page_url).ok();
        Html::parse_document(html)
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve_link(base.as_ref(), href))
            .collect()
    }
}

fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    let url = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    url.ok().map(String::from)
}

fn comments_text(html: &str) -> String {
    // No separator: adjacent comments run together
    let joined = COMMENT
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect::<String>();
    unescape(&joined).into_owned()
}

fn visible_text(html: &str) -> String {
    let text = SCRIPT.replace_all(html, " ");
    let text = STYLE.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    unescape(&text).into_owned()
}
