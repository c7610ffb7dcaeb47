use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub url: String,
    pub depth: usize,
}

/// Depth-first work list of URLs to render along with the set of URLs already
/// dispatched.
///
/// A URL is marked as visited when it is popped, so a page reachable through
/// several paths is rendered once, by whichever path reaches it first.
#[derive(Debug, Default)]
pub struct Frontier {
    visited: HashSet<String>,
    pending: Vec<Visit>,
}

impl Frontier {
    pub fn new<I>(seeds: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut frontier = Self::default();
        frontier.push(seeds, 0);
        frontier
    }

    /// Schedules `urls` at `depth`, they will be popped in the given order
    /// before anything scheduled earlier.
    pub fn push<I>(&mut self, urls: I, depth: usize)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let start = self.pending.len();
        self.pending.extend(urls.into_iter().map(|url| Visit {
            url: url.into(),
            depth,
        }));
        self.pending[start..].reverse();
    }

    /// Pops the next unvisited URL and marks it visited.
    pub fn next_visit(&mut self) -> Option<Visit> {
        while let Some(visit) = self.pending.pop() {
            if self.visited.insert(visit.url.clone()) {
                return Some(visit);
            }
        }
        None
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
