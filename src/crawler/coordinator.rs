//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop that ties together:
//! - The FIFO frontier
//! - The fetcher and its retry policy
//! - The scope filter for final URLs and discovered links
//! - The crawl store, which persists pages and the visited set

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::fetcher::{FetchResult, FetchedPage, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::storage::{CrawlStore, FINISHED_PROPERTY};
use crate::url::Scope;
use crate::SearchError;
use std::time::Instant;

/// Counters collected over one crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// URLs handed to the fetcher
    pub fetched: u64,
    /// Pages persisted as crawl records
    pub stored: u64,
    /// Fetched pages whose final URL was out of scope or already visited
    pub rejected: u64,
    /// Responses with a bad status or content type
    pub skipped: u64,
    /// URLs that kept failing at the network level
    pub failed: u64,
}

/// Main crawler coordinator structure
pub struct Coordinator<'a, S: CrawlStore> {
    store: &'a mut S,
    scope: Scope,
    fetcher: Fetcher,
    frontier: Frontier,
}

impl<'a, S: CrawlStore> Coordinator<'a, S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `crawler` - HTTP timeouts, retries and redirect limit
    /// * `user_agent` - User agent sent with every request
    /// * `scope` - Allowed prefixes
    /// * `store` - Where pages and visited URLs are persisted
    pub fn new(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
        scope: Scope,
        store: &'a mut S,
    ) -> Result<Self, SearchError> {
        let fetcher = Fetcher::new(crawler, user_agent)?;
        Ok(Self::with_fetcher(fetcher, scope, store))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, scope: Scope, store: &'a mut S) -> Self {
        Self {
            store,
            scope,
            fetcher,
            frontier: Frontier::new(),
        }
    }

    /// Queues seed URLs that have not been visited yet
    ///
    /// Returns the number of seeds actually queued.
    pub fn seed<T: AsRef<str>>(&mut self, seeds: &[T]) -> Result<usize, SearchError> {
        let mut queued = 0;

        for seed in seeds {
            let seed = seed.as_ref();
            if self.store.is_visited(seed)? {
                tracing::debug!(url = %seed, "Seed already visited");
                continue;
            }
            if self.frontier.push(seed) {
                queued += 1;
            }
        }

        tracing::info!("Seeded frontier with {} URLs", queued);
        Ok(queued)
    }

    /// Number of URLs waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Runs the crawl loop until the frontier is empty
    ///
    /// Each popped URL is fetched once. Accepted pages are committed to the
    /// store before the next fetch, and the `finished` property is written
    /// when the loop ends.
    pub async fn run(&mut self) -> Result<CrawlReport, SearchError> {
        tracing::info!("Starting crawl");

        let mut report = CrawlReport::default();
        let start_time = Instant::now();

        while let Some(link) = self.frontier.pop() {
            if self.store.is_visited(&link)? {
                tracing::debug!(url = %link, "Already visited");
                continue;
            }

            tracing::info!(url = %link, "Visiting");
            report.fetched += 1;

            match self.fetcher.fetch(&link).await {
                FetchResult::Fetched(page) => self.accept(&link, page, &mut report)?,
                FetchResult::Skipped { reason } => {
                    tracing::info!(url = %link, "Skipping page: {}", reason);
                    report.skipped += 1;
                }
                FetchResult::Failed { error, attempts } => {
                    tracing::warn!(url = %link, attempts, "Fetch failed: {}", error);
                    report.failed += 1;
                }
            }

            if report.fetched % 10 == 0 {
                let rate = report.fetched as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} fetched, {} stored, {} in frontier, {:.2} pages/sec",
                    report.fetched,
                    report.stored,
                    self.frontier.len(),
                    rate
                );
            }
        }

        self.store.set_property(FINISHED_PROPERTY, true)?;

        tracing::info!(
            fetched = report.fetched,
            stored = report.stored,
            rejected = report.rejected,
            skipped = report.skipped,
            failed = report.failed,
            "Crawl completed in {:?}",
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Persists an accepted page and queues its links
    fn accept(
        &mut self,
        requested: &str,
        page: FetchedPage,
        report: &mut CrawlReport,
    ) -> Result<(), SearchError> {
        if !self.scope.matches(&page.final_url) || self.store.is_visited(&page.final_url)? {
            tracing::debug!(url = %requested, final_url = %page.final_url, "Final URL rejected");
            self.store.mark_visited(requested)?;
            report.rejected += 1;
            return Ok(());
        }

        self.store.store_page(requested, &page.final_url, &page.body)?;
        report.stored += 1;

        let mut queued = 0;
        for link in &page.links {
            if self.frontier.contains(link) || !self.scope.matches(link) {
                continue;
            }
            if self.store.is_visited(link)? {
                continue;
            }
            if self.frontier.push(link) {
                queued += 1;
            }
        }

        tracing::debug!(
            url = %page.final_url,
            found = page.links.len(),
            queued,
            "Links processed"
        );

        Ok(())
    }
}

/// Crawls from the given seeds until no in-scope links remain
///
/// # Example
///
/// ```no_run
/// use site_search::config::Config;
/// use site_search::crawler::run_crawl;
/// use site_search::storage::MemoryStorage;
/// use site_search::url::Scope;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let seeds = ["https://example.org/docs/"];
/// let scope = Scope::from_seeds(&seeds)?;
/// let mut store = MemoryStorage::default();
/// let report = run_crawl(&config, scope, &seeds, &mut store).await?;
/// println!("{} pages stored", report.stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<S: CrawlStore, T: AsRef<str>>(
    config: &crate::config::Config,
    scope: Scope,
    seeds: &[T],
    store: &mut S,
) -> Result<CrawlReport, SearchError> {
    let mut coordinator = Coordinator::new(&config.crawler, &config.user_agent, scope, store)?;
    coordinator.seed(seeds)?;
    coordinator.run().await
}
