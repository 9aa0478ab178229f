//! Per-page pipeline: fetch, extract, collect.

use tracing::{error, info, warn};

use crate::extractor::{self, Record, TableExtractor};
use crate::fetcher::{FetchError, PageSource};

/// Outcome of crawling a list of pages.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    pub records: Vec<Record>,
    pub pages_ok: usize,
    pub pages_failed: usize,
}

pub struct Crawler<S> {
    source: S,
    extractor: TableExtractor,
}

impl<S: PageSource> Crawler<S> {
    pub fn new(source: S, extractor: TableExtractor) -> Self {
        Self { source, extractor }
    }

    /// Fetch one page and extract its records. Fetch failures propagate.
    pub async fn crawl_page(&self, url: &str) -> Result<Vec<Record>, FetchError> {
        let page = self.source.fetch_page(url).await?;
        Ok(extractor::extract(&page, &self.extractor))
    }

    /// Crawl every page, logging and skipping the ones that fail to fetch.
    pub async fn crawl_all<I>(&self, urls: I) -> CrawlSummary
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut summary = CrawlSummary::default();

        for url in urls {
            let url = url.as_ref();
            info!(url, "crawling page");
            match self.crawl_page(url).await {
                Ok(records) => {
                    info!(url, count = records.len(), "records captured on page");
                    summary.pages_ok += 1;
                    summary.records.extend(records);
                }
                Err(err) => {
                    error!(url, error = %err, "failed to process page");
                    summary.pages_failed += 1;
                }
            }
        }

        if summary.records.is_empty() {
            warn!(
                pages_ok = summary.pages_ok,
                pages_failed = summary.pages_failed,
                "nothing extracted"
            );
        }
        summary
    }
}
