use anyhow::{Context, Result};
use dexharvest::{
    config::Config,
    crawler::Crawler,
    discovery::discover_pages,
    export::{write_records, written_rows},
    extractor::TableExtractor,
    fetcher::HttpFetcher,
    logging,
    report::DatasetReport,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    logging::init(&config).context("failed to initialise logging")?;

    let fetcher = HttpFetcher::new(config.fetch_max_retries())?;
    let start_page = config.start_page().as_str();

    let urls = match discover_pages(&fetcher, start_page, config.base_url()).await {
        Ok(urls) => urls,
        Err(err) => {
            error!(start_page, error = %err, "page discovery failed, crawling start page only");
            vec![start_page.to_string()]
        }
    };
    println!("{} pages found. Starting capture...", urls.len());

    let crawler = Crawler::new(fetcher, TableExtractor::new(config.base_url().clone()));
    let summary = crawler.crawl_all(&urls).await;
    println!(
        "{} records captured from {} pages ({} failed).",
        summary.records.len(),
        summary.pages_ok,
        summary.pages_failed
    );

    if summary.records.is_empty() {
        warn!("no records captured, nothing to export");
        return Ok(());
    }

    let output = config.output_file();
    let written = write_records(&summary.records, output)
        .with_context(|| format!("failed to export to {}", output.display()))?;
    info!(written, output = %output.display(), "export finished");
    println!("{written} records exported to '{}'.", output.display());

    DatasetReport::from_rows(&written_rows(&summary.records)).log();
    Ok(())
}
