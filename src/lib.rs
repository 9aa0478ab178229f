//! Harvests entry records out of the loosely structured HTML tables of an
//! encyclopedic site and exports them as flat rows.
//!
//! The pipeline is: [`discovery`] finds list pages, [`crawler`] fetches them
//! through a [`fetcher::PageSource`], [`extractor`] turns every primary table
//! into a [`extractor::Record`], and [`export`] writes the rows.

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod export;
pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod report;
