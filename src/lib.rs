//! Word trends over press release html documents.
//!
//! Read releases with [`read_html_file`], turn them into words with
//! [`process_html`] and dates with [`extract_date_from_html`], count the words
//! into a [`WordCountTable`] and sum them per year and keyword cluster with
//! [`group_cluster_by_year`].

use anyhow::Result;

pub use cluster::{group_cluster_by_year, ClusterDefinition, ClusterTrends, TrendTable};
pub use date::{DateExtractor, DocumentDate};
pub use document::{read_html_file, Encoding, PressRelease};
pub use error::PresstrendError;
pub use records::{WordCountRecord, WordCountTable};
pub use report::cluster_trend_table;
pub use stopwords::{load_stopwords, StopWords, StopWordsRequest};
pub use text::TextExtractor;

#[cfg(feature = "plot")]
pub use plot::cluster_trend_plot;

pub mod chart;
pub mod clean;
pub mod cluster;
pub mod color;
pub mod date;
pub mod document;
mod error;
#[cfg(feature = "plot")]
pub mod plot;
pub mod records;
pub mod report;
pub mod stopwords;
pub mod text;

/// Rexported to work with parsed documents.
pub use select;

/// The visible words of `html` without `stopwords`.
pub fn process_html(html: &str, stopwords: &StopWords) -> Vec<String> {
    TextExtractor::words(html, stopwords)
}

/// The date and year of the first `<time datetime="..">` node of `html`.
pub fn extract_date_from_html(html: &str) -> Result<(Option<String>, Option<i32>)> {
    let date = DateExtractor::extract(html)?;
    Ok((date.date, date.year))
}
