use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use select::document::Document;
use select::predicate::Name;

use crate::error::PresstrendError;

lazy_static! {
    /// The shape a sliced `datetime` value is expected to have.
    pub(crate) static ref RE_ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    /// Values starting with a numeric day are parsed strictly.
    pub(crate) static ref RE_ISO_DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap();
}

/// Length of the `YYYY-MM-DD` prefix of a machine readable date.
pub const DATE_LEN: usize = 10;

/// When a document was published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDate {
    /// The first ten characters of the `datetime` attribute.
    pub date: Option<String>,
    /// The year in front of the first `-` of [`DocumentDate::date`].
    pub year: Option<i32>,
}

impl DocumentDate {
    /// The date as day, if it parses.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date_like)
    }
}

pub struct DateExtractor;

impl DateExtractor {
    /// Parse `html` and extract the date of its first `<time>` node.
    pub fn extract(html: &str) -> Result<DocumentDate, PresstrendError> {
        DateExtractor::extract_from_doc(&Document::from(html))
    }

    /// Extract the date of the first `<time>` node. If that node has no
    /// `datetime` attribute the document counts as undated.
    ///
    /// The value is cut to [`DATE_LEN`] characters. Anything before the first
    /// `-` must be a year, otherwise [`PresstrendError::InvalidYear`] is
    /// returned.
    pub fn extract_from_doc(doc: &Document) -> Result<DocumentDate, PresstrendError> {
        let datetime = match doc
            .find(Name("time"))
            .next()
            .and_then(|n| n.attr("datetime"))
        {
            Some(datetime) => datetime,
            None => return Ok(DocumentDate::default()),
        };

        let date: String = datetime.chars().take(DATE_LEN).collect();
        if !RE_ISO_DATE.is_match(&date) {
            debug!("Unexpected date format `{}`", datetime);
        }

        let year = date
            .split('-')
            .next()
            .map(str::trim)
            .and_then(|year| year.parse::<i32>().ok())
            .ok_or_else(|| PresstrendError::InvalidYear { date: date.clone() })?;

        Ok(DocumentDate {
            date: Some(date),
            year: Some(year),
        })
    }
}

/// Parse a date like value.
///
/// A value that starts with `YYYY-MM-DD` must be a valid day. Anything else
/// goes through `dtparse`, missing fields are taken from January 1st 1970.
pub fn parse_date_like(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if RE_ISO_DATE_PREFIX.is_match(s) {
        return NaiveDate::parse_from_str(&s[..DATE_LEN], "%Y-%m-%d").ok();
    }
    fuzzy_dtparse(s).map(|dt| dt.date())
}

fn fuzzy_dtparse(s: &str) -> Option<NaiveDateTime> {
    let default = NaiveDate::from_ymd_opt(1970, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let parser = dtparse::Parser::default();
    parser
        .parse(
            s,
            None,
            None,
            false,
            false,
            Some(&default),
            false,
            &HashMap::new(),
        )
        .map(|(date, _, _)| date)
        .ok()
}
