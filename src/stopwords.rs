use std::fs;
use std::io::Read;
use std::ops::Deref;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use fnv::FnvHashSet;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, USER_AGENT};
use url::Url;

use crate::error::PresstrendError;

/// An ordered list of stop words.
///
/// The list keeps the order and duplicates of its source, lookups go through
/// a hash index.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: Vec<String>,
    index: FnvHashSet<String>,
}

impl Deref for StopWords {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}

impl StopWords {
    /// Convenience method for creating a new [`StopWordsRequest`] for the
    /// default source.
    pub fn request() -> StopWordsRequest {
        StopWordsRequest::default()
    }

    /// Split `text` into lines and drop the first `header_lines`.
    ///
    /// Lines are split on `'\n'` only and are not trimmed.
    pub fn from_text(text: &str, header_lines: usize) -> Self {
        text.split('\n').skip(header_lines).collect()
    }

    /// Read the stop words from a local file with the same layout as the
    /// remote list.
    pub fn from_path<P: AsRef<Path>>(path: P, header_lines: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut f = fs::File::open(path)
            .with_context(|| format!("Failed to open stop words at {}", path.display()))?;
        let mut text = String::new();
        f.read_to_string(&mut text)
            .with_context(|| format!("Failed to read stop words at {}", path.display()))?;
        Ok(Self::from_text(&text, header_lines))
    }

    /// Whether `word` is one of the stop words.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Consumes the list and returns the words in source order.
    pub fn into_inner(self) -> Vec<String> {
        self.words
    }
}

impl<T: Into<String>> FromIterator<T> for StopWords {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let words: Vec<String> = iter.into_iter().map(Into::into).collect();
        let index = words.iter().cloned().collect();
        Self { words, index }
    }
}

/// Download the stop word list from `url`, or from
/// [`StopWordsRequest::DEFAULT_URL`] if `None`.
pub fn load_stopwords(url: Option<Url>) -> Result<StopWords> {
    let request = match url {
        Some(url) => StopWordsRequest::new(url)?,
        None => StopWordsRequest::default(),
    };
    request.get()
}

/// Request for a remote stop word list.
#[derive(Debug, Clone)]
pub struct StopWordsRequest {
    url: Url,
    header_lines: Option<usize>,
    timeout: Option<Duration>,
    http_success_only: Option<bool>,
    browser_user_agent: Option<String>,
}

impl StopWordsRequest {
    /// German stop words, one per line after a comment header.
    pub const DEFAULT_URL: &'static str =
        "https://raw.githubusercontent.com/solariz/german_stopwords/master/german_stopwords_full.txt";

    /// Number of comment lines on top of the default list.
    pub const DEFAULT_HEADER_LINES: usize = 9;

    /// Default user agent for `presstrend`.
    #[inline]
    pub(crate) fn user_agent() -> String {
        format!("presstrend/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn new<T: AsRef<str>>(url: T) -> Result<Self> {
        let url = Url::parse(url.as_ref())
            .with_context(|| format!("Invalid stop words url `{}`", url.as_ref()))?;

        Ok(Self {
            url,
            header_lines: None,
            timeout: None,
            http_success_only: None,
            browser_user_agent: None,
        })
    }

    /// The source of the list.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of leading lines that are skipped.
    pub fn header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = Some(header_lines);
        self
    }

    /// Without a timeout the request blocks until the server answers.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    pub fn http_success_only(mut self, http_success_only: bool) -> Self {
        self.http_success_only = Some(http_success_only);
        self
    }

    pub fn browser_user_agent<T: ToString>(mut self, browser_user_agent: T) -> Self {
        self.browser_user_agent = Some(browser_user_agent.to_string());
        self
    }

    /// Fetch the list. Every call performs a new request.
    pub fn get(self) -> Result<StopWords> {
        let mut headers = HeaderMap::with_capacity(1);

        headers.insert(
            USER_AGENT,
            self.browser_user_agent
                .map(|x| x.parse())
                .unwrap_or_else(|| Self::user_agent().parse())
                .context("Failed to parse user agent header.")?,
        );

        debug!("Requesting stop words from {}", self.url);

        let resp = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?
            .get(self.url.clone())
            .send()
            .map_err(|error| PresstrendError::HttpRequestFailure { error })
            .with_context(|| format!("Failed to request stop words from {}", self.url))?;

        let http_success_only = self.http_success_only.unwrap_or(true);
        if http_success_only && !resp.status().is_success() {
            return Err(PresstrendError::NoHttpSuccessResponse {
                status: resp.status(),
                url: resp.url().clone(),
            }
            .into());
        }

        let text = resp
            .text()
            .with_context(|| format!("Failed to read stop words from {} as text", self.url))?;

        let words = StopWords::from_text(
            &text,
            self.header_lines.unwrap_or(Self::DEFAULT_HEADER_LINES),
        );
        info!("Loaded {} stop words from {}", words.len(), self.url);
        Ok(words)
    }
}

impl Default for StopWordsRequest {
    fn default() -> Self {
        Self {
            url: Url::parse(Self::DEFAULT_URL).expect("default stop word url is valid"),
            header_lines: None,
            timeout: None,
            http_success_only: None,
            browser_user_agent: None,
        }
    }
}
