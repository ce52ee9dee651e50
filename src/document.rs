use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use select::document::Document;

use crate::date::{DateExtractor, DocumentDate};
use crate::error::PresstrendError;
use crate::records::WordCountRecord;
use crate::stopwords::StopWords;
use crate::text::TextExtractor;

/// Character encodings supported for local html files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
}

impl Encoding {
    /// Decode the raw bytes of the file at `path`.
    pub fn decode(&self, path: &Path, bytes: Vec<u8>) -> Result<String, PresstrendError> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes).map_err(|_| PresstrendError::Decode {
                path: path.to_path_buf(),
                encoding: *self,
            }),
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Latin1 => "latin-1",
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Utf8
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Encoding {
    type Err = PresstrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Encoding::Latin1),
            _ => Err(PresstrendError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Read the complete html file at `path` as text.
///
/// Line endings are normalized to `\n`.
pub fn read_html_file<P: AsRef<Path>>(path: P, encoding: Encoding) -> Result<String> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .with_context(|| format!("Failed to read html file {}", path.display()))?;

    let text = encoding.decode(path, bytes)?;
    if text.contains('\r') {
        Ok(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Ok(text)
    }
}

/// A single press release with its words and publishing date.
#[derive(Debug, Clone)]
pub struct PressRelease {
    /// Where the release was read from.
    pub path: Option<PathBuf>,
    /// When the release was published.
    pub date: DocumentDate,
    /// The visible words without stop words.
    pub words: Vec<String>,
}

impl PressRelease {
    /// Read and analyze the html file at `path`.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        encoding: Encoding,
        stopwords: &StopWords,
    ) -> Result<Self> {
        let path = path.as_ref();
        let html = read_html_file(path, encoding)?;
        let mut release = Self::from_html(&html, stopwords)
            .with_context(|| format!("Failed to analyze {}", path.display()))?;
        debug!(
            "{}: {} words, published {:?}",
            path.display(),
            release.words.len(),
            release.date.date
        );
        release.path = Some(path.to_path_buf());
        Ok(release)
    }

    /// Analyze the raw `html` of a release.
    pub fn from_html(html: &str, stopwords: &StopWords) -> Result<Self, PresstrendError> {
        let doc = Document::from(html);
        Ok(Self {
            path: None,
            date: DateExtractor::extract_from_doc(&doc)?,
            words: TextExtractor::words_from_doc(&doc, stopwords),
        })
    }

    /// The publishing day, if the release has a parseable date.
    pub fn published(&self) -> Option<NaiveDate> {
        self.date.naive_date()
    }

    /// Count the words of the release, `None` if it has no usable date.
    pub fn word_counts(&self) -> Option<Vec<WordCountRecord>> {
        self.published()
            .map(|date| WordCountRecord::count_words(&self.words, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_html_file(dir.path().join("missing.html"), Encoding::Utf8).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.html");
        fs::write(&path, "<p>Zeile eins\r\nZeile zwei</p>\n").unwrap();
        let html = read_html_file(&path, Encoding::default()).unwrap();
        assert_eq!(html, "<p>Zeile eins\nZeile zwei</p>\n");
    }

    #[test]
    fn invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.html");
        fs::write(&path, b"<p>Stra\xdfe</p>").unwrap();

        let err = read_html_file(&path, Encoding::Utf8).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PresstrendError>(),
            Some(PresstrendError::Decode { .. })
        ));

        let html = read_html_file(&path, Encoding::Latin1).unwrap();
        assert_eq!(html, "<p>Straße</p>");
    }

    #[test]
    fn parse_encoding() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("iso-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("cp1252".parse::<Encoding>().is_err());
    }

    #[test]
    fn release_from_html() {
        let stopwords: StopWords = vec!["die"].into_iter().collect();
        let html = r#"<article><time datetime="2021-03-04">4. März</time>
            <p>Die Bahn kommt. Die Bahn fährt.</p></article>"#;
        let release = PressRelease::from_html(html, &stopwords).unwrap();
        assert_eq!(release.date.year, Some(2021));

        let counts = release.word_counts().unwrap();
        let bahn = counts.iter().find(|r| r.word == "bahn").unwrap();
        assert_eq!(bahn.count, 2);
        assert_eq!(bahn.date, NaiveDate::from_ymd_opt(2021, 3, 4).unwrap());
    }

    #[test]
    fn release_without_date_has_no_counts() {
        let release = PressRelease::from_html("<p>Bahn</p>", &StopWords::default()).unwrap();
        assert!(release.word_counts().is_none());
    }
}
