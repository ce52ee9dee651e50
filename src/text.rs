use select::document::Document;

use crate::clean::{DefaultDocumentCleaner, DocumentCleaner};
use crate::stopwords::StopWords;

/// Turns the visible text of a document into words.
pub struct TextExtractor;

impl TextExtractor {
    /// Words with this many characters or fewer are dropped.
    pub const MAX_DROPPED_WORD_LEN: usize = 1;

    /// Parse `html` and return its visible words.
    ///
    /// Parsing never fails, broken markup yields whatever text could be
    /// recovered.
    pub fn words(html: &str, stopwords: &StopWords) -> Vec<String> {
        TextExtractor::words_from_doc(&Document::from(html), stopwords)
    }

    /// All visible words of `doc` in reading order, lowercased and without
    /// stop words.
    ///
    /// Text nodes are joined by a single space and the result is split on
    /// single spaces, so punctuation stays attached to its word and
    /// repeated words are kept.
    pub fn words_from_doc(doc: &Document, stopwords: &StopWords) -> Vec<String> {
        TextExtractor::words_from_text(&DefaultDocumentCleaner::visible_text(doc, " "), stopwords)
    }

    /// Split already extracted `text` into words.
    pub fn words_from_text(text: &str, stopwords: &StopWords) -> Vec<String> {
        text.to_lowercase()
            .replace('\n', " ")
            .split(' ')
            .filter(|word| word.chars().count() > TextExtractor::MAX_DROPPED_WORD_LEN)
            .filter(|word| !stopwords.contains(word))
            .map(str::to_string)
            .collect()
    }
}
