use std::fs;
use std::io::{Read, Write};
use std::ops::Deref;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// How often a word occurred in the documents of a day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordCountRecord {
    pub word: String,
    #[serde(with = "record_date")]
    pub date: NaiveDate,
    pub count: u64,
}

impl WordCountRecord {
    pub fn new<T: ToString>(word: T, date: NaiveDate, count: u64) -> Self {
        Self {
            word: word.to_string(),
            date,
            count,
        }
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// One record per distinct word, in order of first appearance.
    pub fn count_words<T: AsRef<str>>(words: &[T], date: NaiveDate) -> Vec<WordCountRecord> {
        let mut positions: FnvHashMap<&str, usize> = FnvHashMap::default();
        let mut records: Vec<WordCountRecord> = Vec::new();
        for word in words.iter().map(AsRef::as_ref) {
            match positions.get(word) {
                Some(&idx) => records[idx].count += 1,
                None => {
                    positions.insert(word, records.len());
                    records.push(WordCountRecord::new(word, date, 1));
                }
            }
        }
        records
    }
}

/// An ordered table of [`WordCountRecord`]s with the columns
/// `word,date,count`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCountTable {
    records: Vec<WordCountRecord>,
}

impl Deref for WordCountTable {
    type Target = [WordCountRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl WordCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the records from csv with a `word,date,count` header.
    ///
    /// Additional columns are ignored, a missing one is an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        csv::Reader::from_reader(reader)
            .deserialize()
            .enumerate()
            .map(|(idx, record)| record.with_context(|| format!("Invalid record in row {}", idx + 1)))
            .collect()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = fs::File::open(path)
            .with_context(|| format!("Failed to open records at {}", path.display()))?;
        WordCountTable::from_reader(f)
            .with_context(|| format!("Failed to read records from {}", path.display()))
    }

    /// Write all records as csv including the header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn push(&mut self, record: WordCountRecord) {
        self.records.push(record)
    }

    /// Count the `words` of a document published at `date`.
    pub fn push_document<T: AsRef<str>>(&mut self, date: NaiveDate, words: &[T]) {
        self.records
            .extend(WordCountRecord::count_words(words, date))
    }

    pub fn records(&self) -> &[WordCountRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<WordCountRecord> {
        self.records
    }
}

impl FromIterator<WordCountRecord> for WordCountTable {
    fn from_iter<I: IntoIterator<Item = WordCountRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<WordCountRecord> for WordCountTable {
    fn extend<I: IntoIterator<Item = WordCountRecord>>(&mut self, iter: I) {
        self.records.extend(iter)
    }
}

mod record_date {
    use chrono::NaiveDate;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::date::parse_date_like;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_date_like(&s).ok_or_else(|| D::Error::custom(format!("invalid date `{}`", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn count_in_first_appearance_order() {
        let words = ["zug", "bahn", "zug", "bus", "zug"];
        let records = WordCountRecord::count_words(&words, day(2022, 1, 1));
        let counts: Vec<_> = records.iter().map(|r| (r.word.as_str(), r.count)).collect();
        assert_eq!(counts, vec![("zug", 3), ("bahn", 1), ("bus", 1)]);
        assert!(records.iter().all(|r| r.year() == 2022));
    }

    #[test]
    fn read_csv() {
        let csv = "word,date,count,source\n\
                   bahn,2022-01-01,5,a.html\n\
                   bahn,2022-06-01T12:00:00,3,b.html\n";
        let table = WordCountTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            table.records(),
            &[
                WordCountRecord::new("bahn", day(2022, 1, 1), 5),
                WordCountRecord::new("bahn", day(2022, 6, 1), 3),
            ]
        );
    }

    #[test]
    fn missing_column() {
        let csv = "word,count\nbahn,5\n";
        assert!(WordCountTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn invalid_date() {
        let csv = "word,date,count\nbahn,irgendwann,5\n";
        assert!(WordCountTable::from_reader(csv.as_bytes()).is_err());
        let csv = "word,date,count\nbahn,2021-02-30,5\n";
        assert!(WordCountTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn year_only_date() {
        let csv = "word,date,count\nbahn,2021,5\n";
        let table = WordCountTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table[0].date, day(2021, 1, 1));
    }

    #[test]
    fn write_csv() {
        let mut table = WordCountTable::new();
        table.push_document(day(2023, 1, 1), &["zug", "zug"]);
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "word,date,count\nzug,2023-01-01,2\n"
        );
    }

    #[test]
    fn write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let table: WordCountTable = vec![WordCountRecord::new("tram", day(2021, 5, 3), 7)]
            .into_iter()
            .collect();
        table.write_csv(fs::File::create(&path).unwrap()).unwrap();
        assert_eq!(WordCountTable::from_path(&path).unwrap(), table);
    }
}
