use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fnv::FnvHashSet;
use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::records::WordCountRecord;

/// Named groups of keywords, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterDefinition {
    clusters: Vec<(String, Vec<String>)>,
}

impl ClusterDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cluster. A cluster with the same name keeps its position but
    /// gets the new keywords.
    pub fn insert<K, I, T>(&mut self, name: K, keywords: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let name = name.into();
        let keywords = keywords.into_iter().map(Into::into).collect();
        match self.clusters.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = keywords,
            None => self.clusters.push((name, keywords)),
        }
    }

    /// The keywords of the cluster `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.clusters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, keywords)| keywords.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.clusters
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Read clusters from a json object of keyword arrays. The order of
    /// the keys is kept.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read clusters from {}", path.display()))?;
        ClusterDefinition::from_json_str(&json)
            .with_context(|| format!("Invalid clusters in {}", path.display()))
    }
}

impl<K, V, T> FromIterator<(K, V)> for ClusterDefinition
where
    K: Into<String>,
    V: IntoIterator<Item = T>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut clusters = ClusterDefinition::new();
        for (name, keywords) in iter {
            clusters.insert(name, keywords);
        }
        clusters
    }
}

impl<'de> Deserialize<'de> for ClusterDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClusterVisitor;

        impl<'de> Visitor<'de> for ClusterVisitor {
            type Value = ClusterDefinition;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of cluster names to keyword lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut clusters = ClusterDefinition::new();
                while let Some((name, keywords)) = map.next_entry::<String, Vec<String>>()? {
                    clusters.insert(name, keywords);
                }
                Ok(clusters)
            }
        }

        deserializer.deserialize_map(ClusterVisitor)
    }
}

/// Summed word counts of one cluster, years as rows and words as columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendTable {
    years: Vec<i32>,
    words: Vec<String>,
    /// Row major, `counts[row][column]`.
    counts: Vec<Vec<u64>>,
}

impl TrendTable {
    /// Ascending years, one per row.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Ascending words, one per column.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// The count of `word` in `year`, `None` if neither is part of the
    /// table.
    pub fn get(&self, year: i32, word: &str) -> Option<u64> {
        let row = self.years.binary_search(&year).ok()?;
        let col = self.column_index(word)?;
        Some(self.counts[row][col])
    }

    /// The counts of a single year.
    pub fn row(&self, year: i32) -> Option<&[u64]> {
        let row = self.years.binary_search(&year).ok()?;
        Some(&self.counts[row])
    }

    /// `(year, count)` pairs of `word` for every year of the table.
    pub fn column(&self, word: &str) -> Option<Vec<(i32, u64)>> {
        let col = self.column_index(word)?;
        Some(
            self.years
                .iter()
                .zip(&self.counts)
                .map(|(year, row)| (*year, row[col]))
                .collect(),
        )
    }

    fn column_index(&self, word: &str) -> Option<usize> {
        self.words.binary_search_by(|w| w.as_str().cmp(word)).ok()
    }

    fn from_sums(sums: BTreeMap<(i32, &str), u64>) -> Self {
        let years: Vec<i32> = sums
            .keys()
            .map(|(year, _)| *year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let words: Vec<&str> = sums
            .keys()
            .map(|(_, word)| *word)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0; words.len()]; years.len()];
        for ((year, word), count) in sums {
            // both keys are taken from `sums` itself
            if let (Ok(row), Ok(col)) = (years.binary_search(&year), words.binary_search(&word)) {
                counts[row][col] = count;
            }
        }

        Self {
            years,
            words: words.into_iter().map(str::to_string).collect(),
            counts,
        }
    }
}

/// A [`TrendTable`] for every cluster, in the order of the definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterTrends {
    tables: Vec<(String, TrendTable)>,
}

impl ClusterTrends {
    pub fn get(&self, name: &str) -> Option<&TrendTable> {
        self.tables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TrendTable)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for ClusterTrends {
    type Item = (String, TrendTable);
    type IntoIter = std::vec::IntoIter<(String, TrendTable)>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

/// Sum the counts of each cluster's keywords per year.
///
/// Records of words that are no keyword of a cluster are ignored for that
/// cluster. Years and words only show up if the cluster has at least one
/// record for them, absent combinations count 0.
pub fn group_cluster_by_year(
    records: &[WordCountRecord],
    clusters: &ClusterDefinition,
) -> ClusterTrends {
    let tables = clusters
        .iter()
        .map(|(name, keywords)| {
            let keywords: FnvHashSet<&str> = keywords.iter().map(String::as_str).collect();
            let mut sums: BTreeMap<(i32, &str), u64> = BTreeMap::new();
            for record in records
                .iter()
                .filter(|record| keywords.contains(record.word.as_str()))
            {
                *sums.entry((record.year(), record.word.as_str())).or_insert(0) += record.count;
            }
            debug!("Cluster {}: {} year/word pairs", name, sums.len());
            (name.to_string(), TrendTable::from_sums(sums))
        })
        .collect();

    ClusterTrends { tables }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(word: &str, date: &str, count: u64) -> WordCountRecord {
        WordCountRecord::new(
            word,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            count,
        )
    }

    fn records() -> Vec<WordCountRecord> {
        vec![
            record("bahn", "2022-01-01", 5),
            record("bahn", "2022-06-01", 3),
            record("zug", "2023-01-01", 2),
        ]
    }

    #[test]
    fn groups_by_year_and_word() {
        let clusters: ClusterDefinition = vec![("Verkehr", vec!["bahn", "zug"])]
            .into_iter()
            .collect();
        let trends = group_cluster_by_year(&records(), &clusters);
        let table = trends.get("Verkehr").unwrap();

        assert_eq!(table.years(), &[2022, 2023]);
        assert_eq!(table.words(), &["bahn", "zug"]);
        assert_eq!(table.row(2022), Some(&[8, 0][..]));
        assert_eq!(table.row(2023), Some(&[0, 2][..]));
        assert_eq!(table.get(2022, "bahn"), Some(8));
        assert_eq!(table.get(2023, "zug"), Some(2));
        assert_eq!(table.get(2024, "zug"), None);
        assert_eq!(table.column("zug"), Some(vec![(2022, 0), (2023, 2)]));
    }

    #[test]
    fn cluster_without_matches_is_empty() {
        let mut clusters = ClusterDefinition::new();
        clusters.insert("Verkehr", vec!["bahn"]);
        clusters.insert("Wetter", vec!["regen", "sonne"]);
        let trends = group_cluster_by_year(&records(), &clusters);

        let table = trends.get("Wetter").unwrap();
        assert!(table.is_empty());
        assert!(table.words().is_empty());
        assert_eq!(table, &TrendTable::default());
        assert_eq!(trends.get("Verkehr").unwrap().words(), &["bahn"]);
    }

    #[test]
    fn only_present_years_and_words() {
        let records = vec![
            record("zug", "2019-03-01", 1),
            record("bahn", "2021-03-01", 1),
            record("tram", "2021-04-01", 4),
        ];
        let clusters: ClusterDefinition = vec![("Schiene", vec!["zug", "bahn", "s-bahn", "zug"])]
            .into_iter()
            .collect();
        let trends = group_cluster_by_year(&records, &clusters);
        let table = trends.get("Schiene").unwrap();
        assert_eq!(table.years(), &[2019, 2021]);
        assert_eq!(table.words(), &["bahn", "zug"]);
    }

    #[test]
    fn grouping_is_idempotent() {
        let clusters: ClusterDefinition = vec![
            ("Verkehr", vec!["bahn", "zug"]),
            ("Bahn", vec!["bahn"]),
        ]
        .into_iter()
        .collect();
        let mut shuffled = records();
        shuffled.reverse();

        let first = group_cluster_by_year(&records(), &clusters);
        assert_eq!(first, group_cluster_by_year(&records(), &clusters));
        assert_eq!(first, group_cluster_by_year(&shuffled, &clusters));
    }

    #[test]
    fn keeps_cluster_order() {
        let clusters = ClusterDefinition::from_json_str(
            r#"{"Zeta": ["zug"], "Alpha": ["bahn"], "Mitte": []}"#,
        )
        .unwrap();
        let names: Vec<_> = group_cluster_by_year(&records(), &clusters)
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mitte"]);
    }

    #[test]
    fn insert_replaces_keywords() {
        let mut clusters = ClusterDefinition::new();
        clusters.insert("A", vec!["x"]);
        clusters.insert("B", vec!["y"]);
        clusters.insert("A", vec!["z"]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.get("A"), Some(&["z".to_string()][..]));
        assert_eq!(clusters.iter().next().map(|(name, _)| name), Some("A"));
    }

    #[test]
    fn invalid_json() {
        assert!(ClusterDefinition::from_json_str(r#"["bahn"]"#).is_err());
        assert!(ClusterDefinition::from_json_str(r#"{"A": "bahn"}"#).is_err());
    }
}
