use std::fmt;
use std::io::Write;

use anyhow::Result;

use crate::cluster::{ClusterTrends, TrendTable};

/// Label used in headers and chart titles if none is given.
pub const DEFAULT_LABEL: &str = "Cluster";

/// Print every cluster's table below a header line, in cluster order.
pub fn cluster_trend_table<W: Write>(out: &mut W, trends: &ClusterTrends, label: &str) -> Result<()> {
    for (name, table) in trends.iter() {
        writeln!(out)?;
        writeln!(out, "{} - keyword trend in cluster: {}", label, name)?;
        writeln!(out, "{}", table)?;
    }
    Ok(())
}

impl fmt::Display for TrendTable {
    /// Renders the table with right aligned columns:
    ///
    /// ```text
    /// word  bahn  zug
    /// year
    /// 2022     8    0
    /// 2023     0    2
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Empty table\nColumns: []\nIndex: []");
        }

        let years: Vec<String> = self.years().iter().map(ToString::to_string).collect();
        let index_width = years.iter().map(String::len).chain(Some(4)).max().unwrap_or(4);

        let widths: Vec<usize> = self
            .words()
            .iter()
            .enumerate()
            .map(|(col, word)| {
                self.years()
                    .iter()
                    .filter_map(|year| self.row(*year))
                    .map(|row| row[col].to_string().len())
                    .chain(Some(word.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<width$}", "word", width = index_width)?;
        for (word, width) in self.words().iter().zip(&widths) {
            write!(f, "  {:>width$}", word, width = width)?;
        }
        write!(f, "\n{:<width$}", "year", width = index_width)?;

        for (year, label) in self.years().iter().zip(&years) {
            write!(f, "\n{:<width$}", label, width = index_width)?;
            if let Some(row) = self.row(*year) {
                for (count, width) in row.iter().zip(&widths) {
                    write!(f, "  {:>width$}", count, width = width)?;
                }
            }
        }
        Ok(())
    }
}
