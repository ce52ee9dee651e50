use crate::cluster::TrendTable;
use crate::color::{word_color_map, Rgb};

/// Title of the x axis.
pub const X_AXIS_LABEL: &str = "Year";
/// Title of the y axis.
pub const Y_AXIS_LABEL: &str = "Word count";
/// Title of the legend.
pub const LEGEND_TITLE: &str = "word";

/// One line of a [`TrendChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub word: String,
    pub color: Rgb,
    /// `[year, count]` for every year of the table.
    pub points: Vec<[f64; 2]>,
}

/// Everything needed to draw the trend of a single cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub title: String,
    /// Caption shown above the legend.
    pub legend_title: String,
    /// The x axis has a tick at exactly these years.
    pub years: Vec<i32>,
    pub series: Vec<TrendSeries>,
}

impl TrendChart {
    pub fn from_table(label: &str, cluster: &str, table: &TrendTable) -> Self {
        let colors = word_color_map(table.words().iter().map(String::as_str));
        let series = table
            .words()
            .iter()
            .map(|word| TrendSeries {
                word: word.clone(),
                color: colors[word.as_str()],
                points: table
                    .column(word)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(year, count)| [f64::from(year), count as f64])
                    .collect(),
            })
            .collect();

        Self {
            title: format!("{}: {}", label, cluster),
            legend_title: LEGEND_TITLE.to_string(),
            years: table.years().to_vec(),
            series,
        }
    }

    /// Whether a tick belongs to `value` on the x axis.
    pub fn is_year_tick(&self, value: f64) -> bool {
        self.years.iter().any(|year| f64::from(*year) == value)
    }
}
