use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use log::{info, warn};
use serde::Serialize;
use structopt::StructOpt;
use url::Url;

use presstrend::report::DEFAULT_LABEL;
use presstrend::{
    cluster_trend_table, group_cluster_by_year, ClusterDefinition, Encoding, PressRelease,
    StopWords, StopWordsRequest, WordCountTable,
};

#[allow(missing_docs)]
#[derive(Debug, StructOpt)]
#[structopt(name = "presstrend", about = "Word trends over press release html files.")]
#[structopt(setting = structopt::clap::AppSettings::ColoredHelp)]
enum App {
    #[structopt(name = "stopwords", about = "Download and print the stop word list.")]
    Stopwords {
        #[structopt(flatten)]
        source: StopWordsOpts,
    },
    #[structopt(name = "words", about = "Extract the words and date of html files as json.")]
    Words {
        #[structopt(name = "files", help = "The html files to read.", parse(from_os_str))]
        files: Vec<PathBuf>,
        #[structopt(flatten)]
        input: InputOpts,
        #[structopt(
            long = "output",
            short = "o",
            help = "The file to store the words as json.",
            parse(from_os_str)
        )]
        output: Option<PathBuf>,
    },
    #[structopt(name = "count", about = "Count the words of html files per publishing date.")]
    Count {
        #[structopt(name = "files", help = "The html files to read.", parse(from_os_str))]
        files: Vec<PathBuf>,
        #[structopt(flatten)]
        input: InputOpts,
        #[structopt(
            long = "output",
            short = "o",
            help = "The file to store the records as csv.",
            parse(from_os_str)
        )]
        output: Option<PathBuf>,
    },
    #[structopt(name = "table", about = "Print the yearly keyword counts of every cluster.")]
    Table {
        #[structopt(flatten)]
        trends: TrendOpts,
    },
    #[cfg(feature = "plot")]
    #[structopt(name = "plot", about = "Chart the yearly keyword counts of every cluster.")]
    Plot {
        #[structopt(flatten)]
        trends: TrendOpts,
    },
}

/// A release as written by `words`.
#[derive(Debug, Serialize)]
struct ReleaseWords {
    path: PathBuf,
    date: Option<String>,
    year: Option<i32>,
    words: Vec<String>,
}

impl From<PressRelease> for ReleaseWords {
    fn from(release: PressRelease) -> Self {
        Self {
            path: release.path.unwrap_or_default(),
            date: release.date.date,
            year: release.date.year,
            words: release.words,
        }
    }
}

impl App {
    fn run(self) -> anyhow::Result<()> {
        match self {
            App::Stopwords { source } => {
                let words = source.load()?;
                let stdout = io::stdout();
                let mut out = stdout.lock();
                for word in words.iter() {
                    writeln!(out, "{}", word)?;
                }
                Ok(())
            }
            App::Words {
                files,
                input,
                output,
            } => {
                let releases = input.releases(&files)?;
                let releases: Vec<ReleaseWords> =
                    releases.into_iter().map(ReleaseWords::from).collect();
                let json = serde_json::to_string_pretty(&releases)?;
                if let Some(out) = output {
                    fs::write(out, json)?;
                } else {
                    println!("{}", json);
                }
                Ok(())
            }
            App::Count {
                files,
                input,
                output,
            } => {
                let mut table = WordCountTable::new();
                for release in input.releases(&files)? {
                    match release.word_counts() {
                        Some(records) => table.extend(records),
                        None => warn!(
                            "Skipping {:?} without publishing date",
                            release.path.unwrap_or_default()
                        ),
                    }
                }
                info!("Counted {} records", table.len());
                if let Some(out) = output {
                    let f = fs::File::create(&out)
                        .with_context(|| format!("Failed to create {}", out.display()))?;
                    table.write_csv(f)
                } else {
                    table.write_csv(io::stdout())
                }
            }
            App::Table { trends } => {
                let grouped = trends.group()?;
                let stdout = io::stdout();
                cluster_trend_table(&mut stdout.lock(), &grouped, &trends.label)
            }
            #[cfg(feature = "plot")]
            App::Plot { trends } => {
                let grouped = trends.group()?;
                presstrend::cluster_trend_plot(&grouped, &trends.label)
            }
        }
    }
}

#[derive(Debug, Clone, StructOpt)]
pub struct StopWordsOpts {
    #[structopt(long = "stopwords-url", help = "Where to download the stop words from.")]
    url: Option<Url>,
    #[structopt(
        long = "stopwords-file",
        help = "Read the stop words from a local file instead.",
        parse(from_os_str),
        conflicts_with = "url"
    )]
    file: Option<PathBuf>,
    #[structopt(long = "header-lines", help = "Number of comment lines on top of the list.")]
    header_lines: Option<usize>,
    #[structopt(long = "timeout", help = "Request timeout in seconds, none by default.")]
    timeout: Option<u64>,
    #[structopt(long = "user-agent", help = "The user-agent used for requests.")]
    user_agent: Option<String>,
}

impl StopWordsOpts {
    fn load(&self) -> anyhow::Result<StopWords> {
        let header_lines = self
            .header_lines
            .unwrap_or(StopWordsRequest::DEFAULT_HEADER_LINES);
        if let Some(file) = &self.file {
            return StopWords::from_path(file, header_lines);
        }

        let mut request = match &self.url {
            Some(url) => StopWordsRequest::new(url.clone())?,
            None => StopWordsRequest::default(),
        };
        request = request.header_lines(header_lines);
        if let Some(timeout) = self.timeout {
            request = request.timeout(Duration::from_secs(timeout));
        }
        if let Some(user_agent) = self.user_agent.clone() {
            request = request.browser_user_agent(user_agent);
        }
        request.get()
    }
}

#[derive(Debug, Clone, StructOpt)]
pub struct InputOpts {
    #[structopt(
        long = "encoding",
        help = "Encoding of the html files.",
        default_value = "utf-8"
    )]
    encoding: Encoding,
    #[structopt(flatten)]
    stopwords: StopWordsOpts,
}

impl InputOpts {
    fn releases(&self, files: &[PathBuf]) -> anyhow::Result<Vec<PressRelease>> {
        let stopwords = self.stopwords.load()?;
        files
            .iter()
            .map(|path| {
                info!("Reading {}", path.display());
                PressRelease::from_path(path, self.encoding, &stopwords)
            })
            .collect()
    }
}

#[derive(Debug, Clone, StructOpt)]
pub struct TrendOpts {
    #[structopt(name = "records", help = "Csv file with word,date,count columns.", parse(from_os_str))]
    records: PathBuf,
    #[structopt(name = "clusters", help = "Json object of cluster names to keywords.", parse(from_os_str))]
    clusters: PathBuf,
    #[structopt(long = "label", help = "Label of the clusters.", default_value = DEFAULT_LABEL)]
    label: String,
}

impl TrendOpts {
    fn group(&self) -> anyhow::Result<presstrend::ClusterTrends> {
        let records = WordCountTable::from_path(&self.records)?;
        let clusters = ClusterDefinition::from_path(&self.clusters)?;
        Ok(group_cluster_by_year(&records, &clusters))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    Ok(App::from_args().run()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_label() {
        let opts = TrendOpts::from_iter_safe(vec!["table", "records.csv", "clusters.json"]).unwrap();
        assert_eq!(opts.label, DEFAULT_LABEL);

        let opts = TrendOpts::from_iter_safe(vec![
            "table",
            "records.csv",
            "clusters.json",
            "--label",
            "Thema",
        ])
        .unwrap();
        assert_eq!(opts.label, "Thema");
    }
}
