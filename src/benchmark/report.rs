use super::{golden::read_records, Benchmarker, ScoreCard};
use crate::error::Result;
use crate::image::io::ensure_parent_dir;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// One search to score: the query item and its ordered results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub query: String,
    pub results: Vec<String>,
}

impl SearchRecord {
    pub fn new<S: Into<String>>(
        query: impl Into<String>,
        results: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            query: query.into(),
            results: results.into_iter().map(Into::into).collect(),
        }
    }
}

/// Rows of `query,result1,result2,...`.
pub fn read_search_results<R: Read>(reader: R) -> Result<Vec<SearchRecord>> {
    Ok(read_records(reader)?
        .into_iter()
        .filter_map(|fields| {
            let mut it = fields.into_iter();
            let query = it.next()?;
            Some(SearchRecord {
                query,
                results: it.filter(|f| !f.is_empty()).collect(),
            })
        })
        .collect())
}

pub fn load_search_results(path: impl AsRef<Path>) -> Result<Vec<SearchRecord>> {
    read_search_results(std::fs::File::open(path)?)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: String,
    pub count: usize,
    pub median: f64,
    pub average: f64,
}

/// A search that could not be scored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFailure {
    pub index: usize,
    pub query: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub metrics: Vec<MetricSummary>,
    pub failures: Vec<ScoreFailure>,
}

impl SummaryReport {
    pub fn metric(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary Statistics")?;
        for m in &self.metrics {
            writeln!(f, "{}", m.name)?;
            writeln!(f, "  Number of values summarized = {}", m.count)?;
            writeln!(f, "  Median  = {}", m.median)?;
            writeln!(f, "  Average = {}", m.average)?;
        }
        if !self.failures.is_empty() {
            writeln!(f, "Unscored searches = {}", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  #{} {}: {}", failure.index, failure.query, failure.message)?;
            }
        }
        Ok(())
    }
}

/// Count, median and average of every metric over `searches`.
///
/// Searches naming unknown items are collected as failures and do not abort
/// the batch.
pub fn summarize(bench: &Benchmarker, searches: &[SearchRecord]) -> SummaryReport {
    let scored = score_all(bench, searches);
    let mut cards: Vec<ScoreCard> = Vec::with_capacity(scored.len());
    let mut failures = Vec::new();
    for (index, (search, outcome)) in searches.iter().zip(scored).enumerate() {
        match outcome {
            Ok(card) => cards.push(card),
            Err(err) => {
                warn!("summarize: search #{index} for {} not scored: {err}", search.query);
                failures.push(ScoreFailure {
                    index,
                    query: search.query.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    let metrics = if cards.is_empty() {
        Vec::new()
    } else {
        ScoreCard::METRICS
            .iter()
            .enumerate()
            .map(|(k, name)| {
                let values: Vec<f64> = cards.iter().map(|c| c.entries()[k].1).collect();
                MetricSummary {
                    name: name.to_string(),
                    count: values.len(),
                    median: median(&values),
                    average: values.iter().sum::<f64>() / values.len() as f64,
                }
            })
            .collect()
    };
    SummaryReport { metrics, failures }
}

/// Writes an HTML page showing, per search, the query image, the result
/// images and the curated definitely-similar images. Images are expected at
/// `{image_dir}/{name}.png`.
pub fn write_html_report(
    bench: &Benchmarker,
    searches: &[SearchRecord],
    image_dir: &Path,
    out: &Path,
) -> Result<()> {
    let image_dir = absolute(image_dir)?;
    let img = |name: &str| {
        let path = image_dir.join(format!("{name}.png"));
        format!("<img src=\"file://{}\">", path.display())
    };

    let mut html =
        String::from("<!DOCTYPE html>\n<html>\n<head>\n<title>Search Report</title>\n</head>\n<body>\n");
    for (i, search) in searches.iter().enumerate() {
        html.push_str(&format!("<h1>Search {i}</h1>\n<p>Searched for:</p>\n"));
        html.push_str(&img(&search.query));
        html.push_str("<p>Results:</p>\n");
        for name in &search.results {
            html.push_str(&img(name));
        }
        html.push('\n');
        html.push_str("<p>Items a human said are <em>definitely similar</em> (if any):</p>\n");
        for name in bench.definitely_similar(&search.query).unwrap_or_default() {
            html.push_str(&img(name));
        }
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");

    ensure_parent_dir(out)?;
    let mut file = std::fs::File::create(out)?;
    file.write_all(html.as_bytes())?;
    Ok(())
}

#[cfg(feature = "parallel")]
fn score_all(bench: &Benchmarker, searches: &[SearchRecord]) -> Vec<Result<ScoreCard>> {
    use rayon::prelude::*;
    searches
        .par_iter()
        .map(|s| bench.every_score(&s.query, s.results.as_slice()))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_all(bench: &Benchmarker, searches: &[SearchRecord]) -> Vec<Result<ScoreCard>> {
    searches
        .iter()
        .map(|s| bench.every_score(&s.query, s.results.as_slice()))
        .collect()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    match n {
        0 => f64::NAN,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => 0.5 * (sorted[n / 2 - 1] + sorted[n / 2]),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::GoldenTable;

    fn bench() -> Benchmarker {
        let table = GoldenTable::from_reader("a,b,0,c,1\nb,a,0,1\nc,0,1\n".as_bytes()).unwrap();
        Benchmarker::new(&table, None).unwrap()
    }

    #[test]
    fn summary_collects_unknown_items_without_aborting() {
        let searches = vec![
            SearchRecord::new("a", ["a", "b"]),
            SearchRecord::new("b", ["c", "b"]),
            SearchRecord::new("a", ["ghost"]),
        ];
        let report = summarize(&bench(), &searches);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 2);
        let first = report.metric("first_result").unwrap();
        assert_eq!(first.count, 2);
        assert_eq!(first.median, 0.5);
        assert_eq!(first.average, 0.5);
        let text = report.to_string();
        assert!(text.starts_with("Summary Statistics\n"));
        assert!(text.contains("  Number of values summarized = 2"));
    }

    #[test]
    fn search_results_csv_drops_blank_cells() {
        let records = read_search_results("a,b,c\nb,,a\n".as_bytes()).unwrap();
        assert_eq!(records[0], SearchRecord::new("a", ["b", "c"]));
        assert_eq!(records[1].results, vec!["a"]);
    }

    #[test]
    fn html_report_links_absolute_png_paths() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report").join("search.html");
        let searches = vec![SearchRecord::new("a", ["c"])];
        write_html_report(&bench(), &searches, dir.path(), &out).unwrap();
        let html = std::fs::read_to_string(&out).unwrap();
        let expected = format!("file://{}", dir.path().join("b.png").display());
        assert!(html.contains(&expected));
        assert!(html.contains("<h1>Search 0</h1>"));
        assert_eq!(html.matches("</html>").count(), 1);
    }
}
