//! Scoring ranked search results against curated "golden" similarity judgments.
//!
//! A [`GoldenTable`] lists, per query item, the items a human judged
//! *definitely* and *maybe* similar. [`Benchmarker`] turns it into a
//! [`GoldenGraph`] (edge weight 1 for definitely, 2 for maybe) and scores any
//! `(query, results)` pair with precision/recall, a graph-distance similarity
//! score, a normalized inversion ("disorder") score and a first-result score.
//!
//! The benchmarker is immutable after construction and is safe to share
//! across threads.

pub mod golden;
pub mod graph;
pub mod inversions;
pub mod report;

pub use golden::{ApprovedNames, GoldenRow, GoldenTable};
pub use graph::GoldenGraph;
pub use report::{
    load_search_results, read_search_results, summarize, write_html_report, MetricSummary,
    ScoreFailure, SearchRecord, SummaryReport,
};

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Edge weight for "definitely similar".
pub const DEFINITELY_WEIGHT: u32 = 1;
/// Edge weight for "maybe similar"; also the per-item credit for the query itself.
pub const MAYBE_WEIGHT: u32 = 2;
/// Stand-in distance for unreachable items when bounding the similarity score.
pub const UNREACHABLE_SIMILARITY: u32 = 12_345_678;
/// Stand-in distance for unreachable items when ordering for the disorder score.
pub const UNREACHABLE_DISORDER: u32 = 10_000_000;

/// Which curated sets count as relevant for precision and recall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Version {
    /// Query plus definitely-similar items.
    V1,
    /// Query plus definitely- and maybe-similar items.
    V2,
}

/// Every score for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub precision1: f64,
    pub recall1: f64,
    pub precision2: f64,
    pub recall2: f64,
    pub similarity: f64,
    pub disorder: f64,
    pub first_result: f64,
}

impl ScoreCard {
    pub const METRICS: [&'static str; 7] = [
        "precision1",
        "recall1",
        "precision2",
        "recall2",
        "similarity",
        "disorder",
        "first_result",
    ];

    /// `(metric name, value)` pairs in [`ScoreCard::METRICS`] order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("precision1", self.precision1),
            ("recall1", self.recall1),
            ("precision2", self.precision2),
            ("recall2", self.recall2),
            ("similarity", self.similarity),
            ("disorder", self.disorder),
            ("first_result", self.first_result),
        ]
    }
}

#[derive(Clone, Debug)]
pub struct Benchmarker {
    items: Vec<String>,
    index: HashMap<String, usize>,
    definitely: Vec<Vec<String>>,
    maybe: Vec<Vec<String>>,
    graph: GoldenGraph,
}

impl Benchmarker {
    /// Validate `table` (against `approved` when given) and build the graph.
    ///
    /// A query listed twice keeps its last row. Every query is a node even
    /// when it has no curated neighbours.
    pub fn new(table: &GoldenTable, approved: Option<&ApprovedNames>) -> Result<Self> {
        let mut items: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut definitely: Vec<Vec<String>> = Vec::new();
        let mut maybe: Vec<Vec<String>> = Vec::new();
        for row in &table.rows {
            match index.get(&row.query) {
                Some(&i) => {
                    definitely[i] = row.definitely_similar.clone();
                    maybe[i] = row.maybe_similar.clone();
                }
                None => {
                    index.insert(row.query.clone(), items.len());
                    items.push(row.query.clone());
                    definitely.push(row.definitely_similar.clone());
                    maybe.push(row.maybe_similar.clone());
                }
            }
        }

        if let Some(approved) = approved {
            validate_approved(&items, &definitely, &maybe, approved)?;
        }

        let mut graph = GoldenGraph::new();
        for item in &items {
            graph.add_node(item);
        }
        for (i, item) in items.iter().enumerate() {
            for other in &definitely[i] {
                graph.add_edge(item, other, DEFINITELY_WEIGHT);
            }
            for other in &maybe[i] {
                graph.add_edge(item, other, MAYBE_WEIGHT);
            }
        }
        if graph.node_count() != items.len() {
            let stray: Vec<&str> = (items.len()..graph.node_count())
                .filter_map(|i| graph.node_name(i))
                .collect();
            return Err(Error::GoldenValidation(format!(
                "the similarity graph has {} nodes but there are {} query items; \
                 names never used as a query: {}",
                graph.node_count(),
                items.len(),
                stray.join(", ")
            )));
        }
        debug!(
            "Benchmarker: {} items, {} curated edges",
            items.len(),
            graph.edge_count()
        );

        Ok(Self {
            items,
            index,
            definitely,
            maybe,
            graph,
        })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn graph(&self) -> &GoldenGraph {
        &self.graph
    }

    pub fn definitely_similar(&self, query: &str) -> Option<&[String]> {
        self.index.get(query).map(|&i| self.definitely[i].as_slice())
    }

    pub fn maybe_similar(&self, query: &str) -> Option<&[String]> {
        self.index.get(query).map(|&i| self.maybe[i].as_slice())
    }

    /// Fails with [`Error::UnknownItem`] naming the first unknown name.
    pub fn check_item_names<S: AsRef<str>>(&self, query: &str, results: &[S]) -> Result<()> {
        std::iter::once(query)
            .chain(results.iter().map(AsRef::as_ref))
            .find(|name| !self.index.contains_key(*name))
            .map_or(Ok(()), |name| {
                Err(Error::UnknownItem {
                    name: name.to_string(),
                })
            })
    }

    /// `(precision, recall)` of `results` against the relevant set for `version`.
    pub fn precision_and_recall<S: AsRef<str>>(
        &self,
        query: &str,
        results: &[S],
        version: Version,
    ) -> Result<(f64, f64)> {
        self.check_item_names(query, results)?;
        let i = self.index[query];
        let mut relevant: HashSet<&str> = HashSet::new();
        relevant.insert(query);
        relevant.extend(self.definitely[i].iter().map(String::as_str));
        if version == Version::V2 {
            relevant.extend(self.maybe[i].iter().map(String::as_str));
        }
        let found: HashSet<&str> = results.iter().map(AsRef::as_ref).collect();
        let hits = found.intersection(&relevant).count() as f64;
        let precision = if results.is_empty() {
            0.0
        } else {
            hits / results.len() as f64
        };
        Ok((precision, hits / relevant.len() as f64))
    }

    /// Graph-distance credit of `results`, normalized by the best credit any
    /// list of the same length could earn. Order-insensitive; 1.0 is ideal.
    pub fn similarity_score<S: AsRef<str>>(&self, query: &str, results: &[S]) -> Result<f64> {
        self.check_item_names(query, results)?;
        let dist = self.distances_from(query);

        let credit = |d: u32| match d {
            0 => MAYBE_WEIGHT as f64,
            UNREACHABLE_SIMILARITY => 0.0,
            d => 1.0 / d as f64,
        };
        let score: f64 = results
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if name == query {
                    MAYBE_WEIGHT as f64
                } else {
                    dist[self.index[name]].map_or(0.0, |d| 1.0 / d as f64)
                }
            })
            .sum();

        let mut best: Vec<u32> = dist
            .iter()
            .map(|d| d.unwrap_or(UNREACHABLE_SIMILARITY))
            .collect();
        best.sort_unstable();
        let max_possible: f64 = best.into_iter().take(results.len()).map(credit).sum();

        Ok(if max_possible > 0.0 {
            score / max_possible
        } else {
            0.0
        })
    }

    /// Normalized inversion count of `results` ordered by graph distance from
    /// the query. 0.0 means already in closest-first order.
    pub fn disorder_score<S: AsRef<str>>(&self, query: &str, results: &[S]) -> Result<f64> {
        self.check_item_names(query, results)?;
        if results.len() < 2 {
            return Ok(0.0);
        }
        let dist = self.distances_from(query);
        let keys: Vec<u32> = results
            .iter()
            .map(|name| dist[self.index[name.as_ref()]].unwrap_or(UNREACHABLE_DISORDER))
            .collect();
        let count = inversions::count_inversions(&keys);
        Ok(count as f64 / inversions::max_inversions(keys.len()) as f64)
    }

    pub fn first_result_score<S: AsRef<str>>(&self, query: &str, results: &[S]) -> Result<f64> {
        self.check_item_names(query, results)?;
        Ok(match results.first() {
            Some(first) if first.as_ref() == query => 1.0,
            _ => 0.0,
        })
    }

    pub fn every_score<S: AsRef<str>>(&self, query: &str, results: &[S]) -> Result<ScoreCard> {
        let (precision1, recall1) = self.precision_and_recall(query, results, Version::V1)?;
        let (precision2, recall2) = self.precision_and_recall(query, results, Version::V2)?;
        Ok(ScoreCard {
            precision1,
            recall1,
            precision2,
            recall2,
            similarity: self.similarity_score(query, results)?,
            disorder: self.disorder_score(query, results)?,
            first_result: self.first_result_score(query, results)?,
        })
    }

    /// Shortest-path weights from a known `query`, indexed like `items()`.
    fn distances_from(&self, query: &str) -> Vec<Option<u32>> {
        // Nodes are exactly the items, inserted in item order.
        self.graph
            .shortest_paths_from(query)
            .unwrap_or_else(|| vec![None; self.items.len()])
    }
}

fn validate_approved(
    items: &[String],
    definitely: &[Vec<String>],
    maybe: &[Vec<String>],
    approved: &ApprovedNames,
) -> Result<()> {
    let allowed: HashSet<&str> = approved.names.iter().map(String::as_str).collect();
    for lists in [definitely, maybe] {
        for (item, similar) in items.iter().zip(lists) {
            if let Some(bad) = std::iter::once(item)
                .chain(similar)
                .find(|name| !allowed.contains(name.as_str()))
            {
                return Err(Error::GoldenValidation(format!(
                    "{bad} was used as an item name in the golden search results \
                     but it is not in the list of approved names"
                )));
            }
        }
    }
    let used: HashSet<&str> = items.iter().map(String::as_str).collect();
    if let Some(unused) = approved.names.iter().find(|n| !used.contains(n.as_str())) {
        return Err(Error::GoldenValidation(format!(
            "{unused} is an approved item name but it never appeared as a query \
             item in the golden search results"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // a -> b (1), a -> c (2), b -> d (1), c -> a (1), d isolated otherwise.
    const TABLE: &str = "a,b,0,c,1\nb,d,0,1\nc,a,0,1\nd,0,1\n";

    fn bench() -> Benchmarker {
        let table = GoldenTable::from_reader(TABLE.as_bytes()).unwrap();
        Benchmarker::new(&table, None).unwrap()
    }

    #[test]
    fn disorder_extremes() {
        let b = bench();
        // Distances from a: a=0, b=1, c=2, d=2.
        assert_eq!(b.disorder_score("a", &["a", "b", "c"]).unwrap(), 0.0);
        assert_eq!(b.disorder_score("a", &["c", "b", "a"]).unwrap(), 1.0);
        assert_eq!(b.disorder_score("a", &["b"]).unwrap(), 0.0);
        // Ties are not inversions.
        assert_eq!(b.disorder_score("a", &["d", "c"]).unwrap(), 0.0);
    }

    #[test]
    fn query_alone_scores_one() {
        let b = bench();
        for q in ["a", "b", "c", "d"] {
            assert_eq!(b.similarity_score(q, &[q]).unwrap(), 1.0);
            assert_eq!(b.first_result_score(q, &[q]).unwrap(), 1.0);
            let (p, _) = b.precision_and_recall(q, &[q], Version::V1).unwrap();
            assert_eq!(p, 1.0);
        }
    }

    #[test]
    fn similarity_is_normalized_by_best_possible_list() {
        let b = bench();
        // Best two from a: a (2.0) + b (1.0) = 3.0; [a, c] earns 2.0 + 0.5.
        let s = b.similarity_score("a", &["a", "c"]).unwrap();
        assert!((s - 2.5 / 3.0).abs() < 1e-12);
        assert!((b.similarity_score("a", &["a", "b"]).unwrap() - 1.0).abs() < 1e-12);
        // d reaches nothing: only itself earns credit.
        assert!((b.similarity_score("d", &["d", "a"]).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(b.similarity_score("d", &["a"]).unwrap(), 0.0);
    }

    #[test]
    fn precision_and_recall_versions() {
        let b = bench();
        let (p1, r1) = b.precision_and_recall("a", &["a", "c", "d"], Version::V1).unwrap();
        assert!((p1 - 1.0 / 3.0).abs() < 1e-12);
        assert!((r1 - 0.5).abs() < 1e-12);
        let (p2, r2) = b.precision_and_recall("a", &["a", "c", "d"], Version::V2).unwrap();
        assert!((p2 - 2.0 / 3.0).abs() < 1e-12);
        assert!((r2 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_names_fail_before_scoring() {
        let b = bench();
        match b.every_score("a", &["b", "zz"]) {
            Err(Error::UnknownItem { name }) => assert_eq!(name, "zz"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            b.first_result_score("nope", &["a"]),
            Err(Error::UnknownItem { .. })
        ));
    }

    #[test]
    fn empty_results_score_zero() {
        let b = bench();
        let card = b.every_score::<&str>("a", &[]).unwrap();
        assert!(card.entries().iter().all(|&(_, v)| v == 0.0));
    }

    #[test]
    fn curated_lists_round_trip_through_graph() {
        let b = bench();
        for q in b.items() {
            let d: Vec<&str> = b.graph().neighbors_at_weight(q, DEFINITELY_WEIGHT);
            let m: Vec<&str> = b.graph().neighbors_at_weight(q, MAYBE_WEIGHT);
            assert_eq!(d, b.definitely_similar(q).unwrap());
            assert_eq!(m, b.maybe_similar(q).unwrap());
        }
    }

    #[test]
    fn typo_creating_new_node_is_rejected() {
        let table = GoldenTable::from_reader("a,bb,0,1\nb,0,1\n".as_bytes()).unwrap();
        assert!(matches!(
            Benchmarker::new(&table, None),
            Err(Error::GoldenValidation(msg)) if msg.contains("bb")
        ));
    }

    #[test]
    fn approved_names_are_enforced_both_ways() {
        let table = GoldenTable::from_reader(TABLE.as_bytes()).unwrap();
        let ok = ApprovedNames::new(["a", "b", "c", "d"]);
        assert!(Benchmarker::new(&table, Some(&ok)).is_ok());

        let missing = ApprovedNames::new(["a", "b", "d"]);
        assert!(matches!(
            Benchmarker::new(&table, Some(&missing)),
            Err(Error::GoldenValidation(msg)) if msg.starts_with("c ")
        ));

        let unused = ApprovedNames::new(["a", "b", "c", "d", "e"]);
        assert!(matches!(
            Benchmarker::new(&table, Some(&unused)),
            Err(Error::GoldenValidation(msg)) if msg.starts_with("e ")
        ));
    }
}
