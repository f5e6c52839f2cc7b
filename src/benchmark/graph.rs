use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Weighted directed graph over item names.
///
/// Out-edges keep insertion order; re-adding an edge overwrites its weight in
/// place.
#[derive(Clone, Debug, Default)]
pub struct GoldenGraph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Vec<(usize, u32)>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct State {
    cost: u32,
    node: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl GoldenGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, inserting a node if needed.
    pub fn add_node(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        self.edges.push(Vec::new());
        i
    }

    pub fn add_edge(&mut self, from: &str, to: &str, weight: u32) {
        let a = self.add_node(from);
        let b = self.add_node(to);
        match self.edges[a].iter_mut().find(|(n, _)| *n == b) {
            Some(edge) => edge.1 = weight,
            None => self.edges[a].push((b, weight)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn node_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn edge_weight(&self, from: &str, to: &str) -> Option<u32> {
        let (a, b) = (self.node_index(from)?, self.node_index(to)?);
        self.edges[a].iter().find(|(n, _)| *n == b).map(|e| e.1)
    }

    /// Out-neighbours of `name` joined by an edge of exactly `weight`.
    pub fn neighbors_at_weight(&self, name: &str, weight: u32) -> Vec<&str> {
        let Some(a) = self.node_index(name) else {
            return Vec::new();
        };
        self.edges[a]
            .iter()
            .filter(|(_, w)| *w == weight)
            .map(|(n, _)| self.names[*n].as_str())
            .collect()
    }

    /// Single-source shortest path weights, indexed by node; `None` when
    /// unreachable. The source itself is at distance 0.
    pub fn shortest_paths_from(&self, name: &str) -> Option<Vec<Option<u32>>> {
        let start = self.node_index(name)?;
        let mut dist: Vec<Option<u32>> = vec![None; self.names.len()];
        dist[start] = Some(0);
        let mut heap = BinaryHeap::new();
        heap.push(State {
            cost: 0,
            node: start,
        });
        while let Some(State { cost, node }) = heap.pop() {
            if dist[node].is_some_and(|d| cost > d) {
                continue;
            }
            for &(next, w) in &self.edges[node] {
                let candidate = cost + w;
                if dist[next].map_or(true, |d| candidate < d) {
                    dist[next] = Some(candidate);
                    heap.push(State {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }
        Some(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GoldenGraph {
        let mut g = GoldenGraph::new();
        g.add_edge("a", "b", 1);
        g.add_edge("b", "c", 2);
        g.add_edge("a", "c", 5);
        g.add_node("d");
        g
    }

    #[test]
    fn dijkstra_prefers_cheaper_indirect_path() {
        let g = sample();
        let dist = g.shortest_paths_from("a").unwrap();
        let at = |n: &str| dist[g.node_index(n).unwrap()];
        assert_eq!(at("a"), Some(0));
        assert_eq!(at("b"), Some(1));
        assert_eq!(at("c"), Some(3));
        assert_eq!(at("d"), None);
        assert!(g.shortest_paths_from("zzz").is_none());
    }

    #[test]
    fn edges_are_directed() {
        let g = sample();
        let dist = g.shortest_paths_from("c").unwrap();
        assert_eq!(dist[g.node_index("a").unwrap()], None);
    }

    #[test]
    fn re_adding_edge_overwrites_weight_in_place() {
        let mut g = sample();
        g.add_edge("a", "b", 2);
        assert_eq!(g.edge_weight("a", "b"), Some(2));
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.neighbors_at_weight("a", 2), vec!["b"]);
        assert_eq!(g.neighbors_at_weight("a", 5), vec!["c"]);
        assert!(g.neighbors_at_weight("a", 1).is_empty());
    }
}
