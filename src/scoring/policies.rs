use super::NeighborHit;
use std::collections::{BTreeMap, HashMap};

/// Mean of exactly `padded` distances per model: the smallest observed ones,
/// topped up with `sentinel` when a model was seen fewer times.
pub fn composite(views: &[Vec<NeighborHit>], padded: usize, sentinel: f64) -> BTreeMap<String, f64> {
    let mut observed: HashMap<&str, Vec<f64>> = HashMap::new();
    for hit in views.iter().flatten() {
        observed.entry(hit.model.as_str()).or_default().push(hit.distance);
    }
    let padded = padded.max(1);
    observed
        .into_iter()
        .map(|(model, mut dists)| {
            dists.sort_by(f64::total_cmp);
            dists.truncate(padded);
            dists.resize(padded, sentinel);
            let mean = dists.iter().sum::<f64>() / padded as f64;
            (model.to_string(), mean)
        })
        .collect()
}

/// 0-based ranks of the `max_matches` best composite scores.
pub fn tournament(
    views: &[Vec<NeighborHit>],
    max_matches: usize,
    padded: usize,
    sentinel: f64,
) -> BTreeMap<String, usize> {
    let mut scored: Vec<(String, f64)> = composite(views, padded, sentinel).into_iter().collect();
    // BTreeMap iteration is id-ordered, so the stable sort breaks ties by id.
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored
        .into_iter()
        .take(max_matches)
        .enumerate()
        .map(|(rank, (model, _))| (model, rank))
        .collect()
}

/// Per-model minimum distance over the best `n_per_view` hits of each view,
/// each hit consumed at most once from its own list.
pub fn best_single_image(views: &[Vec<NeighborHit>], n_per_view: usize) -> BTreeMap<String, f64> {
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    for view in views {
        let mut order: Vec<&NeighborHit> = view.iter().collect();
        order.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        for hit in order.into_iter().take(n_per_view) {
            scores
                .entry(hit.model.clone())
                .and_modify(|d| *d = d.min(hit.distance))
                .or_insert(hit.distance);
        }
    }
    scores
}
