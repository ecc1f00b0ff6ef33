// src/disjoint_clusters.rs
use std::collections::HashMap;

use petgraph::unionfind::UnionFind;

use crate::models::{IndexPair, SubCluster};

/// Merges overlapping index pairs into disjoint sub-clusters.
///
/// Two indices end up in the same sub-cluster iff a chain of pairs connects
/// them. Indices that appear in no pair belong to no sub-cluster. Sub-clusters
/// are returned ordered by their smallest index, each one sorted ascending.
pub fn extract_disjoint_clusters(pairs: &[IndexPair]) -> Vec<SubCluster> {
    let Some(size) = pairs.iter().map(|p| p.i.max(p.j) + 1).max() else {
        return Vec::new();
    };

    let mut sets = UnionFind::<usize>::new(size);
    let mut paired = vec![false; size];
    for pair in pairs {
        sets.union(pair.i, pair.j);
        paired[pair.i] = true;
        paired[pair.j] = true;
    }

    // Walking indices in ascending order gives both the member order inside
    // each component and the component order by smallest member
    let mut component_of_root: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    for idx in (0..size).filter(|&idx| paired[idx]) {
        let root = sets.find_mut(idx);
        let slot = *component_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(idx);
    }

    components
        .into_iter()
        .filter_map(SubCluster::from_indices)
        .collect()
}
