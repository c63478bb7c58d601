#![allow(dead_code)]

use std::collections::HashMap;

use nodemap::{Biome, MemoryStore, Node, NodeStore};

/// Узел без связей для ручной сборки хранилища
pub fn node(id: &str, area: &str, biome: Biome, x: f64, y: f64) -> Node {
    Node::new(id.to_string(), area.to_string(), biome, x, y)
}

pub async fn store_with(nodes: &[Node]) -> MemoryStore {
    let store = MemoryStore::new();
    for n in nodes {
        store.put_node(n).await.unwrap();
    }
    store
}

/// Структура карты без учёта id: позиция области, биом, координаты и
/// отсортированные позиции соседей.
pub fn structure(nodes: &[Node]) -> Vec<(usize, Biome, u64, u64, Vec<usize>)> {
    let position: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut areas: Vec<&str> = Vec::new();
    nodes
        .iter()
        .map(|n| {
            let area = match areas.iter().position(|a| *a == n.area) {
                Some(i) => i,
                None => {
                    areas.push(&n.area);
                    areas.len() - 1
                }
            };
            let mut neighbors: Vec<usize> =
                n.neighbors.iter().map(|l| position[l.id.as_str()]).collect();
            neighbors.sort_unstable();
            (area, n.biome, n.x.to_bits(), n.y.to_bits(), neighbors)
        })
        .collect()
}
