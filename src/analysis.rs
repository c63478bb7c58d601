// src/analysis.rs
//! Анализ готовой карты и экспорт рёбер
//!
//! Карта переводится в неориентированный граф `petgraph` для подсчёта
//! компонент связности; заодно проверяются инварианты: степень, симметрия
//! связей и совместимость биомов на мостах.

use std::collections::{HashMap, HashSet};

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use crate::biome::can_bridge;
use crate::node::{MAX_NEIGHBORS, Node, NodeId};

/// Сводка по карте
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MapReport {
    pub node_count: usize,
    pub area_count: usize,
    pub edge_count: usize,
    /// Рёбра между разными областями
    pub bridge_count: usize,
    pub component_count: usize,
    pub max_degree: usize,
    /// Узлы с числом соседей больше трёх
    pub degree_violations: Vec<NodeId>,
    /// Связи, не имеющие обратной записи (или ведущие к отсутствующему узлу)
    pub asymmetric_links: Vec<(NodeId, NodeId)>,
    /// Мосты между несовместимыми биомами
    pub illegal_bridges: Vec<(NodeId, NodeId)>,
}

impl MapReport {
    /// Все инварианты карты соблюдены
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.degree_violations.is_empty()
            && self.asymmetric_links.is_empty()
            && self.illegal_bridges.is_empty()
    }
}

/// Неориентированный граф карты; вес вершины — id узла
#[must_use]
pub fn build_map_graph(nodes: &[Node]) -> UnGraph<NodeId, ()> {
    let mut graph = UnGraph::new_undirected();
    let id_to_index: HashMap<&str, NodeIndex> = nodes
        .iter()
        .map(|n| (n.id.as_str(), graph.add_node(n.id.clone())))
        .collect();

    let mut edges = HashSet::new();
    for node in nodes {
        for link in &node.neighbors {
            let Some(&target) = id_to_index.get(link.id.as_str()) else {
                continue;
            };
            let source = id_to_index[node.id.as_str()];
            let key = if source < target {
                (source, target)
            } else {
                (target, source)
            };
            if edges.insert(key) {
                graph.add_edge(key.0, key.1, ());
            }
        }
    }
    graph
}

#[must_use]
pub fn analyze(nodes: &[Node]) -> MapReport {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let graph = build_map_graph(nodes);

    let mut report = MapReport {
        node_count: nodes.len(),
        area_count: nodes.iter().map(|n| n.area.as_str()).collect::<HashSet<_>>().len(),
        edge_count: graph.edge_count(),
        component_count: connected_components(&graph),
        max_degree: nodes.iter().map(Node::degree).max().unwrap_or(0),
        ..MapReport::default()
    };

    let mut seen_bridges: HashSet<(&str, &str)> = HashSet::new();
    for node in nodes {
        if node.degree() > MAX_NEIGHBORS {
            report.degree_violations.push(node.id.clone());
        }
        for link in &node.neighbors {
            let Some(other) = by_id.get(link.id.as_str()) else {
                report
                    .asymmetric_links
                    .push((node.id.clone(), link.id.clone()));
                continue;
            };
            if !other.is_linked_to(&node.id) {
                report
                    .asymmetric_links
                    .push((node.id.clone(), link.id.clone()));
            }
            if node.area == other.area {
                continue;
            }
            // Каждое межобластное ребро учитываем один раз, даже если связь односторонняя
            let (low, high) = if node.id <= other.id {
                (node, *other)
            } else {
                (*other, node)
            };
            if seen_bridges.insert((low.id.as_str(), high.id.as_str())) {
                report.bridge_count += 1;
                if !can_bridge(low.biome, high.biome) {
                    report
                        .illegal_bridges
                        .push((low.id.clone(), high.id.clone()));
                }
            }
        }
    }

    report
}

/// Ребро для экспорта (одно на неориентированную связь, `source < target`)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GraphLink {
    pub source: NodeId,
    pub target: NodeId,
}

/// Данные для внешнего силового раскладчика
#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub links: Vec<GraphLink>,
}

#[must_use]
pub fn to_graph_data(nodes: &[Node]) -> GraphData {
    let links = nodes
        .iter()
        .flat_map(|n| {
            n.neighbors
                .iter()
                .filter(move |link| n.id < link.id)
                .map(move |link| GraphLink {
                    source: n.id.clone(),
                    target: link.id.clone(),
                })
        })
        .collect();
    GraphData {
        nodes: nodes.to_vec(),
        links,
    }
}
