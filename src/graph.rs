use crate::node::{NeighborLink, Node};
use std::collections::HashMap;

/// Индексированное хранилище узлов: рёбра хранятся списками id, а не ссылками
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Строит граф из списка узлов; при повторе id побеждает последняя запись
    #[must_use]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.insert(node);
        }
        graph
    }

    /// Добавляет (или заменяет) узел и возвращает его индекс
    pub fn insert(&mut self, node: Node) -> usize {
        if let Some(&idx) = self.index.get(&node.id) {
            self.nodes[idx] = node;
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(node.id.clone(), idx);
        self.nodes.push(node);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.position(id).map(|idx| &self.nodes[idx])
    }

    #[must_use]
    pub fn degree(&self, idx: usize) -> usize {
        self.nodes[idx].degree()
    }

    #[must_use]
    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        self.nodes[a].is_linked_to(&self.nodes[b].id)
    }

    /// Соединяет два узла неориентированным незаблокированным ребром
    pub fn connect(&mut self, a: usize, b: usize) {
        let id_a = self.nodes[a].id.clone();
        let id_b = self.nodes[b].id.clone();
        self.nodes[a].neighbors.push(NeighborLink {
            id: id_b,
            locked: false,
        });
        self.nodes[b].neighbors.push(NeighborLink {
            id: id_a,
            locked: false,
        });
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
