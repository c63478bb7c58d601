// src/node.rs
//! Модель данных карты: узлы, связи и области

use serde::{Deserialize, Serialize};

use crate::biome::Biome;

pub type NodeId = String;
pub type AreaId = String;

/// Максимальное число соседей у узла
pub const MAX_NEIGHBORS: usize = 3;

/// Ссылка на соседний узел (неориентированное ребро хранится в обоих узлах)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborLink {
    pub id: NodeId,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub area: AreaId,
    pub biome: Biome,
    /// Название локации; правдоподобие не проверяется
    #[serde(default)]
    pub title: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub neighbors: Vec<NeighborLink>,
}

impl Node {
    #[must_use]
    pub fn new(id: NodeId, area: AreaId, biome: Biome, x: f64, y: f64) -> Self {
        Self {
            id,
            area,
            biome,
            title: String::new(),
            x,
            y,
            neighbors: Vec::new(),
        }
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.degree() < MAX_NEIGHBORS
    }

    #[must_use]
    pub fn is_linked_to(&self, id: &str) -> bool {
        self.neighbors.iter().any(|link| link.id == id)
    }

    /// Квадрат евклидова расстояния до точки
    #[must_use]
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Область одного биома.
///
/// Создаётся планировщиком, заполняется ссылками на узлы при росте и
/// только читается при построении мостов.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub biome: Biome,
    pub is_deep: bool,
    /// Обычный биом-родитель глубокой области
    pub parent_biome: Option<Biome>,
    pub target_node_count: usize,
    #[serde(default)]
    pub node_ids: Vec<NodeId>,
}
