// src/bridge.rs
//! Мосты между областями
//!
//! Запускается один раз, когда все области выращены и записаны. Работает по
//! содержимому хранилища, а не по состоянию генерации в памяти.
//!
//! Узлы группируются по семейству биома (глубокий биом относится к семейству
//! своего обычного родителя), затем по области. В каждой группе минимум из двух
//! областей выбираются пограничные узлы (самые удалённые от центроида своей
//! области) и между ними строится 1–2 моста. Если основной проход не нашёл ни
//! одной пары, полный перебор гарантирует хотя бы один мост при наличии
//! допустимой пары.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::biome::{Biome, can_bridge};
use crate::config::BridgeSettings;
use crate::error::StoreError;
use crate::graph::NodeGraph;
use crate::node::{AreaId, MAX_NEIGHBORS, Node, NodeId};
use crate::rng::SeededRandom;
use crate::store::NodeStore;

/// Построенный мост
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bridge {
    pub from: NodeId,
    pub to: NodeId,
    /// Семейство биома, в группе которого построен мост
    pub family: Biome,
    /// Мост найден полным перебором, а не основным проходом
    pub fallback: bool,
}

/// Результат построения мостов
#[derive(Debug, Clone)]
pub struct BridgeOutcome {
    /// Все узлы хранилища после добавления мостов
    pub nodes: Vec<Node>,
    pub bridges: Vec<Bridge>,
    /// Семейства, пропущенные из-за единственной области
    pub skipped_families: Vec<Biome>,
}

/// Области семейства в порядке первого появления и индексы их узлов
type FamilyAreas = Vec<(AreaId, Vec<usize>)>;

fn group_by_family(graph: &NodeGraph) -> BTreeMap<Biome, FamilyAreas> {
    let mut groups: BTreeMap<Biome, FamilyAreas> = BTreeMap::new();
    for (idx, node) in graph.nodes().iter().enumerate() {
        let areas = groups.entry(node.biome.family()).or_default();
        match areas.iter_mut().find(|(id, _)| *id == node.area) {
            Some((_, members)) => members.push(idx),
            None => areas.push((node.area.clone(), vec![idx])),
        }
    }
    groups
}

/// Пограничные узлы области: верхняя доля `fraction` (с округлением вверх)
/// по убыванию квадрата расстояния от центроида.
#[must_use]
pub fn select_border_nodes(graph: &NodeGraph, members: &[usize], fraction: f64) -> Vec<usize> {
    if members.is_empty() {
        return Vec::new();
    }
    let count = members.len() as f64;
    let cx = members.iter().map(|&i| graph.get(i).x).sum::<f64>() / count;
    let cy = members.iter().map(|&i| graph.get(i).y).sum::<f64>() / count;

    let mut ranked: Vec<(usize, f64)> = members
        .iter()
        .map(|&i| (i, graph.get(i).distance_sq(cx, cy)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let take = (count * fraction).ceil() as usize;
    ranked.into_iter().take(take).map(|(i, _)| i).collect()
}

fn is_legal_pair(graph: &NodeGraph, a: usize, b: usize) -> bool {
    let (na, nb) = (graph.get(a), graph.get(b));
    na.area != nb.area && !graph.are_connected(a, b) && can_bridge(na.biome, nb.biome)
}

async fn link_and_persist<S: NodeStore>(
    store: &S,
    graph: &mut NodeGraph,
    a: usize,
    b: usize,
) -> Result<(), StoreError> {
    graph.connect(a, b);
    store.put_node(graph.get(a)).await?;
    store.put_node(graph.get(b)).await?;
    Ok(())
}

/// Строит мосты по всем группам семейств и записывает изменённые узлы.
///
/// Степень узла проверяется один раз при отборе кандидатов; в основном проходе
/// каждый кандидат участвует не более чем в одном мосте.
pub async fn create_biome_bridges<S: NodeStore>(
    store: &S,
    rng: &mut SeededRandom,
    settings: &BridgeSettings,
) -> Result<BridgeOutcome, StoreError> {
    let mut graph = NodeGraph::from_nodes(store.get_all_nodes().await?);
    let groups = group_by_family(&graph);
    let mut bridges = Vec::new();
    let mut skipped_families = Vec::new();

    for (family, areas) in groups {
        if areas.len() < 2 {
            debug!(%family, "single area in biome group, no bridge possible");
            skipped_families.push(family);
            continue;
        }

        let candidates: Vec<usize> = areas
            .iter()
            .flat_map(|(_, members)| {
                select_border_nodes(&graph, members, settings.border_fraction)
            })
            .filter(|&idx| graph.degree(idx) < MAX_NEIGHBORS)
            .collect();

        let quota = if rng.chance(settings.single_bridge_chance) {
            1
        } else {
            2
        };

        let mut used = vec![false; candidates.len()];
        let mut built = 0;
        'scan: for i in 0..candidates.len() {
            if built >= quota {
                break;
            }
            if used[i] {
                continue;
            }
            for j in (i + 1)..candidates.len() {
                if used[j] {
                    continue;
                }
                let (a, b) = (candidates[i], candidates[j]);
                if !is_legal_pair(&graph, a, b) {
                    continue;
                }
                link_and_persist(store, &mut graph, a, b).await?;
                used[i] = true;
                used[j] = true;
                built += 1;
                debug!(%family, from = %graph.get(a).id, to = %graph.get(b).id, "bridge built");
                bridges.push(Bridge {
                    from: graph.get(a).id.clone(),
                    to: graph.get(b).id.clone(),
                    family,
                    fallback: false,
                });
                continue 'scan;
            }
        }

        if built == 0 {
            let pair = candidates.iter().enumerate().find_map(|(i, &a)| {
                candidates[i + 1..]
                    .iter()
                    .find(|&&b| is_legal_pair(&graph, a, b))
                    .map(|&b| (a, b))
            });
            match pair {
                Some((a, b)) => {
                    link_and_persist(store, &mut graph, a, b).await?;
                    debug!(%family, from = %graph.get(a).id, to = %graph.get(b).id, "fallback bridge built");
                    bridges.push(Bridge {
                        from: graph.get(a).id.clone(),
                        to: graph.get(b).id.clone(),
                        family,
                        fallback: true,
                    });
                }
                None => warn!(%family, areas = areas.len(), "no legal bridge pair in biome group"),
            }
        }
    }

    info!(
        bridges = bridges.len(),
        skipped = skipped_families.len(),
        "biome bridges created"
    );

    Ok(BridgeOutcome {
        nodes: graph.into_nodes(),
        bridges,
        skipped_families,
    })
}
