// src/grower.rs
//! Рост графа внутри одной области
//!
//! Область растёт от первого узла: каждый новый узел присоединяется к
//! ближайшим «открытым» узлам своей области (у которых меньше трёх соседей).
//! Реестр открытых узлов живёт весь запуск генерации и общий для всех
//! областей, но при выборе родителей фильтруется по текущей области.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::GrowthSettings;
use crate::graph::NodeGraph;
use crate::naming::NameGenerator;
use crate::node::{Area, MAX_NEIGHBORS, Node, NodeId};
use crate::rng::SeededRandom;

/// Реестр открытых узлов: индекс узла в графе → его id.
///
/// Содержит ровно те узлы, у которых сейчас меньше [`MAX_NEIGHBORS`] соседей.
/// Упорядочен по индексу, то есть по порядку создания узлов.
#[derive(Debug, Default, Clone)]
pub struct OpenNodeRegistry {
    open: BTreeMap<usize, NodeId>,
}

impl OpenNodeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, idx: usize, id: NodeId) {
        self.open.insert(idx, id);
    }

    pub fn remove(&mut self, idx: usize) {
        self.open.remove(&idx);
    }

    #[must_use]
    pub fn contains(&self, idx: usize) -> bool {
        self.open.contains_key(&idx)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Открытые узлы области в порядке создания
    pub fn open_in_area<'a>(
        &'a self,
        graph: &'a NodeGraph,
        area_id: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        self.open
            .keys()
            .copied()
            .filter(move |&idx| graph.get(idx).area == area_id)
    }
}

/// Изменяемый контекст одного запуска генерации
#[derive(Debug)]
pub struct GrowthContext {
    pub graph: NodeGraph,
    pub registry: OpenNodeRegistry,
    pub names: NameGenerator,
}

impl GrowthContext {
    #[must_use]
    pub fn new(names: NameGenerator) -> Self {
        Self {
            graph: NodeGraph::new(),
            registry: OpenNodeRegistry::new(),
            names,
        }
    }

    fn place_node(&mut self, area: &mut Area, x: f64, y: f64) -> usize {
        let id = format!("n_{}_{}", area.id, area.node_ids.len());
        let mut node = Node::new(id.clone(), area.id.clone(), area.biome, x, y);
        node.title = self.names.title(area.biome);
        area.node_ids.push(id);
        self.graph.insert(node)
    }
}

/// Координаты первого узла уже выращенной обычной области родительского биома
#[must_use]
pub fn parent_anchor(area: &Area, grown: &[Area], graph: &NodeGraph) -> Option<(f64, f64)> {
    let parent = area.parent_biome?;
    grown
        .iter()
        .filter(|a| !a.is_deep && a.biome == parent)
        .find_map(|a| a.node_ids.first())
        .and_then(|id| graph.node(id))
        .map(|node| (node.x, node.y))
}

/// Выращивает одну область до целевого размера.
///
/// `anchor` — первый узел родительской обычной области (только для глубоких).
/// Возвращает индексы созданных узлов в графе контекста.
pub fn grow_area(
    ctx: &mut GrowthContext,
    rng: &mut SeededRandom,
    area: &mut Area,
    anchor: Option<(f64, f64)>,
    settings: &GrowthSettings,
) -> Vec<usize> {
    if area.target_node_count == 0 {
        return Vec::new();
    }

    let (origin_x, origin_y) = match (area.is_deep, anchor) {
        (true, Some((ax, ay))) => {
            let x = ax + rng.spread(settings.deep_origin_window);
            let y = ay + rng.spread(settings.deep_origin_window);
            (x, y)
        }
        (is_deep, _) => {
            if is_deep {
                warn!(area = %area.id, "deep area has no grown parent area, clustering around its own origin");
            }
            let x = rng.spread(settings.origin_window);
            let y = rng.spread(settings.origin_window);
            (x, y)
        }
    };

    let origin = ctx.place_node(area, origin_x, origin_y);
    let origin_id = ctx.graph.get(origin).id.clone();
    ctx.registry.insert(origin, origin_id);
    let mut created = vec![origin];

    let (center, jitter) = if area.is_deep {
        (anchor.unwrap_or((origin_x, origin_y)), settings.deep_jitter)
    } else {
        ((origin_x, origin_y), settings.normal_jitter)
    };

    while created.len() < area.target_node_count {
        let x = center.0 + rng.spread(jitter);
        let y = center.1 + rng.spread(jitter);
        let idx = ctx.place_node(area, x, y);

        let parents = select_parents(ctx, rng, &area.id, &created, idx, settings);
        for parent in parents {
            ctx.graph.connect(idx, parent);
            if ctx.graph.degree(parent) >= MAX_NEIGHBORS {
                ctx.registry.remove(parent);
            }
        }
        if ctx.graph.degree(idx) < MAX_NEIGHBORS {
            let id = ctx.graph.get(idx).id.clone();
            ctx.registry.insert(idx, id);
        }
        created.push(idx);
    }

    debug!(
        area = %area.id,
        biome = %area.biome,
        nodes = created.len(),
        "area grown"
    );
    created
}

/// Родители нового узла: 1 или 2 ближайших открытых узла области.
///
/// Если открытых узлов в области нет, берётся ближайший узел области без
/// проверки его степени, так что у него может оказаться больше трёх соседей.
fn select_parents(
    ctx: &GrowthContext,
    rng: &mut SeededRandom,
    area_id: &str,
    placed: &[usize],
    new_idx: usize,
    settings: &GrowthSettings,
) -> Vec<usize> {
    let new_node = ctx.graph.get(new_idx);
    let mut ranked: Vec<(usize, f64)> = ctx
        .registry
        .open_in_area(&ctx.graph, area_id)
        .filter(|&idx| idx != new_idx)
        .map(|idx| (idx, ctx.graph.get(idx).distance_sq(new_node.x, new_node.y)))
        .collect();

    if ranked.is_empty() {
        let nearest = placed
            .iter()
            .copied()
            .map(|idx| (idx, ctx.graph.get(idx).distance_sq(new_node.x, new_node.y)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        if let Some((idx, _)) = nearest {
            warn!(
                area = %area_id,
                node = %ctx.graph.get(idx).id,
                degree = ctx.graph.degree(idx),
                "no open nodes in area, attaching to nearest node regardless of degree"
            );
        }
        return nearest.map(|(idx, _)| idx).into_iter().collect();
    }

    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    let count = if rng.chance(settings.single_parent_chance) {
        1
    } else {
        2
    };
    ranked.into_iter().take(count).map(|(idx, _)| idx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;

    fn area(id: &str, biome: Biome, target: usize) -> Area {
        Area {
            id: id.to_string(),
            biome,
            is_deep: biome.is_deep(),
            parent_biome: biome.parent(),
            target_node_count: target,
            node_ids: Vec::new(),
        }
    }

    fn context() -> GrowthContext {
        GrowthContext::new(NameGenerator::new(0))
    }

    #[test]
    fn grows_to_target_with_bounded_degree() {
        let settings = GrowthSettings::default();
        for seed in 0..200 {
            let mut ctx = context();
            let mut rng = SeededRandom::new(seed);
            let mut forest = area("forest_0", Biome::Forest, 7);
            let created = grow_area(&mut ctx, &mut rng, &mut forest, None, &settings);

            assert_eq!(created.len(), 7);
            assert_eq!(forest.node_ids.len(), 7);
            for &idx in &created {
                let node = ctx.graph.get(idx);
                assert!(node.degree() <= MAX_NEIGHBORS);
                assert!(node.degree() >= 1);
                assert_eq!(ctx.registry.contains(idx), node.is_open());
                for link in &node.neighbors {
                    let other = ctx.graph.node(&link.id).unwrap();
                    assert!(other.is_linked_to(&node.id));
                    assert_eq!(other.area, node.area);
                    assert!(!link.locked);
                }
            }
        }
    }

    #[test]
    fn normal_area_stays_within_windows() {
        let settings = GrowthSettings::default();
        let mut ctx = context();
        let mut rng = SeededRandom::new(5);
        let mut desert = area("desert_0", Biome::Desert, 6);
        grow_area(&mut ctx, &mut rng, &mut desert, None, &settings);

        let origin = ctx.graph.node(&desert.node_ids[0]).unwrap().clone();
        assert!(origin.x.abs() <= 400.0 && origin.y.abs() <= 400.0);
        for id in &desert.node_ids[1..] {
            let node = ctx.graph.node(id).unwrap();
            assert!((node.x - origin.x).abs() <= 350.0);
            assert!((node.y - origin.y).abs() <= 350.0);
        }
    }

    #[test]
    fn deep_area_clusters_around_parent_anchor() {
        let settings = GrowthSettings::default();
        let mut ctx = context();
        let mut rng = SeededRandom::new(11);
        let mut forest = area("forest_0", Biome::Forest, 5);
        grow_area(&mut ctx, &mut rng, &mut forest, None, &settings);

        let mut deep = area("deep_forest_1", Biome::DeepForest, 3);
        let grown = vec![forest.clone()];
        let anchor = parent_anchor(&deep, &grown, &ctx.graph).unwrap();
        let first = ctx.graph.node(&forest.node_ids[0]).unwrap();
        assert!((anchor.0 - first.x).abs() < f64::EPSILON);

        grow_area(&mut ctx, &mut rng, &mut deep, Some(anchor), &settings);
        let origin = ctx.graph.node(&deep.node_ids[0]).unwrap();
        assert!((origin.x - anchor.0).abs() <= 90.0);
        assert!((origin.y - anchor.1).abs() <= 90.0);
        for id in &deep.node_ids[1..] {
            let node = ctx.graph.node(id).unwrap();
            assert!((node.x - anchor.0).abs() <= 180.0);
            assert!((node.y - anchor.1).abs() <= 180.0);
        }
    }

    #[test]
    fn deep_area_without_parent_still_grows() {
        let settings = GrowthSettings::default();
        let mut ctx = context();
        let mut rng = SeededRandom::new(2);
        let mut deep = area("deep_desert_0", Biome::DeepDesert, 3);
        assert!(parent_anchor(&deep, &[], &ctx.graph).is_none());

        let created = grow_area(&mut ctx, &mut rng, &mut deep, None, &settings);
        assert_eq!(created.len(), 3);
    }

    #[test]
    fn single_node_area_is_isolated() {
        let settings = GrowthSettings::default();
        let mut ctx = context();
        let mut rng = SeededRandom::new(1);
        let mut tiny = area("mountain_0", Biome::Mountain, 1);
        let created = grow_area(&mut ctx, &mut rng, &mut tiny, None, &settings);

        assert_eq!(created.len(), 1);
        assert_eq!(ctx.graph.degree(created[0]), 0);
        assert!(ctx.registry.contains(created[0]));
        assert_eq!(ctx.registry.len(), 1);
    }

    #[test]
    fn parents_are_never_taken_from_other_areas() {
        let settings = GrowthSettings::default();
        let mut ctx = context();
        let mut rng = SeededRandom::new(21);
        let mut a = area("forest_0", Biome::Forest, 6);
        let mut b = area("forest_1", Biome::Forest, 6);
        grow_area(&mut ctx, &mut rng, &mut a, None, &settings);
        grow_area(&mut ctx, &mut rng, &mut b, None, &settings);

        for node in ctx.graph.nodes() {
            for link in &node.neighbors {
                assert_eq!(ctx.graph.node(&link.id).unwrap().area, node.area);
            }
        }
    }

    #[test]
    fn fallback_attaches_to_nearest_full_node() {
        let settings = GrowthSettings::default();
        let mut ctx = context();
        let mut rng = SeededRandom::new(4);
        let mut full = area("forest_0", Biome::Forest, 1);
        grow_area(&mut ctx, &mut rng, &mut full, None, &settings);
        // Закрываем единственный узел, чтобы в области не осталось открытых
        let origin = ctx.graph.position(&full.node_ids[0]).unwrap();
        ctx.registry.remove(origin);
        assert!(ctx.registry.is_empty());

        let placed = vec![origin];
        let idx = ctx.place_node(&mut full, 0.0, 0.0);
        let parents = select_parents(&ctx, &mut rng, "forest_0", &placed, idx, &settings);
        assert_eq!(parents, vec![origin]);
    }
}
