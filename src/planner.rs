// src/planner.rs
//! Планирование областей
//!
//! Решает, сколько обычных и глубоких областей будет на карте, какие у них
//! биомы и целевые размеры. Возвращает `[обычные..., глубокие...]`: глубокие
//! области при росте ищут уже выращенную обычную область своего родителя,
//! поэтому обычные обязаны идти первыми.

use crate::biome::{Biome, NORMAL_BIOMES};
use crate::config::PlannerSettings;
use crate::node::Area;
use crate::rng::SeededRandom;

#[must_use]
pub fn plan_areas(rng: &mut SeededRandom, settings: &PlannerSettings, run_tag: &str) -> Vec<Area> {
    let normal_count = settings.min_normal_areas + rng.below(settings.extra_normal_areas.max(1));
    let mut areas = Vec::new();

    for _ in 0..normal_count {
        let biome = NORMAL_BIOMES[rng.below(NORMAL_BIOMES.len())];
        let target = settings.normal_size_min + rng.below(settings.normal_size_spread.max(1));
        let id = format!("{biome}_{run_tag}_{}", areas.len());
        areas.push(Area {
            id,
            biome,
            is_deep: false,
            parent_biome: None,
            target_node_count: target,
            node_ids: Vec::new(),
        });
    }

    // Различные обычные биомы в порядке первого появления
    let mut chosen: Vec<Biome> = Vec::new();
    for area in &areas {
        if !chosen.contains(&area.biome) {
            chosen.push(area.biome);
        }
    }

    for parent in chosen {
        let Some(deep) = parent.deep() else {
            continue;
        };
        let deep_count = if rng.chance(settings.single_deep_chance) {
            1
        } else {
            2
        };
        for _ in 0..deep_count {
            let target = settings.deep_size_min + rng.below(settings.deep_size_spread.max(1));
            let id = format!("{deep}_{run_tag}_{}", areas.len());
            areas.push(Area {
                id,
                biome: deep,
                is_deep: true,
                parent_biome: Some(parent),
                target_node_count: target,
                node_ids: Vec::new(),
            });
        }
    }

    areas
}
