// src/generator.rs
//! Оркестрация генерации карты: планирование → рост → запись → мосты
//!
//! Все шаги выполняются строго последовательно. Мосты строятся только после
//! того, как записаны все области, потому что читают полную карту из
//! хранилища. Сбой хранилища на любом шаге пробрасывается как есть и
//! оставляет в хранилище частично построенную карту.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info};

use crate::bridge::{Bridge, create_biome_bridges};
use crate::config::GeneratorConfig;
use crate::error::MapError;
use crate::grower::{GrowthContext, grow_area, parent_anchor};
use crate::naming::NameGenerator;
use crate::node::{Area, Node};
use crate::planner::plan_areas;
use crate::rng::SeededRandom;
use crate::store::NodeStore;

/// Полный результат одного запуска
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMap {
    pub seed: u32,
    pub areas: Vec<Area>,
    pub nodes: Vec<Node>,
    pub bridges: Vec<Bridge>,
}

/// Генератор карты поверх внешнего хранилища узлов
#[derive(Debug)]
pub struct MapGenerator<S> {
    store: S,
    config: GeneratorConfig,
}

impl<S: NodeStore> MapGenerator<S> {
    pub fn new(store: S, config: GeneratorConfig) -> Self {
        Self { store, config }
    }

    /// Сид следующих запусков; каждый запуск начинает новый поток
    pub fn set_seed(&mut self, seed: u32) {
        self.config.seed = seed;
    }

    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Очищает хранилище и строит новую карту
    pub async fn generate(&self) -> Result<GeneratedMap, MapError> {
        let seed = self.config.seed;
        let run_tag = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
            .to_string();

        info!(seed, "clearing node store");
        self.store.clear_nodes().await?;

        let mut rng = SeededRandom::new(seed);
        let mut ctx = GrowthContext::new(NameGenerator::new(seed));

        let planned = plan_areas(&mut rng, &self.config.planner, &run_tag);
        info!(
            areas = planned.len(),
            deep = planned.iter().filter(|a| a.is_deep).count(),
            "areas planned"
        );

        let mut grown: Vec<Area> = Vec::with_capacity(planned.len());
        for mut area in planned {
            let anchor = parent_anchor(&area, &grown, &ctx.graph);
            let created = grow_area(&mut ctx, &mut rng, &mut area, anchor, &self.config.growth);
            for idx in created {
                self.store.put_node(ctx.graph.get(idx)).await?;
            }
            debug!(area = %area.id, target = area.target_node_count, "area persisted");
            grown.push(area);
        }

        let outcome = create_biome_bridges(&self.store, &mut rng, &self.config.bridges).await?;
        info!(
            nodes = outcome.nodes.len(),
            bridges = outcome.bridges.len(),
            "map generated"
        );

        Ok(GeneratedMap {
            seed,
            areas: grown,
            nodes: outcome.nodes,
            bridges: outcome.bridges,
        })
    }

    /// Очищает хранилище, строит карту и возвращает все узлы
    pub async fn generate_full_map(&self) -> Result<Vec<Node>, MapError> {
        Ok(self.generate().await?.nodes)
    }

    /// Текущее содержимое хранилища, без генерации
    pub async fn load_map(&self) -> Result<Vec<Node>, MapError> {
        Ok(self.store.get_all_nodes().await?)
    }

    /// Очищает хранилище без новой генерации
    pub async fn reset(&self) -> Result<(), MapError> {
        info!("resetting node store");
        Ok(self.store.clear_nodes().await?)
    }
}
