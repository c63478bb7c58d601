// src/config.rs
//! Конфигурация генерации карты узлов
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Сид генератора случайных чисел
//! - Планирование областей (количество и размеры)
//! - Рост областей (окна разброса координат, выбор родителей)
//! - Построение мостов между областями
//!
//! Все структуры поддерживают сериализацию в TOML/JSON. Значения по умолчанию
//! воспроизводят эталонное поведение генератора.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::MapError;

/// Настройки планировщика областей
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerSettings {
    /// Минимальное число обычных областей
    #[serde(default = "default_min_normal_areas")]
    pub min_normal_areas: usize,

    /// Размер случайной добавки к числу обычных областей (`0..extra`)
    #[serde(default = "default_extra_normal_areas")]
    pub extra_normal_areas: usize,

    /// Минимальный размер обычной области в узлах
    #[serde(default = "default_normal_size_min")]
    pub normal_size_min: usize,

    /// Разброс размера обычной области (`0..spread`)
    #[serde(default = "default_normal_size_spread")]
    pub normal_size_spread: usize,

    /// Вероятность одной глубокой области на биом (иначе две)
    #[serde(default = "default_single_deep_chance")]
    pub single_deep_chance: f64,

    /// Минимальный размер глубокой области
    #[serde(default = "default_deep_size_min")]
    pub deep_size_min: usize,

    /// Разброс размера глубокой области
    #[serde(default = "default_deep_size_spread")]
    pub deep_size_spread: usize,
}

fn default_min_normal_areas() -> usize {
    2
}
fn default_extra_normal_areas() -> usize {
    2
}
fn default_normal_size_min() -> usize {
    4
}
fn default_normal_size_spread() -> usize {
    4
}
fn default_single_deep_chance() -> f64 {
    0.7
}
fn default_deep_size_min() -> usize {
    2
}
fn default_deep_size_spread() -> usize {
    2
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            min_normal_areas: 2,
            extra_normal_areas: 2,
            normal_size_min: 4,
            normal_size_spread: 4,
            single_deep_chance: 0.7,
            deep_size_min: 2,
            deep_size_spread: 2,
        }
    }
}

/// Настройки роста областей
///
/// Все окна задаются полушириной: координата равномерна в `±window`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthSettings {
    /// Окно первого узла обычной области вокруг начала координат
    #[serde(default = "default_origin_window")]
    pub origin_window: f64,

    /// Разброс новых узлов обычной области вокруг её первого узла
    #[serde(default = "default_normal_jitter")]
    pub normal_jitter: f64,

    /// Окно первого узла глубокой области вокруг первого узла родителя
    #[serde(default = "default_deep_origin_window")]
    pub deep_origin_window: f64,

    /// Разброс новых узлов глубокой области вокруг первого узла родителя
    #[serde(default = "default_deep_jitter")]
    pub deep_jitter: f64,

    /// Вероятность присоединить новый узел к одному родителю (иначе к двум)
    #[serde(default = "default_single_parent_chance")]
    pub single_parent_chance: f64,
}

fn default_origin_window() -> f64 {
    400.0
}
fn default_normal_jitter() -> f64 {
    350.0
}
fn default_deep_origin_window() -> f64 {
    90.0
}
fn default_deep_jitter() -> f64 {
    180.0
}
fn default_single_parent_chance() -> f64 {
    0.7
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self {
            origin_window: 400.0,
            normal_jitter: 350.0,
            deep_origin_window: 90.0,
            deep_jitter: 180.0,
            single_parent_chance: 0.7,
        }
    }
}

/// Настройки мостов между областями
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeSettings {
    /// Доля самых удалённых от центроида узлов, считающихся пограничными
    #[serde(default = "default_border_fraction")]
    pub border_fraction: f64,

    /// Вероятность квоты в один мост на группу (иначе два)
    #[serde(default = "default_single_bridge_chance")]
    pub single_bridge_chance: f64,
}

fn default_border_fraction() -> f64 {
    0.3
}
fn default_single_bridge_chance() -> f64 {
    0.5
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            border_fraction: 0.3,
            single_bridge_chance: 0.5,
        }
    }
}

/// Основные параметры генерации карты
///
/// Полная конфигурация одного запуска. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// Сид генератора случайных чисел (по умолчанию 12345)
    #[serde(default = "default_seed")]
    pub seed: u32,

    #[serde(default)]
    pub planner: PlannerSettings,

    #[serde(default)]
    pub growth: GrowthSettings,

    #[serde(default)]
    pub bridges: BridgeSettings,
}

fn default_seed() -> u32 {
    12345
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            planner: PlannerSettings::default(),
            growth: GrowthSettings::default(),
            bridges: BridgeSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    ///
    /// [planner]
    /// single_deep_chance = 0.5
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, MapError> {
        Ok(toml::from_str(contents)?)
    }
}
