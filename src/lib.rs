pub mod analysis;
pub mod biome;
pub mod bridge;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod grower;
pub mod naming;
pub mod node;
pub mod planner;
pub mod rng;
pub mod store;

pub use biome::{Biome, can_bridge, parent_of};
pub use config::{BridgeSettings, GeneratorConfig, GrowthSettings, PlannerSettings};
pub use error::{MapError, StoreError};
pub use generator::{GeneratedMap, MapGenerator};
pub use node::{Area, MAX_NEIGHBORS, NeighborLink, Node};
pub use rng::SeededRandom;
pub use store::{JsonFileStore, MemoryStore, NodeStore};
