// src/naming.rs
//! Названия локаций по биому: «<прилагательное> <существительное>»

use rand::seq::SliceRandom;

use crate::biome::Biome;
use crate::rng::SeededRandom;

/// Смешивание сида, чтобы поток названий не пересекался с основным потоком
const NAME_STREAM_SALT: u32 = 0x9E37_79B9;

struct NameParts {
    adjectives: &'static [&'static str],
    nouns: &'static [&'static str],
}

const FOREST: NameParts = NameParts {
    adjectives: &[
        "Dark", "Misty", "Ancient", "Cursed", "Shadowed", "Eternal", "Bloodied", "Golden",
    ],
    nouns: &["Woods", "Grove", "Thicket", "Glade", "Canopy", "Hollow"],
};

const DESERT: NameParts = NameParts {
    adjectives: &[
        "Scorching",
        "Endless",
        "Sun-Blasted",
        "Crimson",
        "Shifting",
        "Forgotten",
        "Bone",
    ],
    nouns: &["Dunes", "Wastes", "Sands", "Barrens", "Tombs"],
};

const MOUNTAIN: NameParts = NameParts {
    adjectives: &["Jagged", "Frozen", "Howling", "Iron", "Broken", "Silent"],
    nouns: &["Peaks", "Crags", "Pass", "Spires", "Cliffs", "Summit"],
};

fn parts_for(biome: Biome) -> &'static NameParts {
    match biome.family() {
        Biome::Desert => &DESERT,
        Biome::Mountain => &MOUNTAIN,
        _ => &FOREST,
    }
}

/// Генератор названий со своим потоком случайных чисел
#[derive(Debug, Clone)]
pub struct NameGenerator {
    rng: SeededRandom,
}

impl NameGenerator {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SeededRandom::new(seed ^ NAME_STREAM_SALT),
        }
    }

    pub fn title(&mut self, biome: Biome) -> String {
        let parts = parts_for(biome);
        let adjective = parts.adjectives.choose(&mut self.rng).copied().unwrap_or("Nameless");
        let noun = parts.nouns.choose(&mut self.rng).copied().unwrap_or("Place");
        if biome.is_deep() {
            format!("Deep {adjective} {noun}")
        } else {
            format!("{adjective} {noun}")
        }
    }
}
