use serde::{Deserialize, Serialize};

/// Биом узла карты: обычный или «глубокий» (вложенный карман внутри обычного)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Forest,
    Desert,
    Mountain,
    DeepForest,
    DeepDesert,
    DeepMountain,
}

/// Пары «обычный биом → его глубокий вариант»
pub const BIOME_HIERARCHY: [(Biome, Biome); 3] = [
    (Biome::Forest, Biome::DeepForest),
    (Biome::Desert, Biome::DeepDesert),
    (Biome::Mountain, Biome::DeepMountain),
];

/// Обычные биомы в порядке, из которого их выбирает планировщик
pub const NORMAL_BIOMES: [Biome; 3] = [Biome::Forest, Biome::Desert, Biome::Mountain];

impl Biome {
    #[must_use]
    pub fn is_deep(self) -> bool {
        self.parent().is_some()
    }

    /// Обычный биом-родитель для глубокого биома, иначе `None`
    #[must_use]
    pub fn parent(self) -> Option<Biome> {
        BIOME_HIERARCHY
            .iter()
            .find(|&&(_, deep)| deep == self)
            .map(|&(normal, _)| normal)
    }

    /// Глубокий вариант обычного биома, иначе `None`
    #[must_use]
    pub fn deep(self) -> Option<Biome> {
        BIOME_HIERARCHY
            .iter()
            .find(|&&(normal, _)| normal == self)
            .map(|&(_, deep)| deep)
    }

    /// Семейство биома: сам обычный биом или родитель глубокого
    #[must_use]
    pub fn family(self) -> Biome {
        self.parent().unwrap_or(self)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Mountain => "mountain",
            Biome::DeepForest => "deep_forest",
            Biome::DeepDesert => "deep_desert",
            Biome::DeepMountain => "deep_mountain",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[must_use]
pub fn parent_of(biome: Biome) -> Option<Biome> {
    biome.parent()
}

/// Можно ли построить мост между биомами.
///
/// Разрешено только между одинаковыми биомами или между глубоким биомом и
/// его собственным обычным родителем. Два разных обычных (или два разных
/// глубоких) биома несовместимы.
#[must_use]
pub fn can_bridge(a: Biome, b: Biome) -> bool {
    a == b || a.parent() == Some(b) || b.parent() == Some(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_deep_and_normal() {
        assert_eq!(parent_of(Biome::DeepForest), Some(Biome::Forest));
        assert_eq!(parent_of(Biome::DeepMountain), Some(Biome::Mountain));
        assert_eq!(parent_of(Biome::Desert), None);
    }

    #[test]
    fn deep_is_inverse_of_parent() {
        for normal in NORMAL_BIOMES {
            let deep = normal.deep().unwrap();
            assert!(deep.is_deep());
            assert_eq!(deep.parent(), Some(normal));
            assert_eq!(deep.family(), normal);
        }
    }

    #[test]
    fn bridge_compatibility() {
        assert!(can_bridge(Biome::Forest, Biome::Forest));
        assert!(can_bridge(Biome::DeepForest, Biome::DeepForest));
        assert!(can_bridge(Biome::Forest, Biome::DeepForest));
        assert!(can_bridge(Biome::DeepDesert, Biome::Desert));

        assert!(!can_bridge(Biome::Forest, Biome::Desert));
        assert!(!can_bridge(Biome::DeepForest, Biome::DeepDesert));
        assert!(!can_bridge(Biome::DeepForest, Biome::Mountain));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Biome::DeepMountain).unwrap();
        assert_eq!(json, "\"deep_mountain\"");
        assert_eq!(Biome::DeepMountain.to_string(), "deep_mountain");
    }
}
