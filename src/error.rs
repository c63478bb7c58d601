//! Типы ошибок генератора
//!
//! Ошибки хранилища пробрасываются вызывающему коду без изменений: генератор
//! не делает повторов и не откатывает частично записанную карту.

/// Ошибки внешнего хранилища узлов
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Хранилище недоступно
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Ошибки генерации и загрузки карты
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}
