// src/store.rs
//! Хранилище узлов карты
//!
//! Генератору от хранилища нужны только три операции: прочитать все узлы,
//! записать (upsert) один узел по `id` и очистить хранилище. Все операции
//! асинхронные: генератор приостанавливается на каждой из них.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;
use crate::node::Node;

/// Внешнее хранилище узлов
pub trait NodeStore {
    /// Все узлы в порядке первой записи
    fn get_all_nodes(&self) -> impl Future<Output = Result<Vec<Node>, StoreError>> + Send;

    /// Upsert по `node.id`
    fn put_node(&self, node: &Node) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Очистка; повторная очистка пустого хранилища успешна
    fn clear_nodes(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Default)]
struct MemoryState {
    order: Vec<String>,
    nodes: HashMap<String, Node>,
    puts: usize,
}

/// Искусственные отказы для тестов сбоев хранилища
#[derive(Debug, Default, Clone, Copy)]
struct Failures {
    after_puts: Option<usize>,
    reads: bool,
    clears: bool,
}

/// Хранилище в памяти с сохранением порядка вставки
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    failures: Failures,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Хранилище, которое отказывает после `puts` успешных записей
    #[must_use]
    pub fn failing_after(puts: usize) -> Self {
        Self::with_failures(Failures {
            after_puts: Some(puts),
            ..Failures::default()
        })
    }

    /// Хранилище, в котором любое чтение заканчивается ошибкой
    #[must_use]
    pub fn failing_reads() -> Self {
        Self::with_failures(Failures {
            reads: true,
            ..Failures::default()
        })
    }

    /// Хранилище, в котором очистка заканчивается ошибкой
    #[must_use]
    pub fn failing_clears() -> Self {
        Self::with_failures(Failures {
            clears: true,
            ..Failures::default()
        })
    }

    fn with_failures(failures: Failures) -> Self {
        Self {
            state: RwLock::default(),
            failures,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl NodeStore for MemoryStore {
    async fn get_all_nodes(&self) -> Result<Vec<Node>, StoreError> {
        if self.failures.reads {
            return Err(StoreError::Unavailable("read of all nodes rejected".into()));
        }
        let state = self.state.read().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.nodes.get(id).cloned())
            .collect())
    }

    async fn put_node(&self, node: &Node) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if self.failures.after_puts.is_some_and(|limit| state.puts >= limit) {
            return Err(StoreError::Unavailable(format!(
                "write of node {} rejected",
                node.id
            )));
        }
        state.puts += 1;
        if state.nodes.insert(node.id.clone(), node.clone()).is_none() {
            state.order.push(node.id.clone());
        }
        Ok(())
    }

    async fn clear_nodes(&self) -> Result<(), StoreError> {
        if self.failures.clears {
            return Err(StoreError::Unavailable("clear rejected".into()));
        }
        let mut state = self.state.write().await;
        state.order.clear();
        state.nodes.clear();
        Ok(())
    }
}

/// Хранилище в одном JSON-файле (массив узлов, ключ — `id`)
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_nodes(&self) -> Result<Vec<Node>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(Vec::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_nodes(&self, nodes: &[Node]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_vec_pretty(nodes)?;
        // Пишем во временный файл и переименовываем, чтобы не оставить обрезанный JSON
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl NodeStore for JsonFileStore {
    async fn get_all_nodes(&self) -> Result<Vec<Node>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_nodes().await
    }

    async fn put_node(&self, node: &Node) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut nodes = self.read_nodes().await?;
        match nodes.iter_mut().find(|n| n.id == node.id) {
            Some(existing) => *existing = node.clone(),
            None => nodes.push(node.clone()),
        }
        self.write_nodes(&nodes).await
    }

    async fn clear_nodes(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;

    fn node(id: &str, x: f64) -> Node {
        Node::new(id.to_string(), "area".to_string(), Biome::Desert, x, 0.0)
    }

    #[tokio::test]
    async fn memory_store_upserts_in_insertion_order() {
        let store = MemoryStore::new();
        store.put_node(&node("b", 1.0)).await.unwrap();
        store.put_node(&node("a", 2.0)).await.unwrap();
        store.put_node(&node("b", 3.0)).await.unwrap();

        let nodes = store.get_all_nodes().await.unwrap();
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert!((nodes[0].x - 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn memory_store_clear_is_idempotent() {
        let store = MemoryStore::new();
        store.clear_nodes().await.unwrap();
        store.put_node(&node("a", 0.0)).await.unwrap();
        store.clear_nodes().await.unwrap();
        store.clear_nodes().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn failing_store_rejects_after_limit() {
        let store = MemoryStore::failing_after(1);
        store.put_node(&node("a", 0.0)).await.unwrap();
        let err = store.put_node(&node("b", 0.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn failing_reads_and_clears_are_reported() {
        let store = MemoryStore::failing_reads();
        store.put_node(&node("a", 0.0)).await.unwrap();
        assert!(matches!(
            store.get_all_nodes().await.unwrap_err(),
            StoreError::Unavailable(_)
        ));

        let store = MemoryStore::failing_clears();
        store.put_node(&node("a", 0.0)).await.unwrap();
        assert!(store.clear_nodes().await.is_err());
        assert_eq!(store.len().await, 1);
    }
}
