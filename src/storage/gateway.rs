use super::kv::KeyValueStore;
use crate::error::StoreError;
use crate::todo::Todo;
use tracing::{debug, warn};

/// Fixed slot name the todo list lives under.
pub const TODOS_KEY: &str = "todos";

/// Best-effort load/save of the whole todo list.
///
/// Nothing here ever fails outward: unreadable or corrupt data loads as an
/// empty list and failed writes are logged and dropped.
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, TODOS_KEY)
    }

    pub fn with_key(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn load(&self) -> Vec<Todo> {
        match self.try_load() {
            Ok(todos) => {
                debug!(key = %self.key, count = todos.len(), "Loaded todos");
                todos
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring unreadable todo slot");
                Vec::new()
            }
        }
    }

    pub fn save(&self, todos: &[Todo]) {
        if let Err(e) = self.try_save(todos) {
            warn!(key = %self.key, error = %e, "Dropping failed todo write");
        }
    }

    fn try_load(&self) -> Result<Vec<Todo>, StoreError> {
        let raw = self
            .store
            .get(&self.key)
            .map_err(StoreError::persistence)?;
        match raw {
            Some(content) if !content.trim().is_empty() => {
                serde_json::from_str(&content).map_err(StoreError::persistence)
            }
            _ => Ok(Vec::new()),
        }
    }

    fn try_save(&self, todos: &[Todo]) -> Result<(), StoreError> {
        let content = serde_json::to_string(todos).map_err(StoreError::persistence)?;
        self.store
            .set(&self.key, &content)
            .map_err(StoreError::persistence)
    }
}
