use super::gateway::PersistenceGateway;
use crate::error::{StoreError, StoreResult};
use crate::todo::{CreateTodoRequest, Origin, Priority, Todo, UpdateTodoRequest};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

/// Artificial delay applied at the start of each repository call, before the
/// list is read or changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    pub list: Duration,
    pub get: Duration,
    pub write: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self::default()
    }

    /// `ms` for list and writes, two thirds of it for single-item reads.
    pub fn from_millis(ms: u64) -> Self {
        Self {
            list: Duration::from_millis(ms),
            get: Duration::from_millis(ms / 3 * 2 + ms % 3 * 2 / 3),
            write: Duration::from_millis(ms),
        }
    }
}

/// Owns the canonical in-memory todo list.
///
/// Every mutation is written through the persistence gateway before the call
/// resolves. The lock is only held for the synchronous mutate-and-save step,
/// which runs after the last await so a dropped call never half-commits.
pub struct TodoRepository {
    todos: Mutex<Vec<Todo>>,
    gateway: PersistenceGateway,
    latency: Latency,
}

impl TodoRepository {
    /// Load the persisted list, seeding a starter list when it is empty.
    pub fn open(gateway: PersistenceGateway, latency: Latency) -> Self {
        let mut todos = gateway.load();
        if todos.is_empty() {
            todos = seed_todos();
            gateway.save(&todos);
            info!(count = todos.len(), "Seeded starter todos");
        }
        Self {
            todos: Mutex::new(todos),
            gateway,
            latency,
        }
    }

    /// Load the persisted list as-is, without seeding.
    pub fn open_unseeded(gateway: PersistenceGateway, latency: Latency) -> Self {
        let todos = gateway.load();
        Self {
            todos: Mutex::new(todos),
            gateway,
            latency,
        }
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        self.lock().clone()
    }

    pub async fn list(&self) -> Vec<Todo> {
        tokio::time::sleep(self.latency.list).await;
        self.snapshot()
    }

    pub async fn get(&self, id: u64) -> Option<Todo> {
        tokio::time::sleep(self.latency.get).await;
        self.lock().iter().find(|t| t.id == id).cloned()
    }

    pub async fn create(&self, request: CreateTodoRequest) -> StoreResult<Todo> {
        if request.title.trim().is_empty() {
            return Err(StoreError::validation("Title must not be empty"));
        }

        tokio::time::sleep(self.latency.write).await;
        let todo = {
            let mut todos = self.lock();
            let id = next_id(&todos);
            let todo = Todo::from_request(id, &request, Utc::now());
            todos.push(todo.clone());
            self.gateway.save(&todos);
            todo
        };
        debug!(id = todo.id, "Created todo");
        Ok(todo)
    }

    pub async fn update(&self, request: UpdateTodoRequest) -> StoreResult<Todo> {
        if request.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(StoreError::validation("Title must not be empty"));
        }

        tokio::time::sleep(self.latency.write).await;
        let todo = {
            let mut todos = self.lock();
            let slot = todos
                .iter_mut()
                .find(|t| t.id == request.id)
                .ok_or(StoreError::NotFound)?;
            *slot = slot.merged(&request, Utc::now());
            let todo = slot.clone();
            self.gateway.save(&todos);
            todo
        };
        debug!(id = todo.id, "Updated todo");
        Ok(todo)
    }

    pub async fn delete(&self, id: u64) -> StoreResult<()> {
        tokio::time::sleep(self.latency.write).await;
        {
            let mut todos = self.lock();
            let index = todos
                .iter()
                .position(|t| t.id == id)
                .ok_or(StoreError::NotFound)?;
            todos.remove(index);
            self.gateway.save(&todos);
        }
        debug!(id, "Deleted todo");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Todo>> {
        // The list is always left consistent between statements, so a
        // poisoned lock still guards valid data.
        self.todos.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One past the largest id in use, or 1 for an empty list.
pub fn next_id(todos: &[Todo]) -> u64 {
    todos.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

fn seed_todos() -> Vec<Todo> {
    let now = Utc::now();
    let seeds = [
        (
            "Plan the week",
            "Block out focus time for the big items",
            Priority::High,
            false,
        ),
        (
            "Wire up the store",
            "Actions, reducer, effects and selectors",
            Priority::Medium,
            true,
        ),
        (
            "Tidy the backlog",
            "Close stale items and merge duplicates",
            Priority::Low,
            false,
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, (title, description, priority, completed))| {
            let request = CreateTodoRequest::new(title, priority)
                .with_description(description)
                .with_origin(Origin::Manual);
            let mut todo = Todo::from_request(i as u64 + 1, &request, now);
            todo.completed = completed;
            todo
        })
        .collect()
}
