use super::actions::Action;
use crate::error::{StoreError, StoreResult};
use crate::storage::TodoRepository;
use crate::todo::{Todo, UpdateTodoRequest};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Failure message emitted by an effect that was cancelled before settling.
pub const CANCELLED_MESSAGE: &str = "Operation cancelled";

/// Turns request actions into repository calls and feeds the outcome back as
/// success/failure actions.
///
/// Effects never touch state. Concurrent requests are neither deduplicated nor
/// serialized; whichever resolves last wins at the reducer.
pub struct EffectCoordinator {
    repository: Arc<TodoRepository>,
    results: mpsc::UnboundedSender<Action>,
    root: CancellationToken,
}

/// One in-flight effect.
#[derive(Debug)]
pub struct EffectHandle {
    name: &'static str,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl EffectHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop waiting on the operation. A cancelled effect emits the matching
    /// failure action, and leaves the repository untouched unless the write
    /// had already been applied.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        let _ = self.task.await;
    }
}

impl EffectCoordinator {
    pub fn new(repository: Arc<TodoRepository>, results: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            repository,
            results,
            root: CancellationToken::new(),
        }
    }

    pub fn repository(&self) -> &Arc<TodoRepository> {
        &self.repository
    }

    /// Spawn the effect for `action`, if it has one.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn handle(&self, action: &Action) -> Option<EffectHandle> {
        if !action.is_request() {
            return None;
        }

        let name = action.name();
        let token = self.root.child_token();
        let task_token = token.clone();
        let repository = Arc::clone(&self.repository);
        let results = self.results.clone();
        let action = action.clone();

        debug!(effect = name, "Spawning effect");
        let task = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    debug!(effect = name, "Effect cancelled");
                    if let Some(failure) = action.failure(CANCELLED_MESSAGE) {
                        let _ = results.send(failure);
                    }
                }
                outcome = run_effect(&repository, action.clone()) => {
                    if let Some(outcome) = outcome {
                        trace!(effect = name, result = outcome.name(), "Effect settled");
                        if results.send(outcome).is_err() {
                            debug!(effect = name, "Result dropped, store is gone");
                        }
                    }
                }
            }
        });

        Some(EffectHandle { name, token, task })
    }

    /// Cancel every effect still in flight.
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

/// The effect body: run the repository call for a request action and return
/// the action describing how it ended. Non-request actions yield `None`.
pub async fn run_effect(repository: &TodoRepository, action: Action) -> Option<Action> {
    let outcome = match action {
        Action::LoadTodos => Action::LoadTodosSuccess(repository.list().await),

        Action::CreateTodo(request) => match repository.create(request).await {
            Ok(todo) => Action::CreateTodoSuccess(todo),
            Err(e) => Action::CreateTodoFailure(e.to_string()),
        },

        Action::UpdateTodo(request) => match repository.update(request).await {
            Ok(todo) => Action::UpdateTodoSuccess(todo),
            Err(e) => Action::UpdateTodoFailure(e.to_string()),
        },

        Action::DeleteTodo(id) => match repository.delete(id).await {
            Ok(()) => Action::DeleteTodoSuccess(id),
            Err(e) => Action::DeleteTodoFailure(e.to_string()),
        },

        Action::ToggleTodo(id) => match toggle(repository, id).await {
            Ok(todo) => Action::ToggleTodoSuccess(todo),
            Err(e) => Action::ToggleTodoFailure(e.to_string()),
        },

        _ => return None,
    };
    Some(outcome)
}

/// Read, invert, write. A missing todo short-circuits before any update.
async fn toggle(repository: &TodoRepository, id: u64) -> StoreResult<Todo> {
    let current = repository.get(id).await.ok_or(StoreError::NotFound)?;
    repository
        .update(UpdateTodoRequest {
            completed: Some(!current.completed),
            ..UpdateTodoRequest::new(id)
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Latency, MemoryKeyValueStore, PersistenceGateway};
    use crate::store::StoreRuntime;
    use crate::todo::{CreateTodoRequest, Filter, Priority};

    fn repo_with_latency(latency: Latency) -> Arc<TodoRepository> {
        let gateway = PersistenceGateway::new(Box::new(MemoryKeyValueStore::new()));
        Arc::new(TodoRepository::open(gateway, latency))
    }

    fn repo() -> Arc<TodoRepository> {
        repo_with_latency(Latency::none())
    }

    #[tokio::test]
    async fn test_load_effect() {
        let repo = repo();
        let outcome = run_effect(&repo, Action::LoadTodos).await;
        match outcome {
            Some(Action::LoadTodosSuccess(todos)) => assert_eq!(todos.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_effect() {
        let repo = repo();
        let outcome = run_effect(
            &repo,
            Action::CreateTodo(CreateTodoRequest::new("X", Priority::Low)),
        )
        .await;
        match outcome {
            Some(Action::CreateTodoSuccess(todo)) => {
                assert_eq!(todo.id, 4);
                assert_eq!(todo.title, "X");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_effect_validation_failure() {
        let repo = repo();
        let outcome = run_effect(
            &repo,
            Action::CreateTodo(CreateTodoRequest::new("", Priority::Low)),
        )
        .await;
        assert!(matches!(outcome, Some(Action::CreateTodoFailure(_))));
    }

    #[tokio::test]
    async fn test_update_missing_fails_with_message() {
        let repo = repo();
        let outcome = run_effect(&repo, Action::UpdateTodo(UpdateTodoRequest::new(99))).await;
        assert_eq!(outcome, Some(Action::UpdateTodoFailure("Todo not found".into())));
    }

    #[tokio::test]
    async fn test_delete_effect_echoes_id() {
        let repo = repo();
        assert_eq!(
            run_effect(&repo, Action::DeleteTodo(2)).await,
            Some(Action::DeleteTodoSuccess(2))
        );
        assert_eq!(
            run_effect(&repo, Action::DeleteTodo(2)).await,
            Some(Action::DeleteTodoFailure("Todo not found".into()))
        );
    }

    #[tokio::test]
    async fn test_toggle_inverts_completed() {
        let repo = repo();
        let outcome = run_effect(&repo, Action::ToggleTodo(2)).await;
        match outcome {
            Some(Action::ToggleTodoSuccess(todo)) => {
                assert_eq!(todo.id, 2);
                assert!(!todo.completed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_toggle_missing_short_circuits() {
        let repo = repo();
        let before = repo.snapshot();
        let outcome = run_effect(&repo, Action::ToggleTodo(42)).await;
        assert_eq!(outcome, Some(Action::ToggleTodoFailure("Todo not found".into())));
        assert_eq!(repo.snapshot(), before);
    }

    #[tokio::test]
    async fn test_non_requests_have_no_effect() {
        let repo = repo();
        assert_eq!(run_effect(&repo, Action::SetFilter(Filter::Active)).await, None);
        assert_eq!(run_effect(&repo, Action::DeleteTodoSuccess(1)).await, None);

        let (tx, _rx) = mpsc::unbounded_channel();
        let coordinator = EffectCoordinator::new(repo, tx);
        assert!(coordinator.handle(&Action::SetSearchTerm("x".into())).is_none());
    }

    #[tokio::test]
    async fn test_handle_sends_result_on_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let coordinator = EffectCoordinator::new(repo(), tx);

        let handle = coordinator.handle(&Action::DeleteTodo(1)).unwrap();
        assert_eq!(handle.name(), "[Todo] Delete Todo");
        handle.join().await;

        assert_eq!(rx.recv().await, Some(Action::DeleteTodoSuccess(1)));
    }

    #[tokio::test]
    async fn test_cancelled_effect_emits_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let coordinator = EffectCoordinator::new(repo_with_latency(Latency::from_millis(5_000)), tx);

        let handle = coordinator.handle(&Action::LoadTodos).unwrap();
        handle.cancel();
        handle.join().await;

        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::LoadTodosFailure(CANCELLED_MESSAGE.into()))
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_effects() {
        let repo = repo_with_latency(Latency::from_millis(5_000));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let coordinator = EffectCoordinator::new(Arc::clone(&repo), tx);

        let a = coordinator.handle(&Action::LoadTodos).unwrap();
        let b = coordinator.handle(&Action::ToggleTodo(1)).unwrap();
        coordinator.shutdown();
        a.join().await;
        b.join().await;

        let mut results = vec![rx.try_recv().unwrap(), rx.try_recv().unwrap()];
        results.sort_by_key(|r| r.name());
        assert_eq!(
            results,
            vec![
                Action::LoadTodosFailure(CANCELLED_MESSAGE.into()),
                Action::ToggleTodoFailure(CANCELLED_MESSAGE.into()),
            ]
        );
        assert!(rx.try_recv().is_err());
        assert!(!repo.snapshot()[0].completed);
    }

    #[tokio::test]
    async fn test_cancelled_create_keeps_store_and_repository_in_step() {
        let repo = repo_with_latency(Latency::from_millis(200));
        let mut runtime = StoreRuntime::new(Arc::clone(&repo));

        let handle = runtime
            .dispatch(Action::CreateTodo(CreateTodoRequest::new("X", Priority::Low)))
            .unwrap();
        assert!(runtime.state().loading);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        handle.cancel();
        handle.join().await;

        assert_eq!(
            runtime.settle().await,
            Some(Action::CreateTodoFailure(CANCELLED_MESSAGE.into()))
        );
        let state = runtime.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(CANCELLED_MESSAGE));
        assert_eq!(repo.snapshot().len(), 3);
        assert!(repo.snapshot().iter().all(|t| t.title != "X"));
    }
}
