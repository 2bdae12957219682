use super::{Action, EffectCoordinator, EffectHandle, Store, TodoState};
use crate::storage::TodoRepository;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Store, effects and the channel effects report back on, wired together.
///
/// Headless callers (the CLI, tests) use [`StoreRuntime::dispatch_and_settle`].
/// The TUI splits it with [`StoreRuntime::into_parts`] so the result receiver
/// can sit in its own `select!` branch.
pub struct StoreRuntime {
    store: Store,
    effects: EffectCoordinator,
    results: mpsc::UnboundedReceiver<Action>,
}

impl StoreRuntime {
    pub fn new(repository: Arc<TodoRepository>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store: Store::new(),
            effects: EffectCoordinator::new(repository, tx),
            results: rx,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &TodoState {
        self.store.state()
    }

    /// Reduce `action` and start its effect, if any.
    pub fn dispatch(&mut self, action: Action) -> Option<EffectHandle> {
        let handle = self.effects.handle(&action);
        self.store.dispatch(action);
        handle
    }

    /// Wait for the next effect result and reduce it.
    pub async fn settle(&mut self) -> Option<Action> {
        let result = self.results.recv().await?;
        self.store.dispatch(result.clone());
        Some(result)
    }

    /// Dispatch and, for request actions, reduce the next result that arrives
    /// on the shared channel.
    ///
    /// Results are not matched to requests, so this is only for sequential
    /// callers with no other effect in flight. Returns `None` for actions
    /// without an effect.
    pub async fn dispatch_and_settle(&mut self, action: Action) -> Option<Action> {
        self.dispatch(action)?;
        self.settle().await
    }

    pub fn into_parts(self) -> (Store, EffectCoordinator, mpsc::UnboundedReceiver<Action>) {
        (self.store, self.effects, self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Latency, MemoryKeyValueStore, PersistenceGateway};
    use crate::store::Selectors;
    use crate::todo::{CreateTodoRequest, Filter, Priority, UpdateTodoRequest};

    fn runtime() -> StoreRuntime {
        let gateway = PersistenceGateway::new(Box::new(MemoryKeyValueStore::new()));
        StoreRuntime::new(Arc::new(TodoRepository::open(gateway, Latency::none())))
    }

    #[tokio::test]
    async fn test_seeded_create_toggle_scenario() {
        let mut rt = runtime();
        let mut selectors = Selectors::new();

        rt.dispatch_and_settle(Action::LoadTodos).await;
        let ids: Vec<u64> = rt.state().todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let completed_before = selectors.completed_count(rt.state());

        let created = rt
            .dispatch_and_settle(Action::CreateTodo(CreateTodoRequest::new("X", Priority::Low)))
            .await;
        let created = match created {
            Some(Action::CreateTodoSuccess(todo)) => todo,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(created.id, 4);
        assert!(!created.completed);

        let toggled = rt.dispatch_and_settle(Action::ToggleTodo(4)).await;
        match toggled {
            Some(Action::ToggleTodoSuccess(todo)) => assert!(todo.completed),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(selectors.completed_count(rt.state()), completed_before + 1);
        assert!(!rt.state().loading);
    }

    #[tokio::test]
    async fn test_dispatch_and_settle_skips_waiting_without_effect() {
        let mut rt = runtime();
        rt.dispatch_and_settle(Action::LoadTodos).await;

        let result = rt.dispatch_and_settle(Action::SetFilter(Filter::Completed)).await;
        assert_eq!(result, None);
        assert_eq!(rt.state().filter, Filter::Completed);
        assert!(!rt.state().loading);
    }

    #[tokio::test]
    async fn test_loading_is_true_until_settled() {
        let mut rt = runtime();
        rt.dispatch(Action::DeleteTodo(3));
        assert!(rt.state().loading);
        assert_eq!(rt.settle().await, Some(Action::DeleteTodoSuccess(3)));
        assert!(!rt.state().loading);
    }

    #[tokio::test]
    async fn test_toggle_missing_leaves_list_unchanged() {
        let mut rt = runtime();
        rt.dispatch_and_settle(Action::LoadTodos).await;
        let before = rt.state().todos.clone();

        let result = rt.dispatch_and_settle(Action::ToggleTodo(404)).await;
        assert_eq!(result, Some(Action::ToggleTodoFailure("Todo not found".into())));
        assert_eq!(rt.state().error.as_deref(), Some("Todo not found"));
        assert_eq!(*rt.state().todos, *before);
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_request() {
        let mut rt = runtime();
        rt.dispatch_and_settle(Action::DeleteTodo(404)).await;
        assert!(rt.state().error.is_some());

        rt.dispatch(Action::LoadTodos);
        assert_eq!(rt.state().error, None);
        rt.settle().await;
    }

    #[tokio::test]
    async fn test_create_round_trip_through_list() {
        let mut rt = runtime();
        let request = CreateTodoRequest::new("Water plants", Priority::High).with_description("Balcony");
        rt.dispatch_and_settle(Action::CreateTodo(request)).await;
        rt.dispatch_and_settle(Action::LoadTodos).await;

        let found = rt
            .state()
            .todos
            .iter()
            .find(|t| t.title == "Water plants")
            .cloned()
            .unwrap();
        assert_eq!(found.description.as_deref(), Some("Balcony"));
        assert_eq!(found.priority, Priority::High);
        assert!(!found.completed);
    }

    #[tokio::test]
    async fn test_filter_dispatch_has_no_effect() {
        let mut rt = runtime();
        assert!(rt.dispatch(Action::SetFilter(Filter::Completed)).is_none());
        assert_eq!(
            rt.dispatch_and_settle(Action::SetSearchTerm("x".into())).await,
            None
        );
        assert_eq!(rt.state().filter, Filter::Completed);
        assert_eq!(rt.state().search_term, "x");
    }

    #[tokio::test]
    async fn test_delete_then_views() {
        let mut rt = runtime();
        let mut selectors = Selectors::new();
        rt.dispatch_and_settle(Action::LoadTodos).await;

        let total = selectors.todos_count(rt.state());
        let completed = selectors.completed_count(rt.state());
        let active = selectors.active_count(rt.state());

        // id 2 is the seeded completed item
        rt.dispatch_and_settle(Action::DeleteTodo(2)).await;
        assert_eq!(selectors.todos_count(rt.state()), total - 1);
        assert_eq!(selectors.completed_count(rt.state()), completed - 1);
        assert_eq!(selectors.active_count(rt.state()), active);
        assert!(selectors.filtered_todos(rt.state()).iter().all(|t| t.id != 2));
    }

    #[tokio::test]
    async fn test_update_via_runtime() {
        let mut rt = runtime();
        rt.dispatch_and_settle(Action::LoadTodos).await;
        rt.dispatch_and_settle(Action::UpdateTodo(UpdateTodoRequest {
            priority: Some(Priority::Low),
            ..UpdateTodoRequest::new(1)
        }))
        .await;
        let first = &rt.state().todos[0];
        assert_eq!(first.priority, Priority::Low);
    }
}
