use super::form::TodoForm;
use super::mode::Mode;
use crate::ui::theme::Theme;
use std::sync::Arc;
use std::time::Instant;
use todo_store::api::PostsClient;
use todo_store::import::{self, DragPayload, ImportPanel, PostsLoaded};
use todo_store::store::{Action, EffectCoordinator, EffectHandle, Selectors, Store, TodoState};
use todo_store::toast::ToastService;
use todo_store::todo::{Origin, Todo, UpdateTodoRequest};
use todo_store::utils::unicode::TextField;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Everything the terminal surface needs. Todos are never copied in here;
/// every view goes through `selectors` over `store`.
pub struct AppState {
    pub store: Store,
    pub selectors: Selectors,
    pub effects: EffectCoordinator,
    pub toasts: ToastService,
    pub import: ImportPanel,
    pub theme: Theme,
    pub mode: Mode,
    pub cursor: usize,
    pub form: TodoForm,
    pub search: TextField,
    pub pending_delete: Option<u64>,
    pub show_help: bool,
    pub should_quit: bool,
    posts_client: PostsClient,
    posts_tx: mpsc::UnboundedSender<PostsLoaded>,
    in_flight: Vec<EffectHandle>,
}

impl AppState {
    pub fn new(
        effects: EffectCoordinator,
        toasts: ToastService,
        import: ImportPanel,
        posts_client: PostsClient,
        posts_tx: mpsc::UnboundedSender<PostsLoaded>,
        theme: Theme,
    ) -> Self {
        Self {
            store: Store::new(),
            selectors: Selectors::new(),
            effects,
            toasts,
            import,
            theme,
            mode: Mode::Navigate,
            cursor: 0,
            form: TodoForm::default(),
            search: TextField::new(),
            pending_delete: None,
            show_help: false,
            should_quit: false,
            posts_client,
            posts_tx,
            in_flight: Vec::new(),
        }
    }

    pub fn todo_state(&self) -> &TodoState {
        self.store.state()
    }

    /// Reduce a user intent and start its effect.
    pub fn dispatch(&mut self, action: Action) {
        self.in_flight.retain(|handle| !handle.is_finished());
        if let Some(handle) = self.effects.handle(&action) {
            self.in_flight.push(handle);
        }
        self.store.dispatch(action);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Apply an effect result and surface it as a toast.
    pub fn apply_result(&mut self, action: Action) {
        match &action {
            Action::CreateTodoSuccess(todo) if todo.origin == Some(Origin::Api) => {
                self.toasts.success("Task created from post");
            }
            Action::CreateTodoSuccess(_) => {
                self.toasts.success("Task added");
            }
            Action::UpdateTodoSuccess(_) => {
                self.toasts.success("Task updated");
            }
            Action::ToggleTodoSuccess(todo) => {
                if todo.completed {
                    self.toasts.success("Task completed");
                } else {
                    self.toasts.info("Task reopened");
                }
            }
            Action::DeleteTodoSuccess(_) => {
                self.toasts.warning("Task deleted");
            }
            other => {
                if let Some(message) = other.failure_message() {
                    self.toasts.error(message);
                }
            }
        }
        self.store.dispatch(action);
        self.clamp_cursor();
    }

    pub fn apply_posts(&mut self, loaded: PostsLoaded) {
        if loaded.result.is_err() && loaded.page == self.import.current_page() {
            self.toasts.error(import::LOAD_ERROR_MESSAGE);
        }
        self.import.finish_load(loaded);
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.expire(now);
    }

    pub fn shutdown(&mut self) {
        self.effects.shutdown();
        self.in_flight.clear();
    }

    pub fn visible_todos(&mut self) -> Arc<Vec<Todo>> {
        self.selectors.filtered_todos(self.store.state())
    }

    pub fn selected_todo(&mut self) -> Option<Todo> {
        self.visible_todos().get(self.cursor).cloned()
    }

    pub fn move_cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.visible_todos().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_todos().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn reload(&mut self) {
        self.dispatch(Action::LoadTodos);
    }

    pub fn open_add_form(&mut self) {
        self.form = TodoForm::default();
        self.mode = Mode::Add;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(todo) = self.selected_todo() {
            self.form = TodoForm::for_edit(&todo);
            self.mode = Mode::Edit;
        }
    }

    /// Submit the add form or the edit modal. An invalid form stays open.
    pub fn submit_form(&mut self) {
        let action = match self.mode {
            Mode::Add => self.form.to_create_request().map(Action::CreateTodo),
            Mode::Edit => self.form.to_update_request().map(Action::UpdateTodo),
            _ => None,
        };
        if let Some(action) = action {
            self.dispatch(action);
            self.close_form();
        }
    }

    pub fn close_form(&mut self) {
        self.form = TodoForm::default();
        self.mode = Mode::Navigate;
    }

    pub fn toggle_selected(&mut self) {
        if let Some(todo) = self.selected_todo() {
            self.dispatch(Action::ToggleTodo(todo.id));
        }
    }

    pub fn set_selected_priority_next(&mut self) {
        if let Some(todo) = self.selected_todo() {
            self.dispatch(Action::UpdateTodo(UpdateTodoRequest {
                priority: Some(todo.priority.next()),
                ..UpdateTodoRequest::new(todo.id)
            }));
        }
    }

    pub fn request_delete_selected(&mut self) {
        if let Some(todo) = self.selected_todo() {
            self.pending_delete = Some(todo.id);
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn pending_delete_title(&self) -> Option<&str> {
        let id = self.pending_delete?;
        self.store
            .state()
            .todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.as_str())
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete.take() {
            self.dispatch(Action::DeleteTodo(id));
        }
        self.mode = Mode::Navigate;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }

    pub fn cycle_filter(&mut self) {
        let next = self.store.state().filter.next();
        self.dispatch(Action::SetFilter(next));
        self.clamp_cursor();
    }

    pub fn enter_search(&mut self) {
        self.search = TextField::with_value(self.store.state().search_term.clone());
        self.mode = Mode::Search;
    }

    /// Push the search buffer into the store after every keystroke.
    pub fn sync_search(&mut self) {
        if self.search.value() != self.store.state().search_term {
            self.dispatch(Action::SetSearchTerm(self.search.value().to_string()));
            self.cursor = 0;
        }
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.sync_search();
        self.mode = Mode::Navigate;
    }

    /// One delete per completed todo.
    pub fn clear_completed(&mut self) {
        let completed = self.selectors.completed_todos(self.store.state());
        if completed.is_empty() {
            self.toasts.info("No completed tasks");
            return;
        }
        info!(count = completed.len(), "Clearing completed todos");
        for todo in completed.iter() {
            self.dispatch(Action::DeleteTodo(todo.id));
        }
    }

    pub fn open_import(&mut self) {
        self.mode = Mode::Import;
        if !self.import.is_loaded() && !self.import.loading {
            self.load_posts_page(1);
        }
    }

    pub fn load_posts_page(&mut self, page: usize) {
        debug!(page, "Loading posts page");
        self.import.begin_load(page);
        import::spawn_fetch(self.posts_client.clone(), page, self.posts_tx.clone());
    }

    pub fn next_posts_page(&mut self) {
        if let Some(page) = self.import.next_page() {
            self.load_posts_page(page);
        }
    }

    pub fn previous_posts_page(&mut self) {
        if let Some(page) = self.import.previous_page() {
            self.load_posts_page(page);
        }
    }

    pub fn go_to_posts_page(&mut self, page: usize) {
        if let Some(page) = self.import.go_to_page(page) {
            self.load_posts_page(page);
        }
    }

    pub fn import_selected(&mut self) {
        let requests = self.import.import_selected();
        if requests.is_empty() {
            return;
        }
        info!(count = requests.len(), "Importing posts");
        for request in requests {
            self.dispatch(Action::CreateTodo(request));
        }
    }

    /// Drop the highlighted post onto the list.
    pub fn drop_highlighted_post(&mut self) {
        let Some(post_id) = self.import.highlighted().map(|p| p.id()) else {
            return;
        };
        match self.import.drag_payload(post_id) {
            Some(payload) => self.drop_payload(&payload),
            None => {
                self.toasts.error("Could not create a task from this post");
            }
        }
    }

    pub fn drop_payload(&mut self, payload: &DragPayload) {
        match payload.parse() {
            Ok(Some(dropped)) => {
                self.dispatch(Action::CreateTodo(dropped.request));
                if let Some(post_id) = dropped.post_id {
                    self.import.remove_post(post_id);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Rejected drop payload");
                self.toasts.error("Could not create a task from the dropped post");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use todo_store::api::Post;
    use todo_store::import::JSON_FORMAT;
    use todo_store::storage::{Latency, MemoryKeyValueStore, PersistenceGateway, TodoRepository};
    use todo_store::todo::{Filter, Priority};
    use todo_store::toast::ToastKind;

    pub(crate) struct Harness {
        pub state: AppState,
        pub results: mpsc::UnboundedReceiver<Action>,
        pub posts: mpsc::UnboundedReceiver<PostsLoaded>,
    }

    impl Harness {
        pub(crate) fn new() -> Self {
            let gateway = PersistenceGateway::new(Box::new(MemoryKeyValueStore::new()));
            let repository = Arc::new(TodoRepository::open(gateway, Latency::none()));
            let (tx, results) = mpsc::unbounded_channel();
            let (posts_tx, posts) = mpsc::unbounded_channel();
            let client = PostsClient::new("http://127.0.0.1:9").unwrap();
            let state = AppState::new(
                EffectCoordinator::new(repository, tx),
                ToastService::default(),
                ImportPanel::default(),
                client,
                posts_tx,
                Theme::default(),
            );
            Self {
                state,
                results,
                posts,
            }
        }

        pub(crate) async fn loaded() -> Self {
            let mut harness = Self::new();
            harness.state.reload();
            harness.settle(1).await;
            harness
        }

        /// Apply the next `n` effect results.
        pub(crate) async fn settle(&mut self, n: usize) {
            for _ in 0..n {
                let action = self.results.recv().await.unwrap();
                self.state.apply_result(action);
            }
        }

        pub(crate) fn last_toast(&self) -> Option<(ToastKind, String)> {
            self.state
                .toasts
                .toasts()
                .last()
                .map(|t| (t.kind, t.message.clone()))
        }

        pub(crate) fn seed_import_page(&mut self) {
            let posts = (1..=12)
                .map(|id| Post {
                    id,
                    title: format!("post {id}"),
                    body: "b".repeat(150),
                    user_id: 1,
                })
                .collect();
            self.state.import.begin_load(1);
            self.state.apply_posts(PostsLoaded {
                page: 1,
                result: Ok(posts),
            });
        }
    }

    fn titles(state: &mut AppState) -> Vec<String> {
        state.visible_todos().iter().map(|t| t.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_reload_shows_seeded_items() {
        let mut h = Harness::loaded().await;
        assert_eq!(
            titles(&mut h.state),
            vec!["Plan the week", "Wire up the store", "Tidy the backlog"]
        );
        assert!(!h.state.todo_state().loading);
    }

    #[tokio::test]
    async fn test_add_form_dispatches_and_toasts() {
        let mut h = Harness::loaded().await;
        h.state.open_add_form();
        h.state.form.title = TextField::with_value("Buy milk");
        h.state.submit_form();
        assert_eq!(h.state.mode, Mode::Navigate);
        assert!(h.state.todo_state().loading);

        h.settle(1).await;
        assert_eq!(h.last_toast(), Some((ToastKind::Success, "Task added".into())));
        let last = h.state.todo_state().todos.last().cloned().unwrap();
        assert_eq!(last.title, "Buy milk");
        assert_eq!(last.origin, Some(Origin::Manual));
    }

    #[tokio::test]
    async fn test_blank_add_form_stays_open() {
        let mut h = Harness::loaded().await;
        h.state.open_add_form();
        h.state.submit_form();
        assert_eq!(h.state.mode, Mode::Add);
        assert!(!h.state.todo_state().loading);
    }

    #[tokio::test]
    async fn test_toggle_selected_toasts_completion() {
        let mut h = Harness::loaded().await;
        h.state.toggle_selected();
        h.settle(1).await;
        assert!(h.state.todo_state().todos[0].completed);
        assert_eq!(h.last_toast(), Some((ToastKind::Success, "Task completed".into())));

        h.state.toggle_selected();
        h.settle(1).await;
        assert_eq!(h.last_toast(), Some((ToastKind::Info, "Task reopened".into())));
    }

    #[tokio::test]
    async fn test_edit_modal_updates_item() {
        let mut h = Harness::loaded().await;
        h.state.move_cursor_down();
        h.state.open_edit_form();
        assert_eq!(h.state.mode, Mode::Edit);
        assert_eq!(h.state.form.target, Some(2));

        h.state.form.title = TextField::with_value("Wire up the reducer");
        h.state.form.priority = Priority::High;
        h.state.submit_form();
        h.settle(1).await;

        let edited = h.state.todo_state().todos[1].clone();
        assert_eq!(edited.title, "Wire up the reducer");
        assert_eq!(edited.priority, Priority::High);
        assert!(edited.completed);
        assert_eq!(h.last_toast(), Some((ToastKind::Success, "Task updated".into())));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut h = Harness::loaded().await;
        h.state.request_delete_selected();
        assert_eq!(h.state.mode, Mode::ConfirmDelete);
        assert_eq!(h.state.pending_delete_title(), Some("Plan the week"));

        h.state.cancel_delete();
        assert!(!h.state.todo_state().loading);

        h.state.request_delete_selected();
        h.state.confirm_delete();
        h.settle(1).await;
        assert_eq!(h.state.todo_state().todos.len(), 2);
        assert_eq!(h.last_toast(), Some((ToastKind::Warning, "Task deleted".into())));
    }

    #[tokio::test]
    async fn test_filter_cycle_and_search_drive_view() {
        let mut h = Harness::loaded().await;
        h.state.cycle_filter();
        assert_eq!(h.state.todo_state().filter, Filter::Active);
        assert_eq!(titles(&mut h.state), vec!["Plan the week", "Tidy the backlog"]);

        h.state.enter_search();
        for c in "TIDY".chars() {
            h.state.search.insert(c);
        }
        h.state.sync_search();
        assert_eq!(titles(&mut h.state), vec!["Tidy the backlog"]);

        h.state.clear_search();
        assert_eq!(h.state.todo_state().search_term, "");
        assert_eq!(h.state.mode, Mode::Navigate);
    }

    #[tokio::test]
    async fn test_clear_completed_deletes_each() {
        let mut h = Harness::loaded().await;
        h.state.clear_completed();
        h.settle(1).await;
        assert!(h.state.todo_state().todos.iter().all(|t| !t.completed));

        h.state.clear_completed();
        assert_eq!(h.last_toast(), Some((ToastKind::Info, "No completed tasks".into())));
    }

    #[tokio::test]
    async fn test_failure_becomes_error_toast() {
        let mut h = Harness::loaded().await;
        h.state.dispatch(Action::ToggleTodo(404));
        h.settle(1).await;
        assert_eq!(h.last_toast(), Some((ToastKind::Error, "Todo not found".into())));
        assert_eq!(h.state.todo_state().error.as_deref(), Some("Todo not found"));
    }

    #[tokio::test]
    async fn test_import_selected_creates_api_todos() {
        let mut h = Harness::loaded().await;
        h.seed_import_page();
        h.state.import.toggle_selection(2);
        h.state.import.toggle_selection(4);
        h.state.import_selected();
        h.settle(2).await;

        let imported: Vec<Todo> = h
            .state
            .todo_state()
            .todos
            .iter()
            .filter(|t| t.origin == Some(Origin::Api))
            .cloned()
            .collect();
        assert_eq!(imported.len(), 2);
        assert!(imported.iter().all(|t| t.description.as_ref().unwrap().ends_with("...")));
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Success, "Task created from post".into()))
        );
    }

    #[tokio::test]
    async fn test_drop_highlighted_post_creates_and_removes() {
        let mut h = Harness::loaded().await;
        h.seed_import_page();
        h.state.import.move_cursor_down();
        h.state.drop_highlighted_post();
        assert_eq!(h.state.import.total_posts(), 11);
        assert!(h.state.import.posts().iter().all(|p| p.id() != 2));

        h.settle(1).await;
        let last = h.state.todo_state().todos.last().cloned().unwrap();
        assert_eq!(last.title, "post 2");
        assert_eq!(last.origin, Some(Origin::Api));
    }

    #[tokio::test]
    async fn test_bad_drop_payload_toasts_error() {
        let mut h = Harness::loaded().await;
        let mut payload = DragPayload::new();
        payload.set_data(JSON_FORMAT, "not json");
        h.state.drop_payload(&payload);
        assert!(matches!(h.last_toast(), Some((ToastKind::Error, _))));
        assert!(!h.state.todo_state().loading);
    }

    #[tokio::test]
    async fn test_posts_failure_toasts_and_sets_panel_error() {
        let mut h = Harness::new();
        h.state.open_import();
        assert!(h.state.import.loading);

        let loaded = h.posts.recv().await.unwrap();
        h.state.apply_posts(loaded);
        assert_eq!(h.state.import.error.as_deref(), Some(import::LOAD_ERROR_MESSAGE));
        assert_eq!(
            h.last_toast(),
            Some((ToastKind::Error, import::LOAD_ERROR_MESSAGE.into()))
        );
    }

    #[tokio::test]
    async fn test_cursor_clamped_after_delete() {
        let mut h = Harness::loaded().await;
        h.state.move_cursor_down();
        h.state.move_cursor_down();
        assert_eq!(h.state.cursor, 2);
        h.state.request_delete_selected();
        h.state.confirm_delete();
        h.settle(1).await;
        assert_eq!(h.state.cursor, 1);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight() {
        let mut h = Harness::loaded().await;
        h.state.reload();
        h.state.shutdown();
        assert_eq!(h.state.in_flight(), 0);
    }
}
