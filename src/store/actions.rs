use crate::todo::{CreateTodoRequest, Filter, Todo, UpdateTodoRequest};

/// Everything that can happen to the todo state.
///
/// Each CRUD verb has a request variant (dispatched by the UI), and a
/// success/failure pair (emitted by effects once the repository settles).
/// Filter and search changes cannot fail and carry only the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadTodos,
    LoadTodosSuccess(Vec<Todo>),
    LoadTodosFailure(String),

    CreateTodo(CreateTodoRequest),
    CreateTodoSuccess(Todo),
    CreateTodoFailure(String),

    UpdateTodo(UpdateTodoRequest),
    UpdateTodoSuccess(Todo),
    UpdateTodoFailure(String),

    DeleteTodo(u64),
    DeleteTodoSuccess(u64),
    DeleteTodoFailure(String),

    ToggleTodo(u64),
    ToggleTodoSuccess(Todo),
    ToggleTodoFailure(String),

    SetFilter(Filter),
    SetSearchTerm(String),
}

impl Action {
    /// Stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::LoadTodos => "[Todo] Load Todos",
            Action::LoadTodosSuccess(_) => "[Todo] Load Todos Success",
            Action::LoadTodosFailure(_) => "[Todo] Load Todos Failure",
            Action::CreateTodo(_) => "[Todo] Create Todo",
            Action::CreateTodoSuccess(_) => "[Todo] Create Todo Success",
            Action::CreateTodoFailure(_) => "[Todo] Create Todo Failure",
            Action::UpdateTodo(_) => "[Todo] Update Todo",
            Action::UpdateTodoSuccess(_) => "[Todo] Update Todo Success",
            Action::UpdateTodoFailure(_) => "[Todo] Update Todo Failure",
            Action::DeleteTodo(_) => "[Todo] Delete Todo",
            Action::DeleteTodoSuccess(_) => "[Todo] Delete Todo Success",
            Action::DeleteTodoFailure(_) => "[Todo] Delete Todo Failure",
            Action::ToggleTodo(_) => "[Todo] Toggle Todo",
            Action::ToggleTodoSuccess(_) => "[Todo] Toggle Todo Success",
            Action::ToggleTodoFailure(_) => "[Todo] Toggle Todo Failure",
            Action::SetFilter(_) => "[Todo] Set Filter",
            Action::SetSearchTerm(_) => "[Todo] Set Search Term",
        }
    }

    /// True for the variants that start I/O.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Action::LoadTodos
                | Action::CreateTodo(_)
                | Action::UpdateTodo(_)
                | Action::DeleteTodo(_)
                | Action::ToggleTodo(_)
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Action::LoadTodosSuccess(_)
                | Action::CreateTodoSuccess(_)
                | Action::UpdateTodoSuccess(_)
                | Action::DeleteTodoSuccess(_)
                | Action::ToggleTodoSuccess(_)
        )
    }

    /// The error message, for failure variants.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Action::LoadTodosFailure(e)
            | Action::CreateTodoFailure(e)
            | Action::UpdateTodoFailure(e)
            | Action::DeleteTodoFailure(e)
            | Action::ToggleTodoFailure(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure_message().is_some()
    }

    /// The failure variant that answers this request.
    pub fn failure(&self, message: impl Into<String>) -> Option<Action> {
        let message = message.into();
        match self {
            Action::LoadTodos => Some(Action::LoadTodosFailure(message)),
            Action::CreateTodo(_) => Some(Action::CreateTodoFailure(message)),
            Action::UpdateTodo(_) => Some(Action::UpdateTodoFailure(message)),
            Action::DeleteTodo(_) => Some(Action::DeleteTodoFailure(message)),
            Action::ToggleTodo(_) => Some(Action::ToggleTodoFailure(message)),
            _ => None,
        }
    }
}
