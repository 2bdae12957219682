use super::actions::Action;
use crate::todo::{Filter, Todo};
use std::sync::Arc;

/// Global todo state. Only [`reduce`] produces new values of it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoState {
    pub todos: Arc<Vec<Todo>>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: Filter,
    pub search_term: String,
}

impl TodoState {
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: Arc::new(todos),
            ..Default::default()
        }
    }
}

/// Pure transition from `state` under `action`.
///
/// The input is never modified. Transitions that leave the list alone share
/// the same `Arc` with the previous state.
pub fn reduce(state: &TodoState, action: Action) -> TodoState {
    match action {
        Action::LoadTodos
        | Action::CreateTodo(_)
        | Action::UpdateTodo(_)
        | Action::DeleteTodo(_)
        | Action::ToggleTodo(_) => TodoState {
            loading: true,
            error: None,
            ..state.clone()
        },

        Action::LoadTodosSuccess(todos) => TodoState {
            todos: Arc::new(todos),
            loading: false,
            ..state.clone()
        },

        Action::CreateTodoSuccess(todo) => {
            let mut todos = Vec::with_capacity(state.todos.len() + 1);
            todos.extend(state.todos.iter().cloned());
            todos.push(todo);
            TodoState {
                todos: Arc::new(todos),
                loading: false,
                ..state.clone()
            }
        }

        Action::UpdateTodoSuccess(todo) | Action::ToggleTodoSuccess(todo) => TodoState {
            todos: Arc::new(
                state
                    .todos
                    .iter()
                    .map(|t| if t.id == todo.id { todo.clone() } else { t.clone() })
                    .collect(),
            ),
            loading: false,
            ..state.clone()
        },

        Action::DeleteTodoSuccess(id) => TodoState {
            todos: Arc::new(state.todos.iter().filter(|t| t.id != id).cloned().collect()),
            loading: false,
            ..state.clone()
        },

        Action::LoadTodosFailure(error)
        | Action::CreateTodoFailure(error)
        | Action::UpdateTodoFailure(error)
        | Action::DeleteTodoFailure(error)
        | Action::ToggleTodoFailure(error) => TodoState {
            error: Some(error),
            loading: false,
            ..state.clone()
        },

        Action::SetFilter(filter) => TodoState {
            filter,
            ..state.clone()
        },

        Action::SetSearchTerm(search_term) => TodoState {
            search_term,
            ..state.clone()
        },
    }
}
