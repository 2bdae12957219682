//! Derived views over [`TodoState`].
//!
//! The free functions are the projections themselves. [`Selectors`] wraps them
//! with single-entry caches so that a consumer asking for the same view twice
//! gets the same `Arc` back until one of that view's inputs changes.

use super::reducer::TodoState;
use crate::todo::{Filter, Priority, Todo};
use std::sync::Arc;

/// Todos bucketed by priority, each bucket in list order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PriorityGroups {
    pub high: Vec<Todo>,
    pub medium: Vec<Todo>,
    pub low: Vec<Todo>,
}

impl PriorityGroups {
    pub fn get(&self, priority: Priority) -> &[Todo] {
        match priority {
            Priority::High => &self.high,
            Priority::Medium => &self.medium,
            Priority::Low => &self.low,
        }
    }
}

/// Status filter first, then search within what is left.
///
/// A blank (or whitespace-only) search term matches everything.
pub fn filter_todos(todos: &[Todo], filter: Filter, search_term: &str) -> Vec<Todo> {
    let needle = search_term.trim().to_lowercase();
    todos
        .iter()
        .filter(|t| filter.accepts(t.completed))
        .filter(|t| needle.is_empty() || t.matches_search(&needle))
        .cloned()
        .collect()
}

pub fn completed_todos(todos: &[Todo]) -> Vec<Todo> {
    todos.iter().filter(|t| t.completed).cloned().collect()
}

pub fn active_todos(todos: &[Todo]) -> Vec<Todo> {
    todos.iter().filter(|t| !t.completed).cloned().collect()
}

pub fn count_completed(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| t.completed).count()
}

pub fn count_active(todos: &[Todo]) -> usize {
    todos.len() - count_completed(todos)
}

pub fn group_by_priority(todos: &[Todo]) -> PriorityGroups {
    let mut groups = PriorityGroups::default();
    for todo in todos {
        match todo.priority {
            Priority::High => groups.high.push(todo.clone()),
            Priority::Medium => groups.medium.push(todo.clone()),
            Priority::Low => groups.low.push(todo.clone()),
        }
    }
    groups
}

/// Single-entry cache keyed by structural equality of its inputs.
#[derive(Debug)]
pub struct Memo<K, V> {
    last: Option<(K, Arc<V>)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> Arc<V> {
        if let Some((last_key, value)) = &self.last
            && *last_key == key
        {
            return Arc::clone(value);
        }
        let value = Arc::new(compute(&key));
        self.last = Some((key, Arc::clone(&value)));
        value
    }
}

type FilterKey = (Arc<Vec<Todo>>, Filter, String);

/// Memoized selector set. Keep one per consumer.
#[derive(Debug, Default)]
pub struct Selectors {
    filtered: Memo<FilterKey, Vec<Todo>>,
    completed: Memo<Arc<Vec<Todo>>, Vec<Todo>>,
    active: Memo<Arc<Vec<Todo>>, Vec<Todo>>,
    by_priority: Memo<Arc<Vec<Todo>>, PriorityGroups>,
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filtered_todos(&mut self, state: &TodoState) -> Arc<Vec<Todo>> {
        let key = (
            Arc::clone(&state.todos),
            state.filter,
            state.search_term.clone(),
        );
        self.filtered
            .get_or_compute(key, |(todos, filter, term)| filter_todos(todos, *filter, term))
    }

    pub fn completed_todos(&mut self, state: &TodoState) -> Arc<Vec<Todo>> {
        self.completed
            .get_or_compute(Arc::clone(&state.todos), |todos| completed_todos(todos))
    }

    pub fn active_todos(&mut self, state: &TodoState) -> Arc<Vec<Todo>> {
        self.active
            .get_or_compute(Arc::clone(&state.todos), |todos| active_todos(todos))
    }

    pub fn todos_count(&self, state: &TodoState) -> usize {
        state.todos.len()
    }

    pub fn completed_count(&mut self, state: &TodoState) -> usize {
        self.completed_todos(state).len()
    }

    pub fn active_count(&mut self, state: &TodoState) -> usize {
        self.active_todos(state).len()
    }

    pub fn todos_by_priority(&mut self, state: &TodoState) -> Arc<PriorityGroups> {
        self.by_priority
            .get_or_compute(Arc::clone(&state.todos), |todos| group_by_priority(todos))
    }
}
