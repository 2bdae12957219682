//! Unidirectional state container for the todo list.
//!
//! ```text
//! UI ──dispatch(Action)──► reduce ──► TodoState ──► Selectors ──► UI
//!          │                  ▲
//!          ▼                  │ success / failure Action
//!   EffectCoordinator ──► TodoRepository
//! ```

pub mod actions;
pub mod effects;
pub mod reducer;
pub mod runtime;
pub mod selectors;

pub use actions::Action;
pub use effects::{EffectCoordinator, EffectHandle, run_effect};
pub use reducer::{TodoState, reduce};
pub use runtime::StoreRuntime;
pub use selectors::{PriorityGroups, Selectors};

use tracing::debug;

/// Owner of the current [`TodoState`]. The only place state is replaced.
#[derive(Debug, Default)]
pub struct Store {
    state: TodoState,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: TodoState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    /// Cheap copy of the current state; the todo list is shared, not cloned.
    pub fn snapshot(&self) -> TodoState {
        self.state.clone()
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!(action = action.name(), "Dispatch");
        if let Some(message) = action.failure_message() {
            tracing::error!(action = action.name(), error = message, "Operation failed");
        }
        self.state = reduce(&self.state, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::Filter;

    #[test]
    fn test_dispatch_replaces_state() {
        let mut store = Store::new();
        let before = store.snapshot();
        store.dispatch(Action::SetFilter(Filter::Active));
        assert_eq!(store.state().filter, Filter::Active);
        assert_eq!(before.filter, Filter::All, "earlier snapshots stay valid");
    }
}
