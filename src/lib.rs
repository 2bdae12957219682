//! A todo list driven by a single store: actions are reduced into state,
//! side effects run as tasks against a repository, and views are derived
//! through memoized selectors.

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod storage;
pub mod store;
pub mod toast;
pub mod todo;
pub mod utils;
