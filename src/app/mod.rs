pub mod event;
pub mod form;
pub mod mode;
pub mod state;

pub use state::AppState;
