pub mod filter;
pub mod item;
pub mod priority;
pub mod request;

pub use filter::Filter;
pub use item::{Origin, Todo};
pub use priority::Priority;
pub use request::{CreateTodoRequest, UpdateTodoRequest};
