pub mod client;
pub mod models;

pub use client::{DEFAULT_BASE_URL, PostsClient};
pub use models::{Post, User};
