// src/users/mod.rs

pub mod leveling;
pub mod store;
pub mod types;

pub use store::UserStore;
pub use types::{TopicProgress, User, UserStats};
