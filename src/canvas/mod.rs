// src/canvas/mod.rs
// Read-through bridge to an external Canvas-style LMS.

pub mod cache;
pub mod client;
pub mod store;
pub mod types;

pub use cache::SessionTiers;
pub use client::{CanvasClient, CanvasError};
pub use store::CanvasSessionStore;
pub use types::{CanvasAssignment, CanvasCourse, CanvasCredentials, CanvasProfile};
