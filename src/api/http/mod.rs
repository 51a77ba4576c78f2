// src/api/http/mod.rs

pub mod assistant;
pub mod auth;
pub mod canvas;
pub mod handlers;
pub mod quests;
pub mod router;
pub mod users;
pub mod voice;
