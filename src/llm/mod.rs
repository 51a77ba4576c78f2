// src/llm/mod.rs

pub mod client;
pub mod extract;

pub use client::{ChatMessage, ChatProvider, OpenAIClient};
