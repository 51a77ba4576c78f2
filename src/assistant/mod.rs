// src/assistant/mod.rs

pub mod interpreter;
pub mod prompts;

pub use interpreter::{AssistantContext, AssistantInterpreter, QuestContext};
