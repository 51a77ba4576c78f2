// src/quests/mod.rs

pub mod engine;
pub mod generator;
pub mod prompts;
pub mod store;
pub mod types;

pub use engine::{RespondError, RespondOutcome, SessionEngine};
pub use store::{QuestStore, SessionStore};
pub use types::{Quest, QuestSession, QuestSummary, SessionView, TranscriptTurn};
