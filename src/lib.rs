// src/lib.rs
// Gamified voice-tutoring backend: quest catalog, XP/levels/streaks,
// LLM-graded tutoring sessions, a voice assistant, speech synthesis, and a
// Canvas LMS bridge, all over SQLite.

pub mod achievements;
pub mod api;
pub mod assistant;
pub mod cache;
pub mod canvas;
pub mod config;
pub mod db;
pub mod llm;
pub mod quests;
pub mod state;
pub mod tts;
pub mod users;
