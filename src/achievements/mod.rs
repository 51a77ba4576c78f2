// src/achievements/mod.rs

pub mod store;

pub use store::{Achievement, AchievementStore, AchievementView, UnlockedAchievement};
