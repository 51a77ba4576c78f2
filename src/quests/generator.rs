// src/quests/generator.rs
// Custom quest creation: provider-generated metadata, assignment-aware
// persona, then a ready-to-use session via the engine's start step.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use super::engine::{RespondError, SessionEngine};
use super::prompts;
use super::store::QuestStore;
use super::types::{QuestSummary, SessionView};
use crate::canvas::types::CanvasAssignment;
use crate::llm::extract::extract_json;
use crate::llm::{ChatMessage, ChatProvider};
use crate::users::User;

/// Difficulty -> (xp reward, estimated minutes). Unknown difficulties get
/// the intermediate values.
fn difficulty_rewards(difficulty: &str) -> (i64, i64) {
    match difficulty {
        "beginner" => (50, 5),
        "intermediate" => (75, 7),
        "advanced" => (100, 10),
        _ => (75, 7),
    }
}

/// Whether an assignment textually matches the study topic: topic as a
/// substring of the name, course, or description, or any topic word longer
/// than 3 characters appearing in the name.
fn assignment_matches(topic_lower: &str, assignment: &CanvasAssignment) -> bool {
    let name = assignment.name_or_default().to_lowercase();
    let course = assignment.course_name_or_default().to_lowercase();
    let description = assignment
        .description
        .as_deref()
        .unwrap_or("")
        .to_lowercase();

    name.contains(topic_lower)
        || course.contains(topic_lower)
        || description.contains(topic_lower)
        || topic_lower
            .split_whitespace()
            .any(|word| word.len() > 3 && name.contains(word))
}

pub fn matching_assignments<'a>(
    topic: &str,
    assignments: &'a [CanvasAssignment],
) -> Vec<&'a CanvasAssignment> {
    let topic_lower = topic.to_lowercase();
    assignments
        .iter()
        .filter(|a| assignment_matches(&topic_lower, a))
        .collect()
}

pub struct QuestGenerator {
    quests: QuestStore,
    provider: Arc<dyn ChatProvider>,
}

pub struct GeneratedQuest {
    pub quest: QuestSummary,
    pub session: SessionView,
}

impl QuestGenerator {
    pub fn new(quests: QuestStore, provider: Arc<dyn ChatProvider>) -> Self {
        Self { quests, provider }
    }

    /// Ask the provider for quest metadata. Unlike grading, a reply with no
    /// extractable object is a hard failure here: there is nothing sensible
    /// to seed a quest from.
    async fn generate_metadata(
        &self,
        topic: &str,
        matching: &[&CanvasAssignment],
    ) -> Result<serde_json::Value> {
        let messages = [
            ChatMessage::system(prompts::QUEST_METADATA_PROMPT),
            ChatMessage::user(prompts::quest_metadata_request(topic, matching)),
        ];
        let raw = self
            .provider
            .complete(&messages, 150, 0.5)
            .await
            .context("Failed to generate quest")?;

        extract_json(&raw).context("Failed to generate quest: unparseable metadata reply")
    }

    pub async fn create(
        &self,
        engine: &SessionEngine,
        user: &User,
        topic: &str,
        num_questions: i64,
        assignments: &[CanvasAssignment],
    ) -> Result<GeneratedQuest, RespondError> {
        let matching = matching_assignments(topic, assignments);

        let meta = self
            .generate_metadata(topic, &matching)
            .await
            .map_err(RespondError::Provider)?;

        let difficulty = meta["difficulty"].as_str().unwrap_or("intermediate");
        let (xp_reward, estimated_minutes) = difficulty_rewards(difficulty);

        let fallback_title: String = topic.chars().take(30).collect();
        let fallback_description = format!("Practice questions about {topic}");
        let title = meta["title"].as_str().unwrap_or(&fallback_title);
        let description = meta["description"].as_str().unwrap_or(&fallback_description);
        let topic_category = meta["topic_category"].as_str().unwrap_or("General");
        let icon = meta["icon"].as_str().unwrap_or("📝");

        let system_prompt = prompts::custom_tutor_prompt(topic, &matching);

        let quest = self
            .quests
            .insert(
                title,
                description,
                topic_category,
                difficulty,
                xp_reward,
                estimated_minutes,
                icon,
                &system_prompt,
                num_questions,
            )
            .await
            .map_err(RespondError::Storage)?;

        info!(quest_id = quest.id, %topic, difficulty, "custom quest created");

        let session = engine.start(user, &quest).await?;

        Ok(GeneratedQuest {
            quest: QuestSummary::from(&quest),
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(name: &str, course: &str, description: &str) -> CanvasAssignment {
        CanvasAssignment {
            id: Some(1),
            name: Some(name.to_string()),
            due_at: None,
            course_id: Some(1),
            course_name: Some(course.to_string()),
            description: Some(description.to_string()),
        }
    }

    #[test]
    fn test_difficulty_rewards_table() {
        assert_eq!(difficulty_rewards("beginner"), (50, 5));
        assert_eq!(difficulty_rewards("intermediate"), (75, 7));
        assert_eq!(difficulty_rewards("advanced"), (100, 10));
        assert_eq!(difficulty_rewards("legendary"), (75, 7));
    }

    #[test]
    fn test_matching_by_substring() {
        let assignments = vec![
            assignment("Integrals Worksheet", "Calculus AB", "Practice integrals"),
            assignment("Essay Draft", "English", "Persuasive writing"),
        ];
        let matches = matching_assignments("integrals", &assignments);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name_or_default(), "Integrals Worksheet");
    }

    #[test]
    fn test_matching_by_course_name() {
        let assignments = vec![assignment("Unit 3 Quiz", "AP Chemistry", "")];
        let matches = matching_assignments("ap chemistry", &assignments);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_matching_by_long_topic_word() {
        let assignments = vec![assignment("French Revolution Reading", "History", "")];
        // "the" is too short to count; "revolution" matches the name.
        let matches = matching_assignments("the revolution", &assignments);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_short_words_do_not_match() {
        let assignments = vec![assignment("The Big Test", "Math", "")];
        let matches = matching_assignments("big cat", &assignments);
        assert!(matches.is_empty());
    }
}
