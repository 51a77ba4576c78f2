// src/assistant/interpreter.rs
// Turns free-form speech into structured intents. Conversation history is
// kept per browser session behind the cache seam, capped to a fixed number
// of turns; provider replies are decoded permissively and always fall back
// to a safe intent rather than an error.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

use super::prompts;
use crate::cache::SessionCache;
use crate::canvas::types::{CanvasAssignment, CanvasCourse};
use crate::llm::extract::extract_json;
use crate::llm::{ChatMessage, ChatProvider};

/// Most Canvas assignments ever surfaced to the provider in one prompt.
const MAX_CONTEXT_ASSIGNMENTS: usize = 15;

#[derive(Debug, Clone, Deserialize)]
pub struct QuestContext {
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanvasContext {
    #[serde(default)]
    pub courses: Vec<CanvasCourse>,
    #[serde(default)]
    pub assignments: Vec<CanvasAssignment>,
}

/// Client-reported state sent with each assistant turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantContext {
    #[serde(default)]
    pub current_page: Option<String>,
    #[serde(default)]
    pub user_logged_in: Option<bool>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub available_quests: Vec<QuestContext>,
    #[serde(default)]
    pub canvas_data: Option<CanvasContext>,
}

impl AssistantContext {
    /// Render the client state as the trailing section of the system prompt.
    fn render(&self) -> String {
        let mut out = String::from("\n\nCurrent context:\n");

        let page = self.current_page.as_deref().unwrap_or("/");
        let _ = writeln!(out, "- Current page: {page}");

        match (self.user_logged_in.unwrap_or(false), self.user_name.as_deref()) {
            (true, Some(name)) => {
                let _ = writeln!(out, "- User is logged in as: {name}");
            }
            (true, None) => {
                let _ = writeln!(out, "- User is logged in");
            }
            (false, _) => {
                let _ = writeln!(
                    out,
                    "- User is NOT logged in yet. Listen for their name so they can log in."
                );
            }
        }

        if !self.available_quests.is_empty() {
            out.push_str("- Available quests:\n");
            // Positions are 1-indexed so "start quest one" resolves.
            for (position, quest) in self.available_quests.iter().enumerate() {
                let id = quest
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let _ = writeln!(
                    out,
                    "  * #{}: ID {id}: {} (topic: {})",
                    position + 1,
                    quest.title,
                    quest.topic
                );
            }
        }

        if let Some(canvas) = &self.canvas_data {
            if !canvas.courses.is_empty() {
                out.push_str("- Canvas courses the user is enrolled in:\n");
                for course in &canvas.courses {
                    let _ = writeln!(out, "  * {}", course.name);
                }
            }
            if !canvas.assignments.is_empty() {
                out.push_str("- Upcoming Canvas assignments:\n");
                for assignment in canvas.assignments.iter().take(MAX_CONTEXT_ASSIGNMENTS) {
                    let _ = writeln!(
                        out,
                        "  * {} ({})",
                        assignment.name_or_default(),
                        assignment.course_name_or_default()
                    );
                }
            }
        }

        out
    }
}

pub struct AssistantInterpreter {
    provider: Arc<dyn ChatProvider>,
    history: Arc<dyn SessionCache<Vec<ChatMessage>>>,
    history_cap: usize,
}

impl AssistantInterpreter {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        history: Arc<dyn SessionCache<Vec<ChatMessage>>>,
        history_cap: usize,
    ) -> Self {
        Self { provider, history, history_cap }
    }

    /// One assistant turn: prior history plus the new message goes to the
    /// provider, the reply is decoded into an intent object, and both sides
    /// of the exchange are appended to the capped history.
    pub async fn chat(
        &self,
        session_id: &str,
        message: &str,
        context: &AssistantContext,
    ) -> Result<Value> {
        let system = format!("{}{}", prompts::ASSISTANT_SYSTEM_PROMPT, context.render());

        let mut history = self.history.get(session_id).await.unwrap_or_default();

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(message));

        let raw = self.provider.complete(&messages, 200, 0.3).await?;

        history.push(ChatMessage::user(message));
        history.push(ChatMessage::assistant(raw.clone()));
        if history.len() > self.history_cap {
            history.drain(..history.len() - self.history_cap);
        }
        self.history.put(session_id, history).await;

        Ok(decode_assistant_reply(&raw))
    }

    /// Forget a session's conversation history.
    pub async fn reset(&self, session_id: &str) {
        self.history.remove(session_id).await;
    }

    /// Stateless one-shot interpretation of a spoken navigation command.
    pub async fn voice_command(
        &self,
        transcript: &str,
        current_page: &str,
        quests: &[QuestContext],
    ) -> Result<Value> {
        let quest_list = quests
            .iter()
            .enumerate()
            .filter_map(|(position, q)| {
                q.id.map(|id| {
                    format!("- #{}: ID {id}: {} (topic: {})", position + 1, q.title, q.topic)
                })
            })
            .collect::<Vec<_>>()
            .join("\n");

        let messages = [
            ChatMessage::system(prompts::voice_command_prompt(current_page, &quest_list)),
            ChatMessage::user(transcript),
        ];
        let raw = self.provider.complete(&messages, 150, 0.3).await?;

        Ok(decode_voice_reply(&raw))
    }
}

/// Provider reply -> assistant intent object. Replies with no extractable
/// JSON become a "chat" intent whose message is the raw text when it is
/// short enough to speak, else a canned apology.
fn decode_assistant_reply(raw: &str) -> Value {
    if let Some(parsed) = extract_json(raw) {
        if parsed.get("intent").and_then(Value::as_str).is_some() {
            return normalize_reply(parsed);
        }
    }

    let trimmed = raw.trim();
    let message = if !trimmed.is_empty() && trimmed.chars().count() <= 200 {
        trimmed.to_string()
    } else {
        "Sorry, I didn't quite understand that. Could you rephrase?".to_string()
    };

    json!({ "intent": "chat", "target": "", "message": message })
}

/// Voice command reply -> intent object with confidence. Unparseable replies
/// degrade to "unknown" at zero confidence.
fn decode_voice_reply(raw: &str) -> Value {
    if let Some(parsed) = extract_json(raw) {
        if parsed.get("intent").and_then(Value::as_str).is_some() {
            let mut reply = normalize_reply(parsed);
            if !reply["confidence"].is_number() {
                reply["confidence"] = json!(0.5);
            }
            return reply;
        }
    }

    debug!("voice command reply had no parseable intent");
    json!({
        "intent": "unknown",
        "target": "",
        "message": "Sorry, I didn't catch that. Try saying 'go to quests' or 'show my profile'.",
        "confidence": 0.0,
    })
}

/// Guarantee the fields handlers and clients rely on are present.
fn normalize_reply(mut reply: Value) -> Value {
    if reply.get("target").is_none() {
        reply["target"] = json!("");
    }
    if reply.get("message").and_then(Value::as_str).is_none() {
        reply["message"] = json!("Okay!");
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemorySessionCache;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Records the sampling parameters of the last completion request.
    struct RecordingProvider {
        last: std::sync::Mutex<Option<(u32, f32)>>,
    }

    #[async_trait]
    impl ChatProvider for RecordingProvider {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            max_tokens: u32,
            temperature: f32,
        ) -> Result<String> {
            *self.last.lock().unwrap() = Some((max_tokens, temperature));
            Ok(r#"{"intent": "chat", "target": "", "message": "Hi!"}"#.to_string())
        }
    }

    #[tokio::test]
    async fn test_chat_samples_at_low_temperature() {
        let provider = Arc::new(RecordingProvider { last: std::sync::Mutex::new(None) });
        let interpreter = AssistantInterpreter::new(
            provider.clone(),
            Arc::new(InMemorySessionCache::<Vec<ChatMessage>>::new(4)),
            20,
        );

        interpreter
            .chat("s1", "hello", &AssistantContext::default())
            .await
            .expect("chat");

        let (_, temperature) = provider.last.lock().unwrap().expect("recorded");
        assert_eq!(temperature, 0.3);
    }

    #[test]
    fn test_decode_assistant_reply_well_formed() {
        let raw = r#"{"intent": "navigate", "target": "/quests", "message": "Heading to the quest map!"}"#;
        let reply = decode_assistant_reply(raw);
        assert_eq!(reply["intent"], "navigate");
        assert_eq!(reply["target"], "/quests");
    }

    #[test]
    fn test_decode_assistant_reply_wrapped_in_prose() {
        let raw = "Sure! Here you go: {\"intent\": \"login\", \"target\": \"Ada\", \"message\": \"Welcome, Ada!\"} Done.";
        let reply = decode_assistant_reply(raw);
        assert_eq!(reply["intent"], "login");
        assert_eq!(reply["target"], "Ada");
    }

    #[test]
    fn test_decode_assistant_reply_plain_text_becomes_chat() {
        let reply = decode_assistant_reply("Photosynthesis turns sunlight into sugar.");
        assert_eq!(reply["intent"], "chat");
        assert_eq!(reply["message"], "Photosynthesis turns sunlight into sugar.");
    }

    #[test]
    fn test_decode_assistant_reply_long_garbage_gets_canned_message() {
        let raw = "x".repeat(500);
        let reply = decode_assistant_reply(&raw);
        assert_eq!(reply["intent"], "chat");
        assert_eq!(
            reply["message"],
            "Sorry, I didn't quite understand that. Could you rephrase?"
        );
    }

    #[test]
    fn test_decode_voice_reply_unknown_on_garbage() {
        let reply = decode_voice_reply("beep boop");
        assert_eq!(reply["intent"], "unknown");
        assert_eq!(reply["confidence"], 0.0);
    }

    #[test]
    fn test_decode_voice_reply_backfills_confidence() {
        let reply =
            decode_voice_reply(r#"{"intent": "navigate", "target": "/profile", "message": "Off we go"}"#);
        assert_eq!(reply["intent"], "navigate");
        assert_eq!(reply["confidence"], 0.5);
    }

    #[test]
    fn test_context_render_mentions_missing_login() {
        let context = AssistantContext::default();
        let rendered = context.render();
        assert!(rendered.contains("NOT logged in"));
    }

    #[test]
    fn test_context_render_numbers_quest_positions() {
        let context = AssistantContext {
            available_quests: vec![
                QuestContext {
                    id: Some(4),
                    title: "Solar System Explorer".to_string(),
                    topic: "Science".to_string(),
                },
                QuestContext {
                    id: Some(9),
                    title: "Math Wizardry".to_string(),
                    topic: "Math".to_string(),
                },
            ],
            ..Default::default()
        };
        let rendered = context.render();
        assert!(rendered.contains("#1: ID 4: Solar System Explorer"));
        assert!(rendered.contains("#2: ID 9: Math Wizardry"));
    }

    #[test]
    fn test_context_render_caps_assignments() {
        let assignments = (0..30)
            .map(|i| CanvasAssignment {
                id: Some(i),
                name: Some(format!("Assignment {i}")),
                due_at: None,
                course_id: Some(1),
                course_name: Some("Biology".to_string()),
                description: None,
            })
            .collect();
        let context = AssistantContext {
            canvas_data: Some(CanvasContext { courses: Vec::new(), assignments }),
            ..Default::default()
        };
        let rendered = context.render();
        assert!(rendered.contains("Assignment 14"));
        assert!(!rendered.contains("Assignment 15 "));
    }
}
