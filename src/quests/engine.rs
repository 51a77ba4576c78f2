// src/quests/engine.rs
// Drives a quest session: opening turn, per-answer grading, completion
// payout. Sessions go active -> completed exactly once; abandoned sessions
// simply stay active.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::prompts;
use super::store::{QuestStore, SessionStore};
use super::types::{
    Quest, QuestSession, SessionView, TranscriptTurn, STATUS_ACTIVE, STATUS_COMPLETED,
};
use crate::achievements::{AchievementStore, UnlockedAchievement};
use crate::llm::extract::extract_json_span;
use crate::llm::{ChatMessage, ChatProvider};
use crate::users::{User, UserStore};

/// Max score the grader may award per question.
pub const MAX_SCORE_DELTA: i64 = 20;
/// Partial credit applied when the grader's reply has no parseable verdict.
pub const FALLBACK_SCORE_DELTA: i64 = 10;
/// Completion always pays at least this fraction of the quest reward.
pub const MIN_PAYOUT_RATIO: f64 = 0.3;

const FALLBACK_FEEDBACK: &str = "Great effort! Let's continue.";

#[derive(Debug, thiserror::Error)]
pub enum RespondError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session already completed")]
    SessionCompleted,
    #[error("Quest not found")]
    QuestNotFound,
    #[error(transparent)]
    Provider(anyhow::Error),
    #[error(transparent)]
    Storage(anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct RespondOutcome {
    pub tutor_message: String,
    pub is_correct: bool,
    pub feedback: String,
    pub score_delta: i64,
    pub current_question: i64,
    pub total_questions: i64,
    pub quest_complete: bool,
    pub xp_earned: i64,
    pub new_achievements: Vec<UnlockedAchievement>,
}

/// Grading verdict pulled out of a provider reply.
struct Verdict {
    is_correct: bool,
    score_delta: i64,
    spoken: String,
}

/// Two-stage decode of the grader's reply: strict-or-span JSON for the
/// verdict, remainder as the spoken feedback. Format drift degrades to
/// partial credit, never to an error.
fn parse_grading_reply(raw: &str) -> Verdict {
    match extract_json_span(raw) {
        Some((parsed, span)) => {
            let score_delta = parsed["score_delta"]
                .as_i64()
                .unwrap_or(0)
                .clamp(0, MAX_SCORE_DELTA);
            let spoken = raw[span.end..].trim();
            Verdict {
                is_correct: parsed["is_correct"].as_bool().unwrap_or(false),
                score_delta,
                spoken: if spoken.is_empty() {
                    FALLBACK_FEEDBACK.to_string()
                } else {
                    spoken.to_string()
                },
            }
        }
        None => Verdict {
            is_correct: false,
            score_delta: FALLBACK_SCORE_DELTA,
            spoken: raw.to_string(),
        },
    }
}

/// XP payout: reward scaled by score ratio, floored at 30% of the reward.
fn xp_payout(xp_reward: i64, score: i64, total_questions: i64) -> i64 {
    let max_score = total_questions * MAX_SCORE_DELTA;
    let ratio = if max_score > 0 {
        score as f64 / max_score as f64
    } else {
        0.0
    };
    (xp_reward as f64 * ratio.max(MIN_PAYOUT_RATIO)) as i64
}

pub struct SessionEngine {
    quests: QuestStore,
    sessions: SessionStore,
    users: UserStore,
    achievements: AchievementStore,
    provider: Arc<dyn ChatProvider>,
    // Serializes concurrent responses to the same session id so two answers
    // cannot race the same score/transcript row.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionEngine {
    pub fn new(
        quests: QuestStore,
        sessions: SessionStore,
        users: UserStore,
        achievements: AchievementStore,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self {
            quests,
            sessions,
            users,
            achievements,
            provider,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Start a session for an existing user and quest: streak update,
    /// opening turn from the provider, session + progress rows.
    pub async fn start(&self, user: &User, quest: &Quest) -> Result<SessionView, RespondError> {
        let today = Utc::now().date_naive();
        self.users
            .update_streak(user.id, today)
            .await
            .map_err(RespondError::Storage)?;

        // A streak bump can cross an achievement threshold on its own.
        if let Ok(Some(fresh)) = self.users.get_by_id(user.id).await {
            if let Err(e) = self.achievements.evaluate(&fresh).await {
                warn!("achievement evaluation after streak update failed: {e}");
            }
        }

        let opening = [
            ChatMessage::system(format!(
                "{}{}",
                quest.system_prompt,
                prompts::opening_framing(quest.num_questions)
            )),
            ChatMessage::user("Start the quest!"),
        ];
        let tutor_message = self
            .provider
            .complete(&opening, 200, 0.7)
            .await
            .map_err(RespondError::Provider)?;

        let session_id = Uuid::new_v4().to_string();
        let transcript = vec![TranscriptTurn::tutor(tutor_message)];
        let messages_json = serde_json::to_string(&transcript)
            .map_err(|e| RespondError::Storage(e.into()))?;

        self.sessions
            .insert(&session_id, user.id, quest.id, &messages_json, quest.num_questions)
            .await
            .map_err(RespondError::Storage)?;
        self.quests
            .record_attempt(user.id, quest.id)
            .await
            .map_err(RespondError::Storage)?;

        info!(user_id = user.id, quest_id = quest.id, %session_id, "quest session started");

        Ok(SessionView {
            session_id,
            quest_id: quest.id,
            messages: transcript,
            current_question: 1,
            total_questions: quest.num_questions,
            score: 0,
            status: STATUS_ACTIVE.to_string(),
        })
    }

    /// Grade one student answer. Holding the per-session lock across the
    /// read-grade-write cycle keeps concurrent answers from clobbering each
    /// other; status is re-checked under the lock.
    pub async fn respond(
        &self,
        session_id: &str,
        user_message: &str,
    ) -> Result<RespondOutcome, RespondError> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let session = self
            .sessions
            .get(session_id)
            .await
            .map_err(RespondError::Storage)?
            .ok_or(RespondError::SessionNotFound)?;

        if !session.is_active() {
            return Err(RespondError::SessionCompleted);
        }

        let quest = self
            .quests
            .get(session.quest_id)
            .await
            .map_err(RespondError::Storage)?
            .ok_or(RespondError::QuestNotFound)?;

        let mut transcript = session.transcript().map_err(RespondError::Storage)?;
        let current_question = session.current_question + 1;
        let total_questions = session.total_questions;
        let is_last = current_question >= total_questions;

        transcript.push(TranscriptTurn::student(user_message));

        let raw = self
            .provider
            .complete(&grading_messages(&quest, &transcript, current_question, total_questions), 300, 0.7)
            .await
            .map_err(RespondError::Provider)?;

        let verdict = parse_grading_reply(&raw);
        let new_score = session.score + verdict.score_delta;

        let mut tutor_turn = TranscriptTurn::tutor(verdict.spoken.clone());
        tutor_turn.is_correct = Some(verdict.is_correct);
        tutor_turn.feedback = Some(verdict.spoken.clone());
        transcript.push(tutor_turn);

        let (xp_earned, new_achievements) = if is_last {
            self.complete(&session, &quest, new_score).await?
        } else {
            (0, Vec::new())
        };

        let status = if is_last { STATUS_COMPLETED } else { STATUS_ACTIVE };
        let completed_at = is_last.then(|| Utc::now().naive_utc());
        let messages_json = serde_json::to_string(&transcript)
            .map_err(|e| RespondError::Storage(e.into()))?;

        self.sessions
            .update_progress(session_id, &messages_json, current_question, new_score, status, completed_at)
            .await
            .map_err(RespondError::Storage)?;

        Ok(RespondOutcome {
            tutor_message: verdict.spoken.clone(),
            is_correct: verdict.is_correct,
            feedback: verdict.spoken,
            score_delta: verdict.score_delta,
            current_question,
            total_questions,
            quest_complete: is_last,
            xp_earned,
            new_achievements,
        })
    }

    /// Final-question bookkeeping: payout, user stats, progress record,
    /// achievement sweep.
    async fn complete(
        &self,
        session: &QuestSession,
        quest: &Quest,
        final_score: i64,
    ) -> Result<(i64, Vec<UnlockedAchievement>), RespondError> {
        let xp_earned = xp_payout(quest.xp_reward, final_score, session.total_questions);

        let user = self
            .users
            .award_quest_completion(session.user_id, xp_earned)
            .await
            .map_err(RespondError::Storage)?;

        self.quests
            .record_completion(session.user_id, session.quest_id, final_score)
            .await
            .map_err(RespondError::Storage)?;

        let new_achievements = self
            .achievements
            .evaluate(&user)
            .await
            .map_err(RespondError::Storage)?;

        info!(
            user_id = session.user_id,
            quest_id = session.quest_id,
            xp_earned,
            final_score,
            "quest completed"
        );

        Ok((xp_earned, new_achievements))
    }
}

fn grading_messages(
    quest: &Quest,
    transcript: &[TranscriptTurn],
    current_question: i64,
    total_questions: i64,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(format!(
        "{}{}",
        quest.system_prompt,
        prompts::grading_framing(current_question, total_questions)
    ))];

    for turn in transcript {
        if turn.role == "tutor" {
            messages.push(ChatMessage::assistant(turn.content.clone()));
        } else {
            messages.push(ChatMessage::user(turn.content.clone()));
        }
    }

    messages
}
