// src/state.rs
// Shared application state handed to every handler.

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::achievements::AchievementStore;
use crate::assistant::AssistantInterpreter;
use crate::cache::InMemorySessionCache;
use crate::canvas::{CanvasClient, CanvasSessionStore, SessionTiers};
use crate::config::Config;
use crate::llm::{ChatMessage, ChatProvider, OpenAIClient};
use crate::quests::generator::QuestGenerator;
use crate::quests::{QuestStore, SessionEngine, SessionStore};
use crate::tts::{ElevenLabsClient, SpeechProvider};
use crate::users::UserStore;

pub struct AppState {
    pub users: UserStore,
    pub quests: QuestStore,
    pub sessions: SessionStore,
    pub achievements: AchievementStore,
    pub engine: SessionEngine,
    pub generator: QuestGenerator,
    pub assistant: AssistantInterpreter,
    pub speech: Arc<dyn SpeechProvider>,
    pub canvas: CanvasClient,
    pub canvas_sessions: SessionTiers,
    pub chat_configured: bool,
    pub tts_configured: bool,
}

impl AppState {
    /// Wire the real providers from config. Tests assemble the state
    /// directly with fakes instead.
    pub fn from_config(config: &Config, pool: SqlitePool) -> Result<Arc<Self>> {
        let chat: Arc<dyn ChatProvider> = Arc::new(OpenAIClient::from_config(config)?);
        let speech: Arc<dyn SpeechProvider> = Arc::new(ElevenLabsClient::from_config(config)?);

        Ok(Self::assemble(
            pool,
            chat,
            speech,
            CanvasClient::from_config(config)?,
            config.assistant_history_cap,
            config.assistant_session_cap,
            config.chat_configured(),
            config.tts_configured(),
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        pool: SqlitePool,
        chat: Arc<dyn ChatProvider>,
        speech: Arc<dyn SpeechProvider>,
        canvas: CanvasClient,
        history_cap: usize,
        session_cap: usize,
        chat_configured: bool,
        tts_configured: bool,
    ) -> Arc<Self> {
        let users = UserStore::new(pool.clone());
        let quests = QuestStore::new(pool.clone());
        let sessions = SessionStore::new(pool.clone());
        let achievements = AchievementStore::new(pool.clone());

        let engine = SessionEngine::new(
            quests.clone(),
            sessions.clone(),
            users.clone(),
            achievements.clone(),
            chat.clone(),
        );
        let generator = QuestGenerator::new(quests.clone(), chat.clone());

        let history = Arc::new(InMemorySessionCache::<Vec<ChatMessage>>::new(session_cap));
        let assistant = AssistantInterpreter::new(chat, history, history_cap);

        let canvas_sessions = SessionTiers::new(
            Arc::new(InMemorySessionCache::new(session_cap)),
            CanvasSessionStore::new(pool),
        );

        Arc::new(Self {
            users,
            quests,
            sessions,
            achievements,
            engine,
            generator,
            assistant,
            speech,
            canvas,
            canvas_sessions,
            chat_configured,
            tts_configured,
        })
    }
}
