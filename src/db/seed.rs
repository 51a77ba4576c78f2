// src/db/seed.rs
// One-time seeding of the quest and achievement catalogs.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

struct SeedQuest {
    title: &'static str,
    description: &'static str,
    topic: &'static str,
    difficulty: &'static str,
    xp_reward: i64,
    estimated_minutes: i64,
    icon: &'static str,
    system_prompt: &'static str,
    num_questions: i64,
}

const SEED_QUESTS: &[SeedQuest] = &[
    SeedQuest {
        title: "Solar System Explorer",
        description: "Journey through our solar system! Answer questions about planets, moons, and cosmic wonders.",
        topic: "Science",
        difficulty: "beginner",
        xp_reward: 50,
        estimated_minutes: 5,
        icon: "🪐",
        system_prompt: "You are a friendly space tutor guiding a student through the solar system. Ask engaging questions about planets, moons, the sun, and space phenomena. Keep questions at a beginner level. After each student response, evaluate if they're correct, give encouraging feedback, and ask the next question. Be enthusiastic and use space metaphors!",
        num_questions: 5,
    },
    SeedQuest {
        title: "Ancient Civilizations",
        description: "Travel back in time to explore ancient Egypt, Rome, Greece, and more!",
        topic: "History",
        difficulty: "beginner",
        xp_reward: 50,
        estimated_minutes: 5,
        icon: "🏛️",
        system_prompt: "You are an enthusiastic history tutor taking students on a journey through ancient civilizations. Ask questions about ancient Egypt, Rome, Greece, Mesopotamia, and other ancient cultures. Keep it fun and engaging with storytelling elements. Evaluate answers kindly and provide interesting historical facts.",
        num_questions: 5,
    },
    SeedQuest {
        title: "Math Wizardry",
        description: "Cast mathematical spells! Solve puzzles involving arithmetic, patterns, and logic.",
        topic: "Math",
        difficulty: "beginner",
        xp_reward: 60,
        estimated_minutes: 5,
        icon: "🧙‍♂️",
        system_prompt: "You are a magical math wizard tutoring a student. Present math problems as magical puzzles and spells. Cover basic arithmetic, patterns, and simple logic. Make it fun with wizard-themed language. Evaluate answers and provide step-by-step explanations when the student is wrong.",
        num_questions: 5,
    },
    SeedQuest {
        title: "World Geography Challenge",
        description: "Explore continents, countries, capitals, and natural wonders around the globe!",
        topic: "Geography",
        difficulty: "intermediate",
        xp_reward: 75,
        estimated_minutes: 7,
        icon: "🌍",
        system_prompt: "You are a world traveler and geography expert. Ask questions about countries, capitals, continents, oceans, mountains, rivers, and natural wonders. Include interesting cultural facts. Questions should be at an intermediate level. Be encouraging and share fun travel anecdotes.",
        num_questions: 6,
    },
    SeedQuest {
        title: "The Science Lab",
        description: "Conduct virtual experiments! Learn about chemistry, physics, and biology.",
        topic: "Science",
        difficulty: "intermediate",
        xp_reward: 75,
        estimated_minutes: 7,
        icon: "🔬",
        system_prompt: "You are a quirky science lab instructor. Ask questions about basic chemistry, physics, and biology concepts. Frame questions as experiments or observations. Intermediate difficulty. Explain scientific concepts clearly when giving feedback.",
        num_questions: 6,
    },
    SeedQuest {
        title: "Literary Legends",
        description: "Dive into classic literature! Explore famous authors, books, and literary concepts.",
        topic: "Literature",
        difficulty: "intermediate",
        xp_reward: 75,
        estimated_minutes: 7,
        icon: "📖",
        system_prompt: "You are a passionate literature professor. Ask questions about famous books, authors, literary devices, and classic stories. Cover a range of world literature. Be warm and encouraging, sharing interesting anecdotes about authors and their works.",
        num_questions: 6,
    },
    SeedQuest {
        title: "Advanced Physics Quest",
        description: "Tackle challenging physics concepts: relativity, quantum mechanics, and thermodynamics!",
        topic: "Science",
        difficulty: "advanced",
        xp_reward: 100,
        estimated_minutes: 10,
        icon: "⚛️",
        system_prompt: "You are a brilliant physics professor. Ask challenging questions about relativity, quantum mechanics, thermodynamics, electromagnetism, and modern physics. Provide detailed explanations. Be encouraging even when answers are wrong — these are hard topics!",
        num_questions: 7,
    },
    SeedQuest {
        title: "World History Deep Dive",
        description: "From the Renaissance to the Space Race — test your knowledge of modern history!",
        topic: "History",
        difficulty: "advanced",
        xp_reward: 100,
        estimated_minutes: 10,
        icon: "📜",
        system_prompt: "You are a distinguished history scholar. Ask in-depth questions about world history from the Renaissance through the 20th century. Cover wars, revolutions, cultural movements, and key figures. Provide rich historical context in your feedback.",
        num_questions: 7,
    },
    SeedQuest {
        title: "Vocabulary Voyage",
        description: "Expand your vocabulary! Learn new words, their meanings, and how to use them.",
        topic: "Language",
        difficulty: "beginner",
        xp_reward: 50,
        estimated_minutes: 5,
        icon: "💬",
        system_prompt: "You are a friendly vocabulary coach. Present interesting English words and ask the student to define them, use them in sentences, or identify their meanings from context. Start with moderately challenging words. Be encouraging and provide etymology and usage tips.",
        num_questions: 5,
    },
    SeedQuest {
        title: "Music Theory Basics",
        description: "Learn about notes, scales, rhythm, and the fundamentals of music!",
        topic: "Music",
        difficulty: "beginner",
        xp_reward: 50,
        estimated_minutes: 5,
        icon: "🎵",
        system_prompt: "You are an enthusiastic music teacher. Ask questions about basic music theory: notes, scales, time signatures, instruments, and famous composers. Keep it fun and accessible. Use musical analogies and encourage the student's curiosity about music.",
        num_questions: 5,
    },
    SeedQuest {
        title: "Coding Concepts",
        description: "Explore programming fundamentals through conversational challenges!",
        topic: "Technology",
        difficulty: "intermediate",
        xp_reward: 75,
        estimated_minutes: 7,
        icon: "💻",
        system_prompt: "You are a friendly coding mentor. Ask conceptual questions about programming: variables, loops, functions, data structures, algorithms, and basic computer science concepts. Don't ask them to write code (this is voice-based), but test their understanding of concepts. Be encouraging and use real-world analogies.",
        num_questions: 6,
    },
    SeedQuest {
        title: "Environmental Science",
        description: "Learn about ecosystems, climate change, conservation, and our planet!",
        topic: "Science",
        difficulty: "intermediate",
        xp_reward: 75,
        estimated_minutes: 7,
        icon: "🌱",
        system_prompt: "You are a passionate environmental scientist. Ask questions about ecosystems, climate change, biodiversity, conservation, renewable energy, and environmental challenges. Be informative and inspiring, encouraging students to think about sustainability.",
        num_questions: 6,
    },
];

// (name, description, icon, category, requirement_type, requirement_value)
const SEED_ACHIEVEMENTS: &[(&str, &str, &str, &str, &str, i64)] = &[
    ("First Steps", "Complete your first quest", "🎯", "quest", "quests_completed", 1),
    ("Quest Warrior", "Complete 5 quests", "⚔️", "quest", "quests_completed", 5),
    ("Quest Master", "Complete 15 quests", "👑", "quest", "quests_completed", 15),
    ("Quest Legend", "Complete 30 quests", "🏆", "quest", "quests_completed", 30),
    ("XP Starter", "Earn 100 XP", "⭐", "xp", "xp", 100),
    ("XP Hunter", "Earn 500 XP", "🌟", "xp", "xp", 500),
    ("XP Champion", "Earn 1500 XP", "💫", "xp", "xp", 1500),
    ("XP Legend", "Earn 5000 XP", "✨", "xp", "xp", 5000),
    ("Consistent Learner", "Reach a 3-day streak", "🔥", "streak", "streak", 3),
    ("Dedicated Student", "Reach a 7-day streak", "🔥", "streak", "streak", 7),
    ("Unstoppable", "Reach a 14-day streak", "🔥", "streak", "streak", 14),
    ("Streak Legend", "Reach a 30-day streak", "🔥", "streak", "streak", 30),
    ("Level Up!", "Reach level 5", "📈", "special", "level", 5),
    ("Rising Star", "Reach level 10", "🌠", "special", "level", 10),
    ("Voice Master", "Reach level 20", "🎙️", "special", "level", 20),
];

/// Seed both catalogs when the quest table is empty.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<()> {
    let quest_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quests")
        .fetch_one(pool)
        .await
        .context("Failed to count quests")?;

    if quest_count > 0 {
        return Ok(());
    }

    for q in SEED_QUESTS {
        sqlx::query(
            r#"
            INSERT INTO quests
                (title, description, topic, difficulty, xp_reward, estimated_minutes, icon, system_prompt, num_questions)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(q.title)
        .bind(q.description)
        .bind(q.topic)
        .bind(q.difficulty)
        .bind(q.xp_reward)
        .bind(q.estimated_minutes)
        .bind(q.icon)
        .bind(q.system_prompt)
        .bind(q.num_questions)
        .execute(pool)
        .await
        .context("Failed to seed quest")?;
    }

    for (name, description, icon, category, req_type, req_value) in SEED_ACHIEVEMENTS {
        sqlx::query(
            r#"
            INSERT INTO achievements
                (name, description, icon, category, requirement_type, requirement_value)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(category)
        .bind(req_type)
        .bind(req_value)
        .execute(pool)
        .await
        .context("Failed to seed achievement")?;
    }

    info!(
        "seeded {} quests and {} achievements",
        SEED_QUESTS.len(),
        SEED_ACHIEVEMENTS.len()
    );
    Ok(())
}
