// src/quests/prompts.rs
// Session framing appended to each quest's tutor persona. Replies are read
// aloud, so every prompt insists on short responses.

use crate::canvas::types::CanvasAssignment;

/// Framing for the opening turn of a session.
pub fn opening_framing(num_questions: i64) -> String {
    format!(
        "\n\nThis is a voice-based learning session with {num_questions} questions. \
         Start by warmly greeting the student and asking the FIRST question. \
         Keep your response concise (2-3 sentences max) since it will be read aloud."
    )
}

/// Framing for grading a student answer. Asks for a JSON block with the
/// verdict and score delta, followed by the spoken reply.
pub fn grading_framing(current_question: i64, total_questions: i64) -> String {
    format!(
        r#"

This is question {current_question} of {total_questions} in a voice-based learning session.

IMPORTANT INSTRUCTIONS:
1. First, evaluate the student's answer. Respond with a JSON block followed by your spoken response.
2. Format: {{"is_correct": true/false, "score_delta": 0-20}}
3. Then on a new line, write your spoken response (2-3 sentences max).
4. If this is the last question (question {total_questions} of {total_questions}), wrap up warmly and congratulate them.
5. If not the last question, give brief feedback and ask the next question.
6. Keep responses concise since they'll be read aloud."#
    )
}

/// System prompt asking the provider for custom-quest metadata as JSON.
pub const QUEST_METADATA_PROMPT: &str = r#"Generate quest metadata for a voice-based learning app. Respond with ONLY a JSON object:
{
  "title": "<short catchy title, 3-5 words>",
  "description": "<1 sentence describing what the student will practice>",
  "difficulty": "beginner" | "intermediate" | "advanced",
  "icon": "<single emoji that fits the topic>",
  "topic_category": "<one of: Science, Math, History, Literature, Geography, Technology, Language, Music, or the most fitting category>"
}"#;

/// Tutor persona for a generated custom quest, optionally grounded in the
/// student's real assignments.
pub fn custom_tutor_prompt(topic: &str, matching: &[&CanvasAssignment]) -> String {
    let mut assignment_context = String::new();
    if !matching.is_empty() {
        let details: Vec<String> = matching
            .iter()
            .take(2)
            .map(|a| {
                let description: String = a.description_or_default().chars().take(300).collect();
                format!(
                    "Assignment: \"{}\" from {}. Description: {}",
                    a.name_or_default(),
                    a.course_name_or_default(),
                    description
                )
            })
            .collect();
        assignment_context = format!(
            "\n\nSTUDENT'S ACTUAL ASSIGNMENTS:\n{}\n\nCRITICAL: Generate questions that directly relate to these specific assignments. \
             Reference specific concepts, topics, or requirements from the assignments above. \
             Do NOT create generic questions - make them specific to what the student actually needs to study for these assignments.",
            details.join("\n")
        );
    }

    format!(
        r#"You are a knowledgeable and encouraging tutor helping a student study: {topic}.{assignment_context}

IMPORTANT RULES:
- Ask clear, direct questions about {topic}. No gimmicks, no role-playing, no word problems disguised as stories.
- Questions should be appropriate for the difficulty level and directly test knowledge of {topic}.
- If assignment context is provided above, create questions SPECIFICALLY tailored to those assignments.
- After each student response, evaluate if they're correct, give a brief explanation, and ask the next question.
- Keep responses concise (2-3 sentences max) since they'll be read aloud.
- Be encouraging but honest. If the answer is wrong, explain the correct answer clearly.
- Vary question types: definitions, problem-solving, conceptual understanding, applications."#
    )
}

/// User message for the metadata request, quoting up to three matching
/// assignments so generated quests reference real coursework.
pub fn quest_metadata_request(topic: &str, matching: &[&CanvasAssignment]) -> String {
    let mut context_parts = vec![format!("Student wants to study: {topic}")];

    if !matching.is_empty() {
        let assignment_info: Vec<String> = matching
            .iter()
            .take(3)
            .map(|a| {
                format!(
                    "  - \"{}\" (Course: {}, Due: {})",
                    a.name_or_default(),
                    a.course_name_or_default(),
                    a.due_at.as_deref().unwrap_or("No due date")
                )
            })
            .collect();
        context_parts.push(format!(
            "\nRelevant Canvas assignments:\n{}",
            assignment_info.join("\n")
        ));
        context_parts.push(
            "\nIMPORTANT: Create questions SPECIFICALLY based on these actual assignments. \
             Use the assignment names, course context, and descriptions to generate targeted questions. \
             Do NOT create generic questions - make them relevant to the specific assignments listed above."
                .to_string(),
        );
    }

    format!(
        "Create a quest about: {topic}\n\n{}",
        context_parts.join("\n")
    )
}
