// src/canvas/types.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Remote profile returned by the LMS on a successful credential check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanvasProfile {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Credentials and identity for one connected LMS session. The api_key is
/// held in clear text by contract.
#[derive(Debug, Clone, FromRow)]
pub struct CanvasCredentials {
    pub canvas_url: String,
    pub api_key: String,
    pub user_name: Option<String>,
    pub canvas_user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasCourse {
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// Flattened assignment as both the bridge response and the quest
/// generator's context input. Every field is optional: upstream payloads and
/// client-supplied context are equally untrusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasAssignment {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub due_at: Option<String>,
    pub course_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    pub description: Option<String>,
}

impl CanvasAssignment {
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("Untitled")
    }

    pub fn course_name_or_default(&self) -> &str {
        self.course_name.as_deref().unwrap_or("Unknown")
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("No description")
    }
}
