// src/canvas/client.rs

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use super::types::{CanvasAssignment, CanvasCourse, CanvasCredentials, CanvasProfile};
use crate::config::Config;

/// Description text is capped to bound payload (and prompt) size.
const DESCRIPTION_CAP: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Invalid Canvas URL or API key")]
    InvalidCredentials,
    #[error("Cannot connect to {0}. Check the URL.")]
    Unreachable(String),
    #[error("{0}")]
    Upstream(String),
}

#[derive(Clone)]
pub struct CanvasClient {
    client: Client,
}

impl CanvasClient {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.lms_timeout))
            .build()?;
        Ok(Self { client })
    }

    /// Validate credentials by fetching the remote user's profile.
    pub async fn fetch_profile(
        &self,
        canvas_url: &str,
        api_key: &str,
    ) -> Result<CanvasProfile, CanvasError> {
        let response = self
            .client
            .get(format!("{canvas_url}/api/v1/users/self/profile"))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    CanvasError::Unreachable(canvas_url.to_string())
                } else {
                    CanvasError::Upstream(format!("Canvas connection error: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(CanvasError::InvalidCredentials);
        }

        response
            .json::<CanvasProfile>()
            .await
            .map_err(|e| CanvasError::Upstream(format!("Canvas profile parse error: {e}")))
    }

    pub async fn fetch_courses(
        &self,
        creds: &CanvasCredentials,
    ) -> Result<Vec<CanvasCourse>, CanvasError> {
        let response = self
            .client
            .get(format!("{}/api/v1/courses", creds.canvas_url))
            .bearer_auth(&creds.api_key)
            .query(&[("enrollment_state", "active"), ("per_page", "50")])
            .send()
            .await
            .map_err(|e| CanvasError::Upstream(format!("Error fetching courses: {e}")))?;

        if !response.status().is_success() {
            return Err(CanvasError::Upstream("Failed to fetch courses".to_string()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CanvasError::Upstream(format!("Error fetching courses: {e}")))?;

        let mut courses = Vec::new();
        if let Some(items) = body.as_array() {
            for c in items {
                // Unnamed entries are access-restricted stubs; skip them.
                let (Some(id), Some(name)) = (c["id"].as_i64(), c["name"].as_str()) else {
                    continue;
                };
                courses.push(CanvasCourse {
                    id,
                    name: name.to_string(),
                    code: c["course_code"].as_str().unwrap_or("").to_string(),
                });
            }
        }
        Ok(courses)
    }

    /// Assignments for one course, ordered by due date.
    pub async fn fetch_course_assignments(
        &self,
        creds: &CanvasCredentials,
        course_id: i64,
        per_page: u32,
    ) -> Result<Vec<CanvasAssignment>, CanvasError> {
        let response = self
            .client
            .get(format!(
                "{}/api/v1/courses/{}/assignments",
                creds.canvas_url, course_id
            ))
            .bearer_auth(&creds.api_key)
            .query(&[("per_page", per_page.to_string().as_str()), ("order_by", "due_at")])
            .send()
            .await
            .map_err(|e| CanvasError::Upstream(format!("Error fetching assignments: {e}")))?;

        if !response.status().is_success() {
            return Err(CanvasError::Upstream(
                "Failed to fetch assignments".to_string(),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CanvasError::Upstream(format!("Error fetching assignments: {e}")))?;

        Ok(flatten_assignments(&body, course_id, None))
    }

    /// Assignments across all active courses. A failing course is skipped
    /// rather than aborting the whole sweep.
    pub async fn fetch_all_assignments(
        &self,
        creds: &CanvasCredentials,
    ) -> Result<Vec<CanvasAssignment>, CanvasError> {
        let courses = self.fetch_courses(creds).await?;

        let mut assignments = Vec::new();
        for course in courses {
            match self.fetch_course_assignments(creds, course.id, 10).await {
                Ok(mut course_assignments) => {
                    for a in &mut course_assignments {
                        a.course_name = Some(course.name.clone());
                    }
                    assignments.append(&mut course_assignments);
                }
                Err(e) => {
                    warn!(course_id = course.id, "skipping course: {}", e);
                }
            }
        }
        Ok(assignments)
    }
}

fn flatten_assignments(body: &Value, course_id: i64, course_name: Option<&str>) -> Vec<CanvasAssignment> {
    let mut assignments = Vec::new();
    if let Some(items) = body.as_array() {
        for a in items {
            if !a.is_object() {
                continue;
            }
            let description = a["description"]
                .as_str()
                .map(|d| d.chars().take(DESCRIPTION_CAP).collect::<String>());
            assignments.push(CanvasAssignment {
                id: a["id"].as_i64(),
                name: a["name"]
                    .as_str()
                    .or_else(|| a["title"].as_str())
                    .map(str::to_string),
                due_at: a["due_at"].as_str().map(str::to_string),
                course_id: a["course_id"].as_i64().or(Some(course_id)),
                course_name: course_name.map(str::to_string),
                description,
            });
        }
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_caps_description() {
        let long = "x".repeat(1000);
        let body = json!([{ "id": 7, "name": "Essay", "description": long }]);
        let flat = flatten_assignments(&body, 3, Some("History"));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].description.as_ref().unwrap().len(), DESCRIPTION_CAP);
        assert_eq!(flat[0].course_name.as_deref(), Some("History"));
        assert_eq!(flat[0].course_id, Some(3));
    }

    #[test]
    fn test_flatten_skips_non_objects() {
        let body = json!([42, "junk", { "id": 1, "name": "Quiz" }]);
        let flat = flatten_assignments(&body, 1, None);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].name.as_deref(), Some("Quiz"));
    }

    #[test]
    fn test_flatten_falls_back_to_title() {
        let body = json!([{ "id": 1, "title": "Lab Report" }]);
        let flat = flatten_assignments(&body, 1, None);
        assert_eq!(flat[0].name.as_deref(), Some("Lab Report"));
    }
}
