use crate::domain::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;

/// Request DTO for creating or replacing a task.
///
/// A missing or `null` title deserializes to an empty string so that it is
/// reported as a field error rather than a parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[validate(length(
        max = 1000,
        message = "description must be at most 1000 characters"
    ))]
    pub description: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(
            ValidationError::new("required").with_message(Cow::Borrowed("title is required")),
        );
    }

    let chars = trimmed.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::new("length").with_message(Cow::Owned(format!(
            "title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"
        ))));
    }

    Ok(())
}

/// Query string accepted by `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub completed: Option<bool>,
    pub title: Option<String>,
}

/// Response DTO for returning task details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, description: Option<&str>) -> TaskRequest {
        TaskRequest {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn title_length_bounds() {
        assert!(request("ab", None).validate().is_err());
        assert!(request("abc", None).validate().is_ok());
        assert!(request(&"x".repeat(200), None).validate().is_ok());
        assert!(request(&"x".repeat(201), None).validate().is_err());
    }

    #[test]
    fn title_is_measured_after_trimming() {
        let errors = request("   ab   ", None).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let errors = request("     ", None).validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["title"][0].code, "required");
    }

    #[test]
    fn title_counts_characters_not_bytes() {
        // 3 characters, 9 bytes.
        assert!(request("日本語", None).validate().is_ok());
    }

    #[test]
    fn description_limit() {
        let long = "d".repeat(1001);
        let errors = request("Valid title", Some(&long)).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
        assert!(
            request("Valid title", Some(&"d".repeat(1000)))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn missing_title_deserializes_as_empty() {
        let req: TaskRequest = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        assert_eq!(req.title, "");
        assert!(req.validate().is_err());
    }

    #[test]
    fn null_title_is_a_required_field_error() {
        let req: TaskRequest = serde_json::from_str(r#"{"title":null}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["title"][0].code, "required");
    }

    #[test]
    fn response_uses_camel_case() {
        let now = Utc::now();
        let response = TaskResponse {
            id: 7,
            title: "Buy milk".into(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value["description"].is_null());
    }
}
