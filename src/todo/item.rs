use super::priority::Priority;
use super::request::{CreateTodoRequest, UpdateTodoRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a todo came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Manual,
    Api,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Manual => write!(f, "manual"),
            Origin::Api => write!(f, "api"),
        }
    }
}

/// A single todo record.
///
/// Serialized with camelCase keys so the persisted list stays readable by
/// anything that already wrote the `todos` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, rename = "source", skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a fresh, incomplete todo from a create request.
    pub fn from_request(id: u64, request: &CreateTodoRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: request.title.trim().to_string(),
            description: normalize_description(request.description.as_deref()),
            completed: false,
            priority: request.priority,
            origin: request.origin,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with the present fields of `update` merged in.
    /// The id and creation time never change.
    pub fn merged(&self, update: &UpdateTodoRequest, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if let Some(title) = &update.title {
            next.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            next.description = normalize_description(Some(description));
        }
        if let Some(completed) = update.completed {
            next.completed = completed;
        }
        if let Some(priority) = update.priority {
            next.priority = priority;
        }
        next.updated_at = now.max(self.created_at);
        next
    }

    /// Case-insensitive substring match against title and description.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(title: &str) -> CreateTodoRequest {
        CreateTodoRequest::new(title, Priority::High)
    }

    #[test]
    fn test_from_request() {
        let now = Utc::now();
        let mut req = request("  Write docs  ");
        req.description = Some("   ".to_string());
        let todo = Todo::from_request(7, &req, now);

        assert_eq!(todo.id, 7);
        assert_eq!(todo.title, "Write docs");
        assert_eq!(todo.description, None);
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn test_merged_only_touches_present_fields() {
        let created = Utc::now();
        let mut req = request("Original");
        req.description = Some("keep me".to_string());
        let todo = Todo::from_request(1, &req, created);

        let update = UpdateTodoRequest {
            completed: Some(true),
            ..UpdateTodoRequest::new(1)
        };
        let later = created + Duration::seconds(5);
        let merged = todo.merged(&update, later);

        assert_eq!(merged.id, 1);
        assert_eq!(merged.title, "Original");
        assert_eq!(merged.description.as_deref(), Some("keep me"));
        assert!(merged.completed);
        assert_eq!(merged.created_at, created);
        assert_eq!(merged.updated_at, later);
    }

    #[test]
    fn test_merged_never_moves_updated_at_before_created_at() {
        let created = Utc::now();
        let todo = Todo::from_request(1, &request("Clock skew"), created);
        let merged = todo.merged(&UpdateTodoRequest::new(1), created - Duration::hours(1));
        assert!(merged.updated_at >= merged.created_at);
    }

    #[test]
    fn test_matches_search() {
        let mut req = request("Buy milk");
        req.description = Some("From the Corner store".to_string());
        let todo = Todo::from_request(1, &req, Utc::now());

        assert!(todo.matches_search("milk"));
        assert!(todo.matches_search("corner"));
        assert!(!todo.matches_search("eggs"));
    }

    #[test]
    fn test_json_uses_camel_case_and_source_key() {
        let mut req = request("Imported");
        req.origin = Some(Origin::Api);
        let todo = Todo::from_request(3, &req, Utc::now());

        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["source"], "api");
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "id": 2,
            "title": "Legacy",
            "completed": true,
            "priority": "low",
            "createdAt": "2025-01-01T10:00:00.000Z",
            "updatedAt": "2025-01-02T10:00:00.000Z"
        }"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id, 2);
        assert!(todo.completed);
        assert_eq!(todo.origin, None);
        assert_eq!(todo.description, None);
    }
}
