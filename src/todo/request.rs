use super::item::Origin;
use super::priority::Priority;
use serde::{Deserialize, Serialize};

/// Input contract for creating a todo.
///
/// `origin` is not part of the drag-and-drop payload; whoever turns the
/// request into a dispatch stamps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(skip)]
    pub origin: Option<Origin>,
}

impl CreateTodoRequest {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            origin: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Partial update of a todo. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl UpdateTodoRequest {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_parses_drag_payload_shape() {
        let json = r#"{"title":"sunt aut facere","description":"quia et suscipit...","priority":"medium"}"#;
        let req: CreateTodoRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "sunt aut facere");
        assert_eq!(req.priority, Priority::Medium);
        assert_eq!(req.origin, None);
    }

    #[test]
    fn test_create_request_does_not_serialize_origin() {
        let req = CreateTodoRequest::new("X", Priority::Low).with_origin(Origin::Api);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("origin").is_none());
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateTodoRequest::new(4).is_empty());
        let req = UpdateTodoRequest {
            priority: Some(Priority::High),
            ..UpdateTodoRequest::new(4)
        };
        assert!(!req.is_empty());
    }
}
