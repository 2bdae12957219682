use serde::{Deserialize, Serialize};

/// A post record from the remote placeholder API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserializes_user_id() {
        let json = r#"{"userId": 1, "id": 3, "title": "ea molestias", "body": "et iusto sed"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 3);
        assert_eq!(post.user_id, 1);
    }

    #[test]
    fn test_user_ignores_extra_fields() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {"city": "Gwenborough"}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "Bret");
    }
}
