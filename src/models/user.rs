use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Documento da collection "users". Read-only here.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl User {
    /// Best human-readable handle: email, then username, then name.
    pub fn label(&self) -> &str {
        [self.email.as_deref(), self.username.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: Option<&str>, name: Option<&str>) -> User {
        User {
            id: ObjectId::new(),
            email: Some(email.into()),
            username: username.map(Into::into),
            name: name.map(Into::into),
        }
    }

    #[test]
    fn test_label_fallbacks() {
        assert_eq!(user("a@b.c", Some("ab"), None).label(), "a@b.c");
        assert_eq!(user("", Some("ab"), Some("Ab")).label(), "ab");
        assert_eq!(user("", None, Some("Ab")).label(), "Ab");
        assert_eq!(user("", None, None).label(), "Unknown");
    }

    #[test]
    fn test_user_without_email_deserializes() {
        let id = ObjectId::new();
        let doc = mongodb::bson::doc! { "_id": id, "username": "ghost" };
        let user: User = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.label(), "ghost");
    }

    #[test]
    fn test_null_email_falls_back_to_username() {
        let doc = mongodb::bson::doc! {
            "_id": ObjectId::new(),
            "email": mongodb::bson::Bson::Null,
            "username": "ghost",
        };
        let user: User = mongodb::bson::from_document(doc).unwrap();
        assert!(user.email.is_none());
        assert_eq!(user.label(), "ghost");
    }
}
