//! Signed-in user as reported by `GET /auth/user`.

use serde::{Deserialize, Serialize};

/// The authenticated user. Created by the backend during OAuth; read-only here.
///
/// The backend may send the id as `id`, `_id`, both, or not at all; `id` is
/// empty in the last case. Presence of the user object is what signs a user
/// in, not the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserRecord")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Wire shape of [`User`].
#[derive(Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.or(record.mongo_id).unwrap_or_default(),
            name: record.name.unwrap_or_default(),
            email: record.email,
            avatar: record.avatar,
        }
    }
}

impl User {
    /// Short label for the header: the name, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.email.as_deref().unwrap_or(&self.id)
        } else {
            &self.name
        }
    }
}

/// Body of `GET /auth/user`. An absent or `null` user means "not signed in".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_user_is_not_authenticated() {
        let session: Session = serde_json::from_str(r#"{"user": null}"#).unwrap();
        assert!(!session.is_authenticated());

        let session: Session = serde_json::from_str("{}").unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn decodes_mongo_style_user() {
        let session: Session = serde_json::from_str(
            r#"{"user": {"_id": "u1", "name": "", "email": "ann@example.com", "avatar": null}}"#,
        )
        .unwrap();
        let user = session.user.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.display_name(), "ann@example.com");
    }

    #[test]
    fn user_with_both_or_no_id_keys_still_signs_in() {
        let session: Session =
            serde_json::from_str(r#"{"user": {"_id": "m1", "id": "u1", "name": "Ann"}}"#).unwrap();
        assert_eq!(session.user.as_ref().map(|user| user.id.as_str()), Some("u1"));

        let session: Session = serde_json::from_str(r#"{"user": {"name": null, "email": "ann@example.com"}}"#).unwrap();
        assert!(session.is_authenticated());
        let user = session.user.unwrap();
        assert_eq!(user.id, "");
        assert_eq!(user.display_name(), "ann@example.com");
    }
}
