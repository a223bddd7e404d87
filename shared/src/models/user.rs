//! User Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::validation;

/// Authenticated back-office user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    /// "First Last", falling back to the username
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// Shallow-merge a JSON patch into this user
    ///
    /// Unknown keys are ignored; a patch that would make the record
    /// unreadable leaves it unchanged.
    pub fn merge(&mut self, patch: &Map<String, Value>) -> bool {
        let Ok(Value::Object(mut current)) = serde_json::to_value(&*self) else {
            return false;
        };
        for (key, value) in patch {
            if current.contains_key(key) {
                current.insert(key.clone(), value.clone());
            }
        }
        match serde_json::from_value::<User>(Value::Object(current)) {
            Ok(merged) => {
                *self = merged;
                true
            }
            Err(e) => {
                tracing::warn!(user_id = self.id, error = %e, "Ignoring user patch");
                false
            }
        }
    }
}

/// `PATCH /auth/user/` body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

impl ProfileUpdate {
    /// Split "Trần Thị Lan" into first name "Trần" and last name "Thị Lan"
    ///
    /// A blank name leaves both fields unset.
    pub fn set_full_name(&mut self, name: &str) {
        let mut parts = name.split_whitespace();
        let Some(first) = parts.next() else {
            return;
        };
        self.first_name = Some(first.to_string());
        self.last_name = Some(parts.collect::<Vec<_>>().join(" "));
    }

    pub fn is_empty(&self) -> bool {
        self.to_patch().is_empty()
    }

    /// JSON object form, as merged into a cached [`User`]
    pub fn to_patch(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// `PUT /auth/change-password/` body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "Vui lòng nhập mật khẩu hiện tại"))]
    pub current_password: String,
    #[validate(custom(function = "validation::new_password"))]
    pub new_password: String,
}

/// `POST /auth/register/` body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Vui lòng nhập tên đăng nhập"))]
    pub username: String,
    #[validate(length(min = 1, message = "Vui lòng nhập mật khẩu"))]
    pub password: String,
    #[validate(email(message = "Email không hợp lệ"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn user() -> User {
        serde_json::from_str(
            r#"{"id": 1, "username": "admin", "email": "a@b.vn", "first_name": "", "last_name": ""}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_display_name() {
        let mut u = user();
        assert_eq!(u.display_name(), "admin");
        u.first_name = "Minh".into();
        u.last_name = "Trần".into();
        assert_eq!(u.display_name(), "Minh Trần");
    }

    #[test]
    fn test_merge_profile_update() {
        let mut u = user();
        let patch = ProfileUpdate {
            first_name: Some("Lan".into()),
            phone_number: Some("0901234567".into()),
            ..Default::default()
        }
        .to_patch();
        assert!(u.merge(&patch));
        assert_eq!(u.first_name, "Lan");
        assert_eq!(u.phone_number.as_deref(), Some("0901234567"));
        assert_eq!(u.email, "a@b.vn");
    }

    #[test]
    fn test_full_name_split() {
        let mut update = ProfileUpdate::default();
        assert!(update.is_empty());
        update.set_full_name("   ");
        assert!(update.is_empty());
        update.set_full_name(" Trần  Thị Lan ");
        assert_eq!(update.first_name.as_deref(), Some("Trần"));
        assert_eq!(update.last_name.as_deref(), Some("Thị Lan"));
        update.set_full_name("Minh");
        assert_eq!(update.last_name.as_deref(), Some(""));
        assert!(!update.is_empty());
    }

    #[test]
    fn test_merge_rejects_bad_types() {
        let mut u = user();
        let mut patch = Map::new();
        patch.insert("id".into(), Value::String("x".into()));
        assert!(!u.merge(&patch));
        assert_eq!(u.id, 1);
    }

    #[test]
    fn test_password_and_register_rules() {
        let short = PasswordChange {
            current_password: "old".into(),
            new_password: "12345".into(),
        };
        assert!(check(&short).is_err());

        let missing = RegisterRequest {
            username: "bep".into(),
            password: "secret1".into(),
            email: String::new(),
            ..Default::default()
        };
        assert!(check(&missing).is_err());
    }
}
