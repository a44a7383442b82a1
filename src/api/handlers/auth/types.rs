//! Request/response types for auth endpoints.
//!
//! Request fields are optional so a missing field reaches the service as a
//! validation failure instead of a deserialization rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Identity, Profile};

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub login: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<Identity> for UserSummary {
    fn from(identity: Identity) -> Self {
        Self {
            login: identity.login,
            first_name: identity.first_name,
            last_name: identity.last_name,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    /// Time of the last logout as reported by the client's marker cookie.
    pub last_logged: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            last_logged: profile.last_logged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use serde_json::json;

    #[test]
    fn register_request_tolerates_missing_fields() -> Result<()> {
        let request: RegisterRequest = serde_json::from_value(json!({ "login": "alice" }))?;
        assert_eq!(request.login.as_deref(), Some("alice"));
        assert!(request.name.is_none());
        assert!(request.password.is_none());
        Ok(())
    }

    #[test]
    fn login_response_uses_camel_case_user() -> Result<()> {
        let response = LoginResponse {
            message: "Logged in".to_string(),
            user: UserSummary {
                login: "alice".to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
            },
        };
        let value = serde_json::to_value(&response)?;
        let first_name = value
            .pointer("/user/firstName")
            .and_then(serde_json::Value::as_str)
            .context("missing firstName")?;
        assert_eq!(first_name, "Alice");
        assert!(value.pointer("/user/first_name").is_none());
        Ok(())
    }

    #[test]
    fn profile_response_serializes_null_last_logged() -> Result<()> {
        let response = ProfileResponse::from(Profile {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            last_logged: None,
        });
        let value = serde_json::to_value(&response)?;
        assert_eq!(
            value,
            json!({ "firstName": "Alice", "lastName": "Liddell", "lastLogged": null })
        );
        Ok(())
    }
}
