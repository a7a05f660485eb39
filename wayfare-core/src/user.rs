use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::validation::{check_email, check_password, provided, required};
use crate::{CoreError, CoreResult};

pub const NOT_A_MANAGER: &str = "Only managers can approve or reject requests";
pub const NOT_LINE_MANAGER: &str = "You are not the manager of this requester";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Requester,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Requester => "REQUESTER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REQUESTER" => Ok(Role::Requester),
            "MANAGER" => Ok(Role::Manager),
            "ADMIN" => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Authentication principal. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(profile: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            password_hash,
            role: Role::Requester,
            manager_id: profile.manager_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Admins decide on anyone's requests; managers only on their reports'.
    pub fn ensure_can_decide_for(&self, requester: &User) -> CoreResult<()> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Manager if requester.manager_id == Some(self.id) => Ok(()),
            Role::Manager => Err(CoreError::Forbidden(NOT_LINE_MANAGER.to_string())),
            Role::Requester => Err(CoreError::Forbidden(NOT_A_MANAGER.to_string())),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Login body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Returns `(normalized email, password)`.
    pub fn validate(&self) -> CoreResult<(String, String)> {
        let email = required(&self.email, "email")?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CoreError::Validation(crate::validation::required_message("password")))?;
        Ok((normalize_email(email), password.to_string()))
    }
}

/// Signup body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub manager_id: Option<String>,
}

/// Validated signup input; the plain password is kept apart so it can be hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub manager_id: Option<Uuid>,
}

impl SignupDetails {
    pub fn validate(&self) -> CoreResult<(NewUser, String)> {
        let first_name = required(&self.first_name, "firstName")?;
        let last_name = required(&self.last_name, "lastName")?;
        let email = required(&self.email, "email")?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CoreError::Validation(crate::validation::required_message("password")))?;

        check_email(email)?;
        check_password(password)?;
        let manager_id = provided(&self.manager_id)
            .map(|id| crate::validation::parse_uuid_field(id, "managerId"))
            .transpose()?;

        Ok((
            NewUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: normalize_email(email),
                manager_id,
            },
            password.to_string(),
        ))
    }
}
