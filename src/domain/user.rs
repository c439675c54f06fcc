use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, PersonName, TeamId, UserId};

/// Console role derived from the WordPress role code.
///
/// The same mapping is used when editing and when viewing a user:
/// `group_leader` is a manager and `group_leader_clone` is a facilitator.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Administrator,
    Manager,
    Facilitator,
    #[default]
    Learner,
    Other(String),
}

impl Role {
    /// Roles offered in the create/edit dialogs.
    pub const ASSIGNABLE: [Role; 4] = [
        Role::Administrator,
        Role::Manager,
        Role::Facilitator,
        Role::Learner,
    ];

    pub fn code(&self) -> &str {
        match self {
            Role::Administrator => "administrator",
            Role::Manager => "group_leader",
            Role::Facilitator => "group_leader_clone",
            Role::Learner => "subscriber",
            Role::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Role::Administrator => "Administrator",
            Role::Manager => "Manager",
            Role::Facilitator => "Facilitator",
            Role::Learner => "Learner",
            Role::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "administrator" => Role::Administrator,
            "group_leader" => Role::Manager,
            "group_leader_clone" => Role::Facilitator,
            "subscriber" => Role::Learner,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_code(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.code().to_string()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Account state. Codes the console does not know are kept as they are.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Pending,
    Other(String),
}

impl UserStatus {
    pub fn code(&self) -> &str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Pending => "pending",
            UserStatus::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Pending => "Pending",
            UserStatus::Other(code) => code,
        }
    }
}

impl From<String> for UserStatus {
    fn from(value: String) -> Self {
        match value.trim() {
            "active" => UserStatus::Active,
            "inactive" => UserStatus::Inactive,
            "pending" => UserStatus::Pending,
            other => UserStatus::Other(other.to_string()),
        }
    }
}

impl From<UserStatus> for String {
    fn from(value: UserStatus) -> Self {
        value.code().to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    #[serde(alias = "display_name")]
    pub name: String,
    #[serde(alias = "user_email")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Body sent to the backend when creating or updating a user.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserPayload {
    pub name: PersonName,
    pub email: Email,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}
