use serde::{Deserialize, Serialize};

use crate::domain::types::{TeamId, TeamName, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Display name of the team manager, if one is assigned.
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default, alias = "members")]
    pub member_count: u32,
    #[serde(default)]
    pub region: Option<String>,
}

/// Body sent to the backend when creating or updating a team.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TeamPayload {
    pub name: TeamName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}
