use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::team::{Team, TeamPayload};
use crate::domain::types::{TeamName, UserId};
use crate::forms::{FormError, optional_text, parse_optional};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
/// Create/edit team dialog.
pub struct TeamForm {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Id of the user leading the team, blank for none.
    #[serde(default)]
    pub manager_id: String,
    #[serde(default)]
    pub region: String,
}

impl TeamForm {
    pub fn from_team(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            manager_id: String::new(),
            region: team.region.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<TeamForm> for TeamPayload {
    type Error = FormError;

    fn try_from(form: TeamForm) -> Result<Self, Self::Error> {
        let name = TeamName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let manager_id = parse_optional::<i64>(&form.manager_id, FormError::InvalidId)?
            .map(UserId::new)
            .transpose()?;

        Ok(Self {
            name,
            manager_id,
            region: optional_text(&form.region),
        })
    }
}
