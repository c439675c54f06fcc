use serde::{Deserialize, Serialize};

use crate::domain::types::{FacilitatorId, LearnerId, Percentage};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Learner {
    pub id: LearnerId,
    #[serde(alias = "display_name")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub progress: Option<Percentage>,
    #[serde(default, alias = "courses")]
    pub enrolled_courses: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Facilitator {
    pub id: FacilitatorId,
    #[serde(alias = "display_name")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default, alias = "learners")]
    pub learner_count: u32,
}
