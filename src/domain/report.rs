use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::Percentage;

/// Which report tab a row belongs to. Switching tabs restarts pagination.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Completion,
    Enrollment,
    Revenue,
}

impl ReportKind {
    pub const fn code(self) -> &'static str {
        match self {
            ReportKind::Completion => "completion",
            ReportKind::Enrollment => "enrollment",
            ReportKind::Revenue => "revenue",
        }
    }

    /// Unknown or missing codes fall back to the completion report.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("enrollment") => ReportKind::Enrollment,
            Some("revenue") => ReportKind::Revenue,
            _ => ReportKind::Completion,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub id: i64,
    pub course: String,
    #[serde(default)]
    pub learner: Option<String>,
    #[serde(default)]
    pub completion: Option<Percentage>,
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Option<f64>,
}
