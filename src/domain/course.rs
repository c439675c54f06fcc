use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, CourseId, CourseTitle};

/// Publication state mirrored from the WordPress post status.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum CourseStatus {
    Published,
    #[default]
    Draft,
    Private,
    /// Any other post status, such as `future`, `pending` or `trash`.
    Other(String),
}

impl CourseStatus {
    /// Value sent to and accepted from the backend.
    pub fn code(&self) -> &str {
        match self {
            CourseStatus::Published => "published",
            CourseStatus::Draft => "draft",
            CourseStatus::Private => "private",
            CourseStatus::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "published" | "publish" => CourseStatus::Published,
            "draft" => CourseStatus::Draft,
            "private" => CourseStatus::Private,
            other => CourseStatus::Other(other.to_string()),
        }
    }

    /// Only the known statuses may be chosen in the course dialog.
    pub fn is_assignable(&self) -> bool {
        !matches!(self, CourseStatus::Other(_))
    }

    pub fn label(&self) -> &str {
        match self {
            CourseStatus::Published => "Published",
            CourseStatus::Draft => "Draft",
            CourseStatus::Private => "Private",
            CourseStatus::Other(code) => code,
        }
    }
}

impl From<String> for CourseStatus {
    fn from(value: String) -> Self {
        CourseStatus::from_code(&value)
    }
}

impl From<CourseStatus> for String {
    fn from(value: CourseStatus) -> Self {
        value.code().to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub id: CourseId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default)]
    pub price: Option<Amount>,
    #[serde(default, alias = "enrolled_count")]
    pub enrolled: u32,
}

/// Body sent to the backend when creating or updating a course.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoursePayload {
    pub title: CourseTitle,
    pub status: CourseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
}
