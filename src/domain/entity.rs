//! Entity kinds managed by the console screens.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Every entity type that has its own list screen.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Users,
    Teams,
    PricingRules,
    Courses,
    Learners,
    Facilitators,
    AuditLogs,
    Reports,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Users,
        EntityKind::Teams,
        EntityKind::PricingRules,
        EntityKind::Courses,
        EntityKind::Learners,
        EntityKind::Facilitators,
        EntityKind::AuditLogs,
        EntityKind::Reports,
    ];

    /// Path segment used both by the backend REST API and the console routes.
    pub const fn slug(self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Teams => "teams",
            EntityKind::PricingRules => "pricing-rules",
            EntityKind::Courses => "courses",
            EntityKind::Learners => "learners",
            EntityKind::Facilitators => "facilitators",
            EntityKind::AuditLogs => "audit-logs",
            EntityKind::Reports => "reports",
        }
    }

    /// Human readable screen title.
    pub const fn title(self) -> &'static str {
        match self {
            EntityKind::Users => "Users",
            EntityKind::Teams => "Teams",
            EntityKind::PricingRules => "Pricing rules",
            EntityKind::Courses => "Courses",
            EntityKind::Learners => "Learners",
            EntityKind::Facilitators => "Facilitators",
            EntityKind::AuditLogs => "Audit log",
            EntityKind::Reports => "Reports",
        }
    }

    /// Singular noun used in notifications ("User created.").
    pub const fn noun(self) -> &'static str {
        match self {
            EntityKind::Users => "User",
            EntityKind::Teams => "Team",
            EntityKind::PricingRules => "Pricing rule",
            EntityKind::Courses => "Course",
            EntityKind::Learners => "Learner",
            EntityKind::Facilitators => "Facilitator",
            EntityKind::AuditLogs => "Audit log entry",
            EntityKind::Reports => "Report row",
        }
    }

    /// Lowercase plural used in empty-state copy.
    pub const fn plural(self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Teams => "teams",
            EntityKind::PricingRules => "pricing rules",
            EntityKind::Courses => "courses",
            EntityKind::Learners => "learners",
            EntityKind::Facilitators => "facilitators",
            EntityKind::AuditLogs => "audit log entries",
            EntityKind::Reports => "report rows",
        }
    }

    /// Whether the backend accepts create/update/delete calls for this entity.
    pub const fn is_mutable(self) -> bool {
        matches!(
            self,
            EntityKind::Users | EntityKind::Teams | EntityKind::PricingRules | EntityKind::Courses
        )
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EntityKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}
