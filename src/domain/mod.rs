//! Domain entities exposed by the LMS backend and the list primitives shared
//! by every screen.

pub mod audit_log;
pub mod course;
pub mod entity;
pub mod learner;
pub mod list;
pub mod pricing_rule;
pub mod report;
pub mod team;
pub mod types;
pub mod user;
