use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, CourseId, Percentage, PricingRuleId, RuleName};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PricingRule {
    pub id: PricingRuleId,
    pub name: String,
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub course: Option<String>,
    pub price: Amount,
    #[serde(default)]
    pub discount_percent: Option<Percentage>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
}

impl PricingRule {
    /// Price after the rule's discount is applied.
    pub fn effective_price(&self) -> f64 {
        let discount = self.discount_percent.map(Percentage::get).unwrap_or(0);
        self.price.get() * f64::from(100 - discount) / 100.0
    }
}

/// Body sent to the backend when creating or updating a pricing rule.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PricingRulePayload {
    pub name: RuleName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    pub price: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<Percentage>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
}
