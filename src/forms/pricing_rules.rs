use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::pricing_rule::{PricingRule, PricingRulePayload};
use crate::domain::types::{Amount, CourseId, Percentage, RuleName};
use crate::forms::{FormError, parse_optional};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
/// Create/edit pricing rule dialog.
pub struct PricingRuleForm {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub course_id: String,
    #[validate(length(min = 1, message = "Price is required"))]
    pub price: String,
    #[serde(default)]
    pub discount_percent: String,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub starts_on: String,
    #[serde(default)]
    pub ends_on: String,
}

impl PricingRuleForm {
    pub fn from_rule(rule: &PricingRule) -> Self {
        let date = |date: Option<NaiveDate>| {
            date.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        Self {
            name: rule.name.clone(),
            course_id: rule.course_id.map(|id| id.to_string()).unwrap_or_default(),
            price: rule.price.to_string(),
            discount_percent: rule
                .discount_percent
                .map(|p| p.get().to_string())
                .unwrap_or_default(),
            active: rule.active.then(|| "on".to_string()),
            starts_on: date(rule.starts_on),
            ends_on: date(rule.ends_on),
        }
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FormError::InvalidDate)
}

impl TryFrom<PricingRuleForm> for PricingRulePayload {
    type Error = FormError;

    fn try_from(form: PricingRuleForm) -> Result<Self, Self::Error> {
        let name = RuleName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let course_id = parse_optional::<i64>(&form.course_id, FormError::InvalidId)?
            .map(CourseId::new)
            .transpose()?;
        let price = form
            .price
            .trim()
            .parse::<f64>()
            .map_err(|_| FormError::InvalidAmount)
            .and_then(|price| Amount::new(price).map_err(|_| FormError::InvalidAmount))?;
        let discount_percent = parse_optional::<u8>(&form.discount_percent, FormError::InvalidPercentage)?
            .map(|p| Percentage::new(p).map_err(|_| FormError::InvalidPercentage))
            .transpose()?;
        let starts_on = parse_date(&form.starts_on)?;
        let ends_on = parse_date(&form.ends_on)?;
        if matches!((starts_on, ends_on), (Some(start), Some(end)) if end < start) {
            return Err(FormError::InvalidDateRange);
        }

        Ok(Self {
            name,
            course_id,
            price,
            discount_percent,
            active: form.active.is_some(),
            starts_on,
            ends_on,
        })
    }
}
