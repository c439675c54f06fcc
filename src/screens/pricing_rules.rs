use crate::domain::entity::EntityKind;
use crate::domain::pricing_rule::{PricingRule, PricingRulePayload};
use crate::forms::pricing_rules::PricingRuleForm;
use crate::list::filters::FilterSpec;
use crate::screens::{EditableScreen, Screen, or_dash};

pub struct PricingRulesScreen;

impl Screen for PricingRulesScreen {
    const KIND: EntityKind = EntityKind::PricingRules;
    const COLUMNS: &'static [&'static str] = &[
        "Name",
        "Course",
        "Price",
        "Discount",
        "Effective price",
        "Active",
        "Valid",
    ];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec {
        key: "active",
        label: "State",
        options: &[("1", "Active"), ("0", "Inactive")],
    }];

    type Item = PricingRule;

    fn row_id(item: &PricingRule) -> i64 {
        item.id.get()
    }

    fn row_cells(item: &PricingRule) -> Vec<String> {
        let validity = match (item.starts_on, item.ends_on) {
            (None, None) => "Always".to_string(),
            (Some(start), None) => format!("From {start}"),
            (None, Some(end)) => format!("Until {end}"),
            (Some(start), Some(end)) => format!("{start} - {end}"),
        };
        vec![
            item.name.clone(),
            or_dash(item.course.as_deref()),
            item.price.to_string(),
            item.discount_percent
                .map(|discount| discount.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format!("{:.2}", item.effective_price()),
            if item.active { "Yes" } else { "No" }.to_string(),
            validity,
        ]
    }
}

impl EditableScreen for PricingRulesScreen {
    type Form = PricingRuleForm;
    type Payload = PricingRulePayload;

    fn form_for(item: &PricingRule) -> PricingRuleForm {
        PricingRuleForm::from_rule(item)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_show_the_discounted_price() {
        let rule: PricingRule = serde_json::from_value(json!({
            "id": 2,
            "name": "Spring",
            "course": "Rust 101",
            "price": 100.0,
            "discount_percent": 15,
            "active": true,
            "starts_on": "2026-03-01"
        }))
        .unwrap();

        assert_eq!(
            PricingRulesScreen::row_cells(&rule),
            vec!["Spring", "Rust 101", "100.00", "15%", "85.00", "Yes", "From 2026-03-01"]
        );
    }
}
