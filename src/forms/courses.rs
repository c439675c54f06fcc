use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::course::{Course, CoursePayload, CourseStatus};
use crate::domain::types::{Amount, CourseTitle};
use crate::forms::{FormError, parse_optional};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
/// Create/edit course dialog.
pub struct CourseForm {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub status: String,
    /// Blank for a free course.
    #[serde(default)]
    pub price: String,
}

impl CourseForm {
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            status: course.status.code().to_string(),
            price: course.price.map(|price| price.to_string()).unwrap_or_default(),
        }
    }
}

impl TryFrom<CourseForm> for CoursePayload {
    type Error = FormError;

    fn try_from(form: CourseForm) -> Result<Self, Self::Error> {
        let title = CourseTitle::new(form.title).map_err(|_| FormError::InvalidName)?;
        let status = CourseStatus::from_code(&form.status);
        if !status.is_assignable() {
            return Err(FormError::InvalidStatus);
        }
        let price = parse_optional::<f64>(&form.price, FormError::InvalidAmount)?
            .map(|price| Amount::new(price).map_err(|_| FormError::InvalidAmount))
            .transpose()?;

        Ok(Self {
            title,
            status,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_prices_are_rejected() {
        let result = CoursePayload::try_from(CourseForm {
            title: "Rust 101".to_string(),
            status: "draft".to_string(),
            price: "-5".to_string(),
        });

        assert!(matches!(result, Err(FormError::InvalidAmount)));
    }

    #[test]
    fn edit_form_round_trips_the_course() {
        let course = Course {
            id: crate::domain::types::CourseId::new(3).unwrap(),
            title: "Rust 101".to_string(),
            status: CourseStatus::Published,
            price: Some(Amount::new(49.5).unwrap()),
            enrolled: 12,
        };

        let form = CourseForm::from_course(&course);
        assert_eq!(form.price, "49.50");

        let payload = CoursePayload::try_from(form).unwrap();
        assert_eq!(payload.status, CourseStatus::Published);
        assert_eq!(payload.price.map(Amount::get), Some(49.5));
    }

    #[test]
    fn unknown_statuses_cannot_be_submitted() {
        let result = CoursePayload::try_from(CourseForm {
            title: "Rust 101".to_string(),
            status: "future".to_string(),
            price: String::new(),
        });

        assert!(matches!(result, Err(FormError::InvalidStatus)));
    }
}
