use crate::domain::course::{Course, CoursePayload};
use crate::domain::entity::EntityKind;
use crate::forms::courses::CourseForm;
use crate::list::filters::FilterSpec;
use crate::screens::{EditableScreen, Screen};

pub struct CoursesScreen;

impl Screen for CoursesScreen {
    const KIND: EntityKind = EntityKind::Courses;
    const COLUMNS: &'static [&'static str] = &["Title", "Status", "Price", "Enrolled"];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec {
        key: "status",
        label: "Status",
        options: &[
            ("published", "Published"),
            ("draft", "Draft"),
            ("private", "Private"),
        ],
    }];

    type Item = Course;

    fn row_id(item: &Course) -> i64 {
        item.id.get()
    }

    fn row_cells(item: &Course) -> Vec<String> {
        vec![
            item.title.clone(),
            item.status.label().to_string(),
            item.price
                .map(|price| price.to_string())
                .unwrap_or_else(|| "Free".to_string()),
            item.enrolled.to_string(),
        ]
    }
}

impl EditableScreen for CoursesScreen {
    type Form = CourseForm;
    type Payload = CoursePayload;

    fn form_for(item: &Course) -> CourseForm {
        CourseForm::from_course(item)
    }
}
