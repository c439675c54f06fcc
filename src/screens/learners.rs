use crate::domain::entity::EntityKind;
use crate::domain::learner::Learner;
use crate::list::filters::FilterSpec;
use crate::screens::{Screen, or_dash};

pub struct LearnersScreen;

impl Screen for LearnersScreen {
    const KIND: EntityKind = EntityKind::Learners;
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Team", "Progress", "Courses"];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec {
        key: "team",
        label: "Team",
        options: &[],
    }];

    type Item = Learner;

    fn row_id(item: &Learner) -> i64 {
        item.id.get()
    }

    fn row_cells(item: &Learner) -> Vec<String> {
        vec![
            item.name.clone(),
            item.email.clone(),
            or_dash(item.team.as_deref()),
            item.progress
                .map(|progress| progress.to_string())
                .unwrap_or_else(|| "-".to_string()),
            item.enrolled_courses.to_string(),
        ]
    }
}
