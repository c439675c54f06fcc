use crate::domain::entity::EntityKind;
use crate::domain::learner::Facilitator;
use crate::screens::Screen;

pub struct FacilitatorsScreen;

impl Screen for FacilitatorsScreen {
    const KIND: EntityKind = EntityKind::Facilitators;
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Teams", "Learners"];

    type Item = Facilitator;

    fn row_id(item: &Facilitator) -> i64 {
        item.id.get()
    }

    fn row_cells(item: &Facilitator) -> Vec<String> {
        let teams = if item.teams.is_empty() {
            "-".to_string()
        } else {
            item.teams.join(", ")
        };
        vec![
            item.name.clone(),
            item.email.clone(),
            teams,
            item.learner_count.to_string(),
        ]
    }
}
