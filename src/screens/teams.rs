use crate::domain::entity::EntityKind;
use crate::domain::team::{Team, TeamPayload};
use crate::forms::teams::TeamForm;
use crate::list::filters::FilterSpec;
use crate::screens::{EditableScreen, Screen, or_dash};

pub struct TeamsScreen;

impl Screen for TeamsScreen {
    const KIND: EntityKind = EntityKind::Teams;
    const COLUMNS: &'static [&'static str] = &["Name", "Manager", "Members", "Region"];
    const FILTERS: &'static [FilterSpec] = &[FilterSpec {
        key: "region",
        label: "Region",
        options: &[],
    }];

    type Item = Team;

    fn row_id(item: &Team) -> i64 {
        item.id.get()
    }

    fn row_cells(item: &Team) -> Vec<String> {
        vec![
            item.name.clone(),
            or_dash(item.manager.as_deref()),
            item.member_count.to_string(),
            or_dash(item.region.as_deref()),
        ]
    }
}

impl EditableScreen for TeamsScreen {
    type Form = TeamForm;
    type Payload = TeamPayload;

    fn form_for(item: &Team) -> TeamForm {
        TeamForm::from_team(item)
    }
}
