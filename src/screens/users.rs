use crate::domain::entity::EntityKind;
use crate::domain::user::{User, UserPayload};
use crate::forms::users::UserForm;
use crate::list::filters::FilterSpec;
use crate::screens::{EditableScreen, Screen, or_dash};

pub struct UsersScreen;

impl Screen for UsersScreen {
    const KIND: EntityKind = EntityKind::Users;
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Role", "Status", "Team", "Region"];
    const FILTERS: &'static [FilterSpec] = &[
        FilterSpec {
            key: "role",
            label: "Role",
            options: &[
                ("administrator", "Administrator"),
                ("group_leader", "Manager"),
                ("group_leader_clone", "Facilitator"),
                ("subscriber", "Learner"),
            ],
        },
        FilterSpec {
            key: "status",
            label: "Status",
            options: &[
                ("active", "Active"),
                ("inactive", "Inactive"),
                ("pending", "Pending"),
            ],
        },
        FilterSpec {
            key: "region",
            label: "Region",
            options: &[],
        },
    ];

    type Item = User;

    fn row_id(item: &User) -> i64 {
        item.id.get()
    }

    fn row_cells(item: &User) -> Vec<String> {
        vec![
            item.name.clone(),
            item.email.clone(),
            item.role.label().to_string(),
            item.status.label().to_string(),
            or_dash(item.team.as_deref()),
            or_dash(item.region.as_deref()),
        ]
    }
}

impl EditableScreen for UsersScreen {
    type Form = UserForm;
    type Payload = UserPayload;

    fn form_for(item: &User) -> UserForm {
        UserForm::from_user(item)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::user::Role;

    #[test]
    fn role_filter_matches_the_canonical_mapping() {
        let role = UsersScreen::FILTERS[0];
        for (code, label) in role.options {
            assert_eq!(Role::from_code(code).label(), *label);
        }
    }

    #[test]
    fn rows_show_labels_and_dashes() {
        let user: User = serde_json::from_value(json!({
            "id": 5,
            "name": "Ada",
            "email": "ada@example.com",
            "role": "group_leader",
        }))
        .unwrap();

        let row = UsersScreen::row(&user);
        assert_eq!(row.id, 5);
        assert_eq!(
            row.cells,
            vec!["Ada", "ada@example.com", "Manager", "Active", "-", "-"]
        );
        assert_eq!(row.cells.len(), UsersScreen::COLUMNS.len());
    }

    #[test]
    fn invalid_forms_produce_no_payload() {
        let form = UserForm {
            name: String::new(),
            email: "ada@example.com".to_string(),
            role: "subscriber".to_string(),
            ..UserForm::default()
        };
        let err = UsersScreen::payload(form).unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn payload_uses_wordpress_role_codes() {
        let form = UserForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "group_leader_clone".to_string(),
            ..UserForm::default()
        };
        let payload = UsersScreen::payload(form).unwrap();
        assert_eq!(
            payload,
            json!({"name": "Ada", "email": "ada@example.com", "role": "group_leader_clone"})
        );
    }
}
