//! Forms for the users screen.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::types::{Email, PersonName, TeamId};
use crate::domain::user::{Role, User, UserPayload};
use crate::forms::{FormError, optional_text, parse_optional};

/// Columns a bulk import file must provide, in any order.
pub const IMPORT_HEADERS: [&str; 3] = ["name", "email", "role"];

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
/// Create/edit user dialog.
pub struct UserForm {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub region: String,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.code().to_string(),
            team_id: String::new(),
            region: user.region.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<UserForm> for UserPayload {
    type Error = FormError;

    fn try_from(form: UserForm) -> Result<Self, Self::Error> {
        let name = PersonName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let email = Email::new(form.email).map_err(|_| FormError::InvalidEmail)?;
        let role = assignable_role(&form.role)?;
        let team_id = parse_optional::<i64>(&form.team_id, FormError::InvalidId)?
            .map(TeamId::new)
            .transpose()?;

        Ok(Self {
            name,
            email,
            role,
            team_id,
            region: optional_text(&form.region),
        })
    }
}

/// Only the four canonical roles may be assigned from the console.
fn assignable_role(code: &str) -> Result<Role, FormError> {
    let role = Role::from_code(code.trim());
    if Role::ASSIGNABLE.contains(&role) {
        Ok(role)
    } else {
        Err(FormError::InvalidRole)
    }
}

/// Checks a bulk import file before it is sent to the backend and returns the
/// number of data rows. The whole file is rejected on the first bad row.
pub fn validate_import_csv(bytes: &[u8]) -> Result<usize, FormError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|header| header.eq_ignore_ascii_case(name));
    let (Some(name_at), Some(email_at), Some(role_at)) = (
        position(IMPORT_HEADERS[0]),
        position(IMPORT_HEADERS[1]),
        position(IMPORT_HEADERS[2]),
    ) else {
        return Err(FormError::Csv(format!(
            "expected columns: {}",
            IMPORT_HEADERS.join(", ")
        )));
    };

    let mut rows = 0;
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = index + 2;
        let field = |at: usize| record.get(at).unwrap_or_default();

        PersonName::new(field(name_at))
            .map_err(|_| FormError::Csv(format!("line {line}: name is required")))?;
        Email::new(field(email_at))
            .map_err(|_| FormError::Csv(format!("line {line}: invalid email")))?;
        assignable_role(field(role_at))
            .map_err(|_| FormError::Csv(format!("line {line}: unknown role")))?;
        rows += 1;
    }

    if rows == 0 {
        return Err(FormError::Csv("the file has no rows".to_string()));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> UserForm {
        UserForm {
            name: " Ada Lovelace ".to_string(),
            email: "ADA@example.com".to_string(),
            role: "group_leader".to_string(),
            team_id: "4".to_string(),
            region: "".to_string(),
        }
    }

    #[test]
    fn form_converts_into_payload() {
        let payload = UserPayload::try_from(form()).unwrap();

        assert_eq!(payload.name.as_str(), "Ada Lovelace");
        assert_eq!(payload.email.as_str(), "ada@example.com");
        assert_eq!(payload.role, Role::Manager);
        assert_eq!(payload.team_id.map(TeamId::get), Some(4));
        assert_eq!(payload.region, None);
    }

    #[test]
    fn unassignable_roles_are_rejected() {
        let form = UserForm {
            role: "shop_manager".to_string(),
            ..form()
        };
        assert!(matches!(
            UserPayload::try_from(form),
            Err(FormError::InvalidRole)
        ));
    }

    #[test]
    fn validation_messages_are_attached_to_fields() {
        let form = UserForm {
            email: "not-an-email".to_string(),
            ..form()
        };
        let err = FormError::from(form.validate().unwrap_err());
        assert_eq!(err.field_errors()["email"], "Enter a valid email address");
    }

    #[test]
    fn import_csv_is_checked_row_by_row() {
        let good = "\u{feff}Email,Name,Role\nada@example.com,Ada,subscriber\nbob@example.com,Bob,group_leader\n";
        assert_eq!(validate_import_csv(good.as_bytes()).unwrap(), 2);

        let missing_column = "name,email\nAda,ada@example.com\n";
        assert!(validate_import_csv(missing_column.as_bytes()).is_err());

        let bad_email = "name,email,role\nAda,ada@example.com,subscriber\nBob,bob,subscriber\n";
        let err = validate_import_csv(bad_email.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "invalid csv file: line 3: invalid email");

        assert!(validate_import_csv(b"name,email,role\n").is_err());
    }
}
