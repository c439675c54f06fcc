//! Bulk import of users from a CSV file.

use crate::domain::entity::EntityKind;
use crate::forms::import::UploadUsersForm;
use crate::gateway::SharedGateway;
use crate::list::actions::Notice;
use crate::query::QueryCache;
use crate::services::{ServiceError, ServiceResult};

/// Validates the uploaded file locally, then hands it to the backend. The
/// users cache is invalidated only after the backend accepted the file.
pub async fn import_users(
    gateway: &SharedGateway,
    cache: &QueryCache,
    form: &UploadUsersForm,
) -> ServiceResult<Notice> {
    let file = form.parse().map_err(|err| {
        log::error!("Rejected users import file: {err}");
        ServiceError::from(err)
    })?;

    let outcome = gateway
        .import_csv(EntityKind::Users, &file.file_name, file.bytes)
        .await
        .map_err(|err| {
            log::error!("Failed to import users: {err}");
            ServiceError::from(err)
        })?;

    cache.invalidate(EntityKind::Users);

    let imported = if outcome.imported > 0 {
        outcome.imported
    } else {
        file.rows
    };
    let message = match (outcome.skipped, outcome.message) {
        (_, Some(message)) if !message.is_empty() => message,
        (0, _) => format!("Imported {imported} users."),
        (skipped, _) => format!("Imported {imported} users, skipped {skipped}."),
    };
    Ok(Notice::success(message))
}
