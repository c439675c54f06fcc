//! Per-entity configuration of the generic list screen.
//!
//! A screen names its entity, the type its rows decode into, its columns and
//! its filters. Everything else (search, paging, caching, dialogs) is shared.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::domain::entity::EntityKind;
use crate::forms::FormError;
use crate::list::filters::FilterSpec;

pub mod audit_logs;
pub mod courses;
pub mod facilitators;
pub mod learners;
pub mod pricing_rules;
pub mod reports;
pub mod teams;
pub mod users;

/// One rendered table row.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub cells: Vec<String>,
}

pub trait Screen: Send + Sync + 'static {
    const KIND: EntityKind;
    /// Column headings in display order. Also the CSV header.
    const COLUMNS: &'static [&'static str];
    const FILTERS: &'static [FilterSpec] = &[];

    type Item: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;

    fn row_id(item: &Self::Item) -> i64;

    /// Display text of every column, in [`Screen::COLUMNS`] order.
    fn row_cells(item: &Self::Item) -> Vec<String>;

    fn row(item: &Self::Item) -> Row {
        Row {
            id: Self::row_id(item),
            cells: Self::row_cells(item),
        }
    }
}

/// Screens whose rows can be created, edited and deleted.
pub trait EditableScreen: Screen {
    type Form: DeserializeOwned + Serialize + Validate + Default + Clone + Send + 'static;
    type Payload: Serialize + TryFrom<Self::Form, Error = FormError>;

    /// Pre-filled form for the edit dialog.
    fn form_for(item: &Self::Item) -> Self::Form;

    /// Validates the form and builds the JSON body for the backend. Nothing
    /// is sent when this fails.
    fn payload(form: Self::Form) -> Result<Value, FormError> {
        form.validate()?;
        let payload = Self::Payload::try_from(form)?;
        Ok(serde_json::to_value(&payload)?)
    }
}

fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}
