//! Normalization of the LMS response envelopes.
//!
//! Endpoints disagree on where they put list items and pagination metadata.
//! Everything is folded into [`ListResponse`] and plain entity values here so
//! the rest of the console never sees the raw shapes.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::list::{ListQuery, ListResponse, total_pages};
use crate::gateway::errors::{ApiError, ApiResult};

/// Pagination headers sent by the WordPress REST API for bare array bodies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PaginationHeaders {
    pub total: Option<usize>,
    pub total_pages: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(alias = "items", alias = "results")]
    data: Vec<Value>,
    #[serde(default, alias = "total_items", alias = "count")]
    total: Option<usize>,
    #[serde(default)]
    total_pages: Option<usize>,
    #[serde(default, alias = "page")]
    current_page: Option<usize>,
}

/// `{ success, message }` wrapper used by mutation endpoints.
#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

/// WordPress `WP_Error` body.
#[derive(Debug, Deserialize)]
struct WpErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<WpErrorData>,
}

#[derive(Debug, Deserialize)]
struct WpErrorData {
    #[serde(default)]
    params: BTreeMap<String, String>,
}

/// Folds any supported list envelope into a [`ListResponse`].
pub fn normalize_list(
    body: Value,
    headers: PaginationHeaders,
    query: &ListQuery,
) -> ApiResult<ListResponse<Value>> {
    match body {
        Value::Array(items) => {
            let total = headers.total.unwrap_or(items.len());
            let mut response = ListResponse::new(items, total, query.page(), query.per_page());
            if let Some(pages) = headers.total_pages {
                response.total_pages = pages;
            }
            Ok(response)
        }
        Value::Object(mut map) => {
            // `{ success: true, data: { items, total, ... } }`
            if matches!(map.get("data"), Some(Value::Object(_))) {
                if let Some(inner) = map.remove("data") {
                    return normalize_list(inner, headers, query);
                }
            }
            let envelope: ListEnvelope = serde_json::from_value(Value::Object(map))?;
            let total = envelope
                .total
                .or(headers.total)
                .unwrap_or(envelope.data.len());
            let current_page = envelope.current_page.unwrap_or(query.page());
            let mut response =
                ListResponse::new(envelope.data, total, current_page, query.per_page());
            if let Some(pages) = envelope.total_pages.or(headers.total_pages) {
                response.total_pages = pages;
            } else {
                response.total_pages = total_pages(total, query.per_page());
            }
            Ok(response)
        }
        other => Err(ApiError::Decode(format!(
            "expected a list envelope, got {}",
            kind_of(&other)
        ))),
    }
}

/// Unwraps a mutation response into the entity (or `Null`).
///
/// `success: false` becomes a business or validation error depending on
/// whether the backend named offending fields.
pub fn normalize_mutation(body: Value) -> ApiResult<Value> {
    let is_envelope = body
        .as_object()
        .is_some_and(|map| matches!(map.get("success"), Some(Value::Bool(_))));
    if !is_envelope {
        return Ok(body);
    }

    let envelope: MutationEnvelope = serde_json::from_value(body)?;
    if envelope.success {
        return Ok(envelope.data.unwrap_or(Value::Null));
    }

    let message = envelope
        .message
        .unwrap_or_else(|| "The request was rejected".to_string());
    if envelope.errors.is_empty() {
        Err(ApiError::Business(message))
    } else {
        Err(ApiError::Validation {
            message,
            fields: envelope.errors,
        })
    }
}

/// Maps a non-success HTTP status and its body to an [`ApiError`].
pub fn error_from_status(status: u16, body: &str) -> ApiError {
    if status == 404 {
        return ApiError::NotFound;
    }

    let parsed = serde_json::from_str::<Value>(body).ok();

    if let Some(value) = &parsed {
        if value.get("success").is_some() {
            if let Err(err) = normalize_mutation(value.clone()) {
                return err;
            }
        }
    }

    let wp_error = parsed.and_then(|value| serde_json::from_value::<WpErrorBody>(value).ok());
    let message = wp_error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| truncate(body, 200));

    match (status, wp_error) {
        (400 | 422, Some(err)) => {
            let fields = err.data.map(|d| d.params).unwrap_or_default();
            if fields.is_empty() && err.code.as_deref() != Some("rest_invalid_param") {
                ApiError::Business(message)
            } else {
                ApiError::Validation { message, fields }
            }
        }
        (409, _) => ApiError::Business(message),
        _ => ApiError::Status { status, message },
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
