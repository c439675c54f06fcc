//! Access to the remote LMS REST API.
//!
//! The console has no database of its own; every screen reads and writes
//! through [`EntityGateway`]. Items travel as loosely typed JSON until the
//! screen that requested them decodes them into domain entities.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entity::EntityKind;
use crate::domain::list::{ListQuery, ListResponse};
use crate::gateway::errors::ApiResult;

pub mod envelope;
pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Result of a bulk CSV import.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportOutcome {
    #[serde(default)]
    pub imported: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default)]
    pub message: Option<String>,
}

/// A file returned by an export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub content_type: String,
    /// Name suggested by the backend's `Content-Disposition` header.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait EntityReader: Send + Sync {
    async fn list(&self, kind: EntityKind, query: &ListQuery) -> ApiResult<ListResponse<Value>>;
    async fn get(&self, kind: EntityKind, id: i64) -> ApiResult<Value>;
    async fn export(&self, kind: EntityKind, query: &ListQuery, format: &str)
    -> ApiResult<ExportFile>;
}

#[async_trait]
pub trait EntityWriter: Send + Sync {
    async fn create(&self, kind: EntityKind, payload: &Value) -> ApiResult<Value>;
    async fn update(&self, kind: EntityKind, id: i64, payload: &Value) -> ApiResult<Value>;
    async fn delete(&self, kind: EntityKind, id: i64) -> ApiResult<()>;
    async fn import_csv(
        &self,
        kind: EntityKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<ImportOutcome>;
}

/// Everything a screen needs from the backend.
pub trait EntityGateway: EntityReader + EntityWriter {}

impl<T: EntityReader + EntityWriter + ?Sized> EntityGateway for T {}

/// Gateway handle shared between request handlers and cached fetches.
pub type SharedGateway = Arc<dyn EntityGateway>;
