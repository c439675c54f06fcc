//! Mock gateway implementation for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::domain::entity::EntityKind;
use crate::domain::list::{ListQuery, ListResponse};
use crate::gateway::errors::ApiResult;
use crate::gateway::{EntityReader, EntityWriter, ExportFile, ImportOutcome};

mock! {
    pub Gateway {}

    #[async_trait]
    impl EntityReader for Gateway {
        async fn list(&self, kind: EntityKind, query: &ListQuery) -> ApiResult<ListResponse<Value>>;
        async fn get(&self, kind: EntityKind, id: i64) -> ApiResult<Value>;
        async fn export(
            &self,
            kind: EntityKind,
            query: &ListQuery,
            format: &str,
        ) -> ApiResult<ExportFile>;
    }

    #[async_trait]
    impl EntityWriter for Gateway {
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
}
