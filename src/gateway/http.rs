//! reqwest-backed [`EntityGateway`] talking to the LMS REST API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::entity::EntityKind;
use crate::domain::list::{ListQuery, ListResponse};
use crate::gateway::envelope::{
    PaginationHeaders, error_from_status, normalize_list, normalize_mutation,
};
use crate::gateway::errors::{ApiError, ApiResult};
use crate::gateway::{EntityReader, EntityWriter, ExportFile, ImportOutcome};

const TOTAL_HEADER: &str = "x-wp-total";
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

fn default_timeout_secs() -> u64 {
    15
}

/// Connection settings for the LMS backend.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewaySettings {
    /// Base URL of the LMS namespace, e.g. `https://lms.example.com/wp-json/lms/v1`.
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    /// WordPress application password used for basic auth.
    #[serde(default)]
    pub app_password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone)]
pub struct LmsGateway {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl LmsGateway {
    pub fn new(settings: &GatewaySettings) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let credentials = match (&settings.username, &settings.app_password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn url(&self, kind: EntityKind, suffix: Option<&str>) -> String {
        match suffix {
            Some(suffix) => format!("{}/{}/{}", self.base_url, kind.slug(), suffix),
            None => format!("{}/{}", self.base_url, kind.slug()),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{method} {url}");
        let builder = self.client.request(method, url);
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, Some(password)),
            None => builder,
        }
    }

    /// Sends the request and turns non-success statuses into [`ApiError`].
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status.as_u16(), &body))
    }

    async fn send_json(&self, builder: RequestBuilder) -> ApiResult<(HeaderMap, Value)> {
        let response = self.send(builder).await?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok((headers, Value::Null));
        }
        Ok((headers, serde_json::from_slice(&bytes)?))
    }
}

fn header_usize(headers: &HeaderMap, name: &str) -> Option<usize> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn pagination_headers(headers: &HeaderMap) -> PaginationHeaders {
    PaginationHeaders {
        total: header_usize(headers, TOTAL_HEADER),
        total_pages: header_usize(headers, TOTAL_PAGES_HEADER),
    }
}

/// Extracts `filename="..."` from a content disposition header.
fn attachment_name(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    value.split(';').map(str::trim).find_map(|part| {
        part.strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
    })
}

#[async_trait]
impl EntityReader for LmsGateway {
    async fn list(&self, kind: EntityKind, query: &ListQuery) -> ApiResult<ListResponse<Value>> {
        let builder = self
            .request(Method::GET, &self.url(kind, None))
            .query(&query.to_pairs());
        let (headers, body) = self.send_json(builder).await?;
        normalize_list(body, pagination_headers(&headers), query)
    }

    async fn get(&self, kind: EntityKind, id: i64) -> ApiResult<Value> {
        let builder = self.request(Method::GET, &self.url(kind, Some(&id.to_string())));
        let (_, body) = self.send_json(builder).await?;
        match normalize_mutation(body)? {
            Value::Null => Err(ApiError::NotFound),
            value => Ok(value),
        }
    }

    async fn export(
        &self,
        kind: EntityKind,
        query: &ListQuery,
        format: &str,
    ) -> ApiResult<ExportFile> {
        let mut pairs = query.to_pairs();
        pairs.retain(|(key, _)| key != "page" && key != "per_page");
        pairs.push(("format".to_string(), format.to_string()));

        let builder = self
            .request(Method::GET, &self.url(kind, Some("export")))
            .query(&pairs);
        let response = self.send(builder).await?;
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = attachment_name(&headers);
        let bytes = response.bytes().await?.to_vec();

        Ok(ExportFile {
            content_type,
            file_name,
            bytes,
        })
    }
}

#[async_trait]
impl EntityWriter for LmsGateway {
    async fn create(&self, kind: EntityKind, payload: &Value) -> ApiResult<Value> {
        let builder = self.request(Method::POST, &self.url(kind, None)).json(payload);
        let (_, body) = self.send_json(builder).await?;
        normalize_mutation(body)
    }

    async fn update(&self, kind: EntityKind, id: i64, payload: &Value) -> ApiResult<Value> {
        let builder = self
            .request(Method::PUT, &self.url(kind, Some(&id.to_string())))
            .json(payload);
        let (_, body) = self.send_json(builder).await?;
        normalize_mutation(body)
    }

    async fn delete(&self, kind: EntityKind, id: i64) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, &self.url(kind, Some(&id.to_string())));
        let (_, body) = self.send_json(builder).await?;
        normalize_mutation(body).map(|_| ())
    }

    async fn import_csv(
        &self,
        kind: EntityKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<ImportOutcome> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let builder = self
            .request(Method::POST, &self.url(kind, Some("import")))
            .multipart(form);
        let (_, body) = self.send_json(builder).await?;
        let value = normalize_mutation(body.clone())?;

        // The outcome counters live either inside `data` or next to `success`.
        let outcome = match value {
            Value::Object(_) => serde_json::from_value(value)?,
            _ => serde_json::from_value(body).unwrap_or_default(),
        };
        Ok(outcome)
    }
}
