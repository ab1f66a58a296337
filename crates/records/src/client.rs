//! HTTP client for one entity on the HRMS or SCM service

use crate::entity::{BulkDeleteBody, Entity, Operation, WriteEncoding};
use crate::reconcile::{ApplyUpdate, FetchById};
use crate::record::{Record, RecordId};
use crate::{Result, StoreError};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_INDEX: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Longest error body echoed back in a `StoreError::Status`
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Missing or zero values fall back to page 1 of 10
    pub fn new(page_index: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page_index: page_index.filter(|&i| i > 0).unwrap_or(DEFAULT_PAGE_INDEX),
            page_size: page_size.filter(|&s| s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_index: u32,
    pub page_size: u32,
    pub count: u64,
    pub data: Vec<Record>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    page_index: Option<u32>,
    page_size: Option<u32>,
    count: Option<u64>,
    #[serde(default)]
    data: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkDeleteReport {
    pub successful_deletions: Vec<RecordId>,
    pub failed_deletions: Vec<Value>,
}

impl BulkDeleteReport {
    fn all_succeeded(ids: &[RecordId]) -> Self {
        Self {
            successful_deletions: ids.to_vec(),
            failed_deletions: Vec::new(),
        }
    }

    /// Read the service's report; a missing or unreadable body means every id
    /// was deleted
    fn from_body(body: &str, ids: &[RecordId]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            return Self::all_succeeded(ids);
        };

        let successful_deletions = map
            .get("successful_deletions")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_else(|| ids.to_vec());
        let failed_deletions = map
            .get("failed_deletions")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Self {
            successful_deletions,
            failed_deletions,
        }
    }
}

pub struct RecordClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
    entity: &'static Entity,
}

impl RecordClient {
    pub fn new(
        entity: &'static Entity,
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            entity,
        })
    }

    pub fn entity(&self) -> &'static Entity {
        self.entity
    }

    fn url(&self, op: Operation, id: Option<RecordId>) -> Result<String> {
        let route = self.entity.route(op).ok_or(StoreError::Unsupported {
            entity: self.entity.name,
            operation: op,
        })?;
        let path = match id {
            Some(id) => route.replace("{id}", &id.to_string()),
            None => route.to_string(),
        };
        Ok(format!("{}/{}", self.base_url, path))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn with_body(&self, request: RequestBuilder, record: &Record) -> RequestBuilder {
        match self.entity.encoding {
            WriteEncoding::Json => request.json(record),
            WriteEncoding::Multipart => {
                let form = form_fields(record)
                    .into_iter()
                    .fold(Form::new(), |form, (key, value)| form.text(key, value));
                request.multipart(form)
            }
        }
    }

    /// Send and turn any non-2xx answer into `StoreError::Status`
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} request failed with {}: {}", self.entity.name, status, body);
        Err(status_error(status, &body))
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page> {
        let url = self.url(Operation::List, None)?;
        debug!("GET {} page {} size {}", url, page.page_index, page.page_size);

        let request = self.http.get(&url).query(&[
            ("pageIndex", page.page_index),
            ("pageSize", page.page_size),
        ]);
        let raw: RawPage = self.send(request).await?.json().await?;

        Ok(Page {
            page_index: raw.page_index.unwrap_or(page.page_index),
            page_size: raw.page_size.unwrap_or(page.page_size),
            count: raw.count.unwrap_or(raw.data.len() as u64),
            data: raw.data,
        })
    }

    /// `Ok(None)` when the service answers 404
    pub async fn get(&self, id: RecordId) -> Result<Option<Record>> {
        let url = self.url(Operation::Get, Some(id))?;
        debug!("GET {}", url);

        let response = self.authorize(self.http.get(&url)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&body)?;
        Record::from_value(value)
            .map(Some)
            .ok_or_else(|| StoreError::InvalidResponse(format!("{} is not an object", self.entity.name)))
    }

    pub async fn create(&self, fields: &Record) -> Result<Value> {
        let url = self.url(Operation::Create, None)?;
        debug!("POST {} fields {:?}", url, fields.keys().collect::<Vec<_>>());

        let request = self.with_body(self.http.post(&url), fields);
        let body = self.send(request).await?.text().await?;
        info!("created {}", self.entity.name);
        Ok(parse_or_success(&body))
    }

    /// PUT a complete record and return what the store now holds.
    ///
    /// When the answer is not a record the stored record is fetched again.
    /// `Ok(None)` means the write went through but nothing confirmed its
    /// result.
    pub async fn update(&self, record: &Record) -> Result<Option<Record>> {
        let url = self.url(Operation::Update, None)?;
        debug!("PUT {} fields {:?}", url, record.keys().collect::<Vec<_>>());

        let request = self.with_body(self.http.put(&url), record);
        let body = self.send(request).await?.text().await?;

        if let Some(confirmed) = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(Record::from_value)
        {
            return Ok(Some(confirmed));
        }

        warn!("{} update returned no record, refetching", self.entity.name);
        match record.id() {
            Some(id) if self.entity.supports(Operation::Get) => match self.get(id).await {
                Ok(fresh) => Ok(fresh),
                Err(e) => {
                    warn!("refetch of {} {} failed: {}", self.entity.name, id, e);
                    Ok(None)
                }
            },
            _ => Ok(None),
        }
    }

    pub async fn delete(&self, id: RecordId) -> Result<Value> {
        let url = self.url(Operation::Delete, Some(id))?;
        debug!("DELETE {}", url);

        let body = self.send(self.http.delete(&url)).await?.text().await?;
        info!("deleted {} {}", self.entity.name, id);
        Ok(parse_or_success(&body))
    }

    pub async fn delete_many(&self, ids: &[RecordId]) -> Result<BulkDeleteReport> {
        let url = self.url(Operation::DeleteMany, None)?;
        debug!("DELETE {} ids {:?}", url, ids);

        let payload = match self.entity.bulk_delete {
            BulkDeleteBody::Wrapped => json!({ "ids": ids }),
            BulkDeleteBody::Bare => json!(ids),
        };
        let body = self
            .send(self.http.delete(&url).json(&payload))
            .await?
            .text()
            .await?;

        let report = BulkDeleteReport::from_body(&body, ids);
        info!(
            "bulk delete of {}: {} ok, {} failed",
            self.entity.plural,
            report.successful_deletions.len(),
            report.failed_deletions.len()
        );
        Ok(report)
    }
}

#[async_trait]
impl FetchById for RecordClient {
    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<Record>> {
        self.get(id).await
    }
}

#[async_trait]
impl ApplyUpdate for RecordClient {
    async fn apply_update(&self, record: &Record) -> Result<Option<Record>> {
        self.update(record).await
    }
}

fn status_error(status: StatusCode, body: &str) -> StoreError {
    let body = body.trim();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY).collect()
    };
    StoreError::Status {
        status: status.as_u16(),
        message,
    }
}

fn parse_or_success(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "success": true }))
}

/// Flatten a record into multipart text parts. Nested objects become
/// `parent.child`, arrays `parent[i]`; nulls are omitted.
pub fn form_fields(record: &Record) -> Vec<(String, String)> {
    let mut parts = Vec::new();
    for (key, value) in record {
        flatten_into(key, value, &mut parts);
    }
    parts
}

fn flatten_into(key: &str, value: &Value, parts: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::String(s) => parts.push((key.to_string(), s.clone())),
        Value::Object(map) => {
            for (child, inner) in map {
                flatten_into(&format!("{key}.{child}"), inner, parts);
            }
        }
        Value::Array(items) => {
            for (i, inner) in items.iter().enumerate() {
                flatten_into(&format!("{key}[{i}]"), inner, parts);
            }
        }
        other => parts.push((key.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CARRIER, EMPLOYEE};

    #[test]
    fn test_page_request_defaults() {
        assert_eq!(PageRequest::default(), PageRequest { page_index: 1, page_size: 10 });
        assert_eq!(
            PageRequest::new(Some(0), Some(25)),
            PageRequest { page_index: 1, page_size: 25 }
        );
    }

    #[test]
    fn test_url_substitutes_id() {
        let client =
            RecordClient::new(&EMPLOYEE, "http://hrms/api/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url(Operation::Delete, Some(4)).unwrap(),
            "http://hrms/api/employee/delete-employee/4"
        );
        assert_eq!(client.url(Operation::Get, Some(9)).unwrap(), "http://hrms/api/employee/9");
    }

    #[test]
    fn test_url_for_unsupported_operation() {
        let client = RecordClient::new(&CARRIER, "http://scm", None, Duration::from_secs(5)).unwrap();
        let err = client.url(Operation::Get, Some(1)).unwrap_err();
        assert_eq!(err.to_string(), "carrier does not support get");
    }

    #[test]
    fn test_form_fields_flattening() {
        let record = Record::from_value(json!({
            "firstName": "Ann",
            "departmentId": 3,
            "country": null,
            "active": true,
            "legal": {"number": "X1", "flags": [true, false]}
        }))
        .unwrap();

        assert_eq!(
            form_fields(&record),
            vec![
                ("firstName".to_string(), "Ann".to_string()),
                ("departmentId".to_string(), "3".to_string()),
                ("active".to_string(), "true".to_string()),
                ("legal.number".to_string(), "X1".to_string()),
                ("legal.flags[0]".to_string(), "true".to_string()),
                ("legal.flags[1]".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_bulk_report_defaults() {
        let ids = [1, 2, 3];
        assert_eq!(BulkDeleteReport::from_body("", &ids).successful_deletions, vec![1, 2, 3]);
        assert_eq!(BulkDeleteReport::from_body("not json", &ids).successful_deletions, vec![1, 2, 3]);

        let report = BulkDeleteReport::from_body(
            r#"{"successful_deletions":[1],"failed_deletions":[{"id":2,"reason":"in use"}]}"#,
            &ids,
        );
        assert_eq!(report.successful_deletions, vec![1]);
        assert_eq!(report.failed_deletions[0]["reason"], "in use");
    }

    #[test]
    fn test_status_error_message() {
        let err = status_error(StatusCode::BAD_REQUEST, "");
        assert_eq!(err.to_string(), "remote returned 400: Bad Request");
        assert_eq!(err.status(), Some(400));

        let err = status_error(StatusCode::CONFLICT, " badge taken ");
        assert_eq!(err.to_string(), "remote returned 409: badge taken");
    }
}
