//! Tools over the HRMS/SCM record services
//!
//! One struct per operation kind; each is instantiated per entity with its
//! own tool name and description. All of them answer with an `Envelope`,
//! never with an `Err`, so the model always sees a structured result.

use std::sync::Arc;

use async_trait::async_trait;
use esap_records::fields::{input_fields, json_schema, missing_required, select_known, validate};
use esap_records::{
    reconcile_and_apply, InputField, OutcomeKind, PageRequest, RecordClient, RecordId,
    ValidationError,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::envelope::Envelope;
use super::ToolTrait;

type ToolResult = Result<String, Box<dyn std::error::Error + Send + Sync>>;

fn as_object(args: Value) -> Map<String, Value> {
    match args {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn as_record_id(value: Option<&Value>) -> Option<RecordId> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn id_field(entity: &str, description: &str, provided: bool) -> Vec<InputField> {
    vec![InputField {
        name: "id".to_string(),
        required: true,
        description: format!("{description} {entity}"),
        provided,
    }]
}

fn id_schema(description: String) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": description }
        },
        "required": ["id"]
    })
}

/// Page through an entity's list endpoint
pub struct ListRecordsTool {
    name: &'static str,
    description: &'static str,
    client: Arc<RecordClient>,
}

impl ListRecordsTool {
    pub fn new(name: &'static str, description: &'static str, client: Arc<RecordClient>) -> Self {
        Self {
            name,
            description,
            client,
        }
    }
}

#[async_trait]
impl ToolTrait for ListRecordsTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pageIndex": { "type": "integer", "description": "Page number (starts from 1)" },
                "pageSize": { "type": "integer", "description": "Number of items per page" }
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let page_index = args["pageIndex"].as_u64().and_then(|v| u32::try_from(v).ok());
        let page_size = args["pageSize"].as_u64().and_then(|v| u32::try_from(v).ok());
        let page = PageRequest::new(page_index, page_size);
        let entity = self.client.entity();

        let fields = vec![
            InputField {
                name: "pageIndex".to_string(),
                required: false,
                description: "Page number (starts from 1)".to_string(),
                provided: page_index.unwrap_or(0) > 0,
            },
            InputField {
                name: "pageSize".to_string(),
                required: false,
                description: "Number of items per page".to_string(),
                provided: page_size.unwrap_or(0) > 0,
            },
        ];

        let envelope = match self.client.list(page).await {
            Ok(result) => Envelope::success(
                self.name,
                200,
                format!("{} information fetched successfully", entity.title()),
                json!({
                    "pageIndex": result.page_index,
                    "pageSize": result.page_size,
                    "count": result.count,
                    entity.plural: result.data,
                }),
            ),
            Err(e) => Envelope::error(
                self.name,
                500,
                format!("Failed to fetch {} information: {}", entity.name, e),
                json!({
                    "pageIndex": page.page_index,
                    "pageSize": page.page_size,
                    "count": 0,
                    entity.plural: [],
                }),
            ),
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}

/// Fetch one record by id
pub struct GetRecordTool {
    name: &'static str,
    description: &'static str,
    client: Arc<RecordClient>,
}

impl GetRecordTool {
    pub fn new(name: &'static str, description: &'static str, client: Arc<RecordClient>) -> Self {
        Self {
            name,
            description,
            client,
        }
    }
}

#[async_trait]
impl ToolTrait for GetRecordTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Value {
        id_schema(format!("ID of the {} to fetch", self.client.entity().name))
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let entity = self.client.entity();
        let id = as_record_id(args.get("id"));
        let fields = id_field(entity.name, "ID of the", id.is_some());
        let empty = json!({ entity.name: null });

        let Some(id) = id else {
            return Ok(Envelope::missing_fields(self.name, vec!["id".to_string()], empty)
                .with_input_fields(fields)
                .render()?);
        };

        let envelope = match self.client.get(id).await {
            Ok(Some(record)) => Envelope::success(
                self.name,
                200,
                format!("{} information fetched successfully", entity.title()),
                json!({ entity.name: record }),
            ),
            Ok(None) => Envelope::error(
                self.name,
                404,
                format!("{} with ID {} not found.", entity.title(), id),
                empty,
            ),
            Err(e) => Envelope::error(
                self.name,
                500,
                format!("Failed to fetch {}: {}", entity.name, e),
                empty,
            ),
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}

/// Validate declared fields and POST a new record
pub struct CreateRecordTool {
    name: &'static str,
    description: &'static str,
    client: Arc<RecordClient>,
}

impl CreateRecordTool {
    pub fn new(name: &'static str, description: &'static str, client: Arc<RecordClient>) -> Self {
        Self {
            name,
            description,
            client,
        }
    }
}

#[async_trait]
impl ToolTrait for CreateRecordTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Value {
        json_schema(self.client.entity().create_fields)
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let entity = self.client.entity();
        let specs = entity.create_fields;
        let args = as_object(args);
        let fields = input_fields(specs, &args);
        let empty = json!({ entity.name: null });

        let missing = missing_required(specs, &args);
        if !missing.is_empty() {
            return Ok(Envelope::missing_fields(self.name, missing, empty)
                .with_input_fields(fields)
                .render()?);
        }
        if let Err(e) = validate(specs, &args) {
            return Ok(Envelope::invalid_input(self.name, &e, empty)
                .with_input_fields(fields)
                .render()?);
        }

        let record = select_known(specs, &args);
        let envelope = match self.client.create(&record).await {
            Ok(created) => Envelope::success(
                self.name,
                201,
                format!("{} created successfully", entity.title()),
                json!({ entity.name: created }),
            ),
            Err(e) => Envelope::error(
                self.name,
                500,
                format!("Failed to create {}: {}", entity.name, e),
                empty,
            ),
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}

/// Partial update through the reconciler
pub struct UpdateRecordTool {
    name: &'static str,
    description: &'static str,
    client: Arc<RecordClient>,
}

impl UpdateRecordTool {
    pub fn new(name: &'static str, description: &'static str, client: Arc<RecordClient>) -> Self {
        Self {
            name,
            description,
            client,
        }
    }
}

#[async_trait]
impl ToolTrait for UpdateRecordTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Value {
        json_schema(self.client.entity().update_fields)
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let entity = self.client.entity();
        let specs = entity.update_fields;
        let args = as_object(args);
        let fields = input_fields(specs, &args);
        let original_key = format!("original_{}", entity.name);
        let empty = json!({
            entity.name: null,
            original_key.as_str(): null,
            "updated_fields": [],
        });

        let missing = missing_required(specs, &args);
        if !missing.is_empty() {
            return Ok(Envelope::missing_fields(self.name, missing, empty)
                .with_input_fields(fields)
                .render()?);
        }
        let checked = validate(specs, &args).and_then(|_| {
            as_record_id(args.get("id")).ok_or(ValidationError::WrongType {
                field: "id".to_string(),
                expected: "integer",
            })
        });
        let id = match checked {
            Ok(id) => id,
            Err(e) => {
                return Ok(Envelope::invalid_input(self.name, &e, empty)
                    .with_input_fields(fields)
                    .render()?);
            }
        };

        let proposed = select_known(specs, &args);
        debug!("{}: updating {} {}", self.name, entity.name, id);
        let outcome = reconcile_and_apply(id, &proposed, &*self.client, &*self.client).await;

        let data = json!({
            entity.name: outcome.merged,
            original_key.as_str(): outcome.original,
            "updated_fields": outcome.changed_fields,
        });

        let envelope = match outcome.outcome {
            OutcomeKind::NotFound => Envelope::error(
                self.name,
                404,
                format!("{} with ID {} not found.", entity.title(), id),
                data,
            ),
            OutcomeKind::NoChanges => Envelope::success(
                self.name,
                200,
                format!(
                    "No fields were provided for update. Current {} information returned.",
                    entity.name
                ),
                data,
            ),
            OutcomeKind::Updated => Envelope::success(
                self.name,
                200,
                format!(
                    "{} updated successfully. Updated fields: {}",
                    entity.title(),
                    outcome.changed_fields.join(", ")
                ),
                data,
            ),
            OutcomeKind::Failed => Envelope::error(
                self.name,
                500,
                format!(
                    "Failed to update {}: {}",
                    entity.name,
                    outcome.error_message.as_deref().unwrap_or("unknown error")
                ),
                data,
            ),
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}

/// Delete one record after checking it exists
pub struct DeleteRecordTool {
    name: &'static str,
    description: &'static str,
    client: Arc<RecordClient>,
}

impl DeleteRecordTool {
    pub fn new(name: &'static str, description: &'static str, client: Arc<RecordClient>) -> Self {
        Self {
            name,
            description,
            client,
        }
    }
}

#[async_trait]
impl ToolTrait for DeleteRecordTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Value {
        id_schema(format!("ID of the {} to delete", self.client.entity().name))
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let entity = self.client.entity();
        let id = as_record_id(args.get("id"));
        let fields = id_field(entity.name, "ID of the", id.is_some());
        let id_key = format!("{}_id", entity.name);

        let data = |deleted: bool, id: RecordId, message: &str| {
            json!({
                "deleted": deleted,
                id_key.as_str(): id,
                "message": message,
            })
        };

        let Some(id) = id else {
            let message = format!("{} ID is required", entity.title());
            return Ok(
                Envelope::missing_fields(self.name, vec!["id".to_string()], data(false, 0, &message))
                    .with_input_fields(fields)
                    .render()?,
            );
        };

        let envelope = match self.client.get(id).await {
            Ok(None) => {
                let message = format!("{} with ID {} not found", entity.title(), id);
                Envelope::error(self.name, 404, format!("{message}."), data(false, id, &message))
            }
            Err(e) => {
                let message = format!("Failed to delete {}: {}", entity.name, e);
                Envelope::error(self.name, 500, message.clone(), data(false, id, &message))
            }
            Ok(Some(_)) => match self.client.delete(id).await {
                Ok(_) => {
                    let message = format!("{} with ID {} deleted successfully", entity.title(), id);
                    Envelope::success(self.name, 200, message.clone(), data(true, id, &message))
                }
                Err(e) => {
                    let message = format!("Failed to delete {}: {}", entity.name, e);
                    Envelope::error(self.name, 500, message.clone(), data(false, id, &message))
                }
            },
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}

/// Delete several records in one request
pub struct DeleteManyTool {
    name: &'static str,
    description: &'static str,
    client: Arc<RecordClient>,
}

impl DeleteManyTool {
    pub fn new(name: &'static str, description: &'static str, client: Arc<RecordClient>) -> Self {
        Self {
            name,
            description,
            client,
        }
    }
}

#[async_trait]
impl ToolTrait for DeleteManyTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ids": {
                    "type": "array",
                    "items": { "type": "integer" },
                    "description": format!("IDs of the {} to delete", self.client.entity().plural)
                }
            },
            "required": ["ids"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let entity = self.client.entity();
        let raw = args.get("ids").and_then(Value::as_array).cloned().unwrap_or_default();
        let fields = vec![InputField {
            name: "ids".to_string(),
            required: true,
            description: format!("IDs of the {} to delete", entity.plural),
            provided: !raw.is_empty(),
        }];
        let empty = json!({ "successful_deletions": [], "failed_deletions": [] });

        if raw.is_empty() {
            return Ok(Envelope::missing_fields(self.name, vec!["ids".to_string()], empty)
                .with_input_fields(fields)
                .render()?);
        }

        let ids: Option<Vec<RecordId>> = raw.iter().map(|v| as_record_id(Some(v))).collect();
        let Some(ids) = ids else {
            let error = ValidationError::WrongType {
                field: "ids".to_string(),
                expected: "an array of integers",
            };
            return Ok(Envelope::error(self.name, 400, error.to_string(), empty)
                .with_input_fields(fields)
                .render()?);
        };

        let envelope = match self.client.delete_many(&ids).await {
            Ok(report) => Envelope::success(
                self.name,
                200,
                format!(
                    "Deleted {} of {} {}",
                    report.successful_deletions.len(),
                    ids.len(),
                    entity.plural
                ),
                serde_json::to_value(&report)?,
            ),
            Err(e) => Envelope::error(
                self.name,
                500,
                format!("Failed to delete {}: {}", entity.plural, e),
                empty,
            ),
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_record_id() {
        assert_eq!(as_record_id(Some(&json!(5))), Some(5));
        assert_eq!(as_record_id(Some(&json!(5.0))), Some(5));
        assert_eq!(as_record_id(Some(&json!("12"))), Some(12));
        assert_eq!(as_record_id(Some(&json!(5.5))), None);
        assert_eq!(as_record_id(Some(&json!(null))), None);
        assert_eq!(as_record_id(None), None);
    }

    #[test]
    fn test_as_object_ignores_non_objects() {
        assert!(as_object(json!([1, 2])).is_empty());
        assert_eq!(as_object(json!({"a": 1})).len(), 1);
    }
}
