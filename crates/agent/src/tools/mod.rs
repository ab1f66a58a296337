//! Tools exposed to the model

pub mod envelope;
pub mod records;
pub mod weather;

pub use envelope::{Envelope, Status, ToolOutput};
pub use records::{
    CreateRecordTool, DeleteManyTool, DeleteRecordTool, GetRecordTool, ListRecordsTool,
    UpdateRecordTool,
};
pub use weather::WeatherTool;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use esap_config::{Config, HRMS_TOKEN_ENV, SCM_TOKEN_ENV};
use esap_provider::ToolSpec;
use esap_records::{Entity, RecordClient, Service, CARRIER, EMPLOYEE, PRODUCT, SUPPLIER};
use serde_json::Value;

use crate::weather::WeatherClient;

pub type BoxedTool = Box<dyn ToolTrait + Send + Sync>;

#[async_trait]
pub trait ToolTrait: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value;
    async fn execute(
        &self,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

pub fn to_provider_tool(tool: &dyn ToolTrait) -> ToolSpec {
    ToolSpec::function(tool.name(), tool.description(), tool.parameters())
}

pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register<T: ToolTrait + 'static>(&mut self, tool: T) {
        self.register_boxed(Box::new(tool));
    }

    pub fn register_boxed(&mut self, tool: BoxedTool) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&(dyn ToolTrait + Send + Sync)> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions sorted by name so requests are stable
    pub fn definitions(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .values()
            .map(|t| to_provider_tool(t.as_ref()))
            .collect();
        specs.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        specs
    }

    pub async fn execute(
        &self,
        name: &str,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| format!("tool '{}' not found", name))?;
        tool.execute(args).await
    }

    /// Like `execute`, with typed errors for callers outside the loop
    pub async fn call(&self, name: &str, args: Value) -> crate::Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| crate::AgentError::ToolNotFound(name.to_string()))?;
        tool.execute(args)
            .await
            .map_err(|e| crate::AgentError::ToolExecution(e.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<BoxedTool> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = BoxedTool>>(iter: I) -> Self {
        let mut registry = Self::new();
        for tool in iter {
            registry.register_boxed(tool);
        }
        registry
    }
}

/// Tool name and description for each operation an entity offers
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityToolNames {
    pub list: Option<(&'static str, &'static str)>,
    pub get: Option<(&'static str, &'static str)>,
    pub create: Option<(&'static str, &'static str)>,
    pub update: Option<(&'static str, &'static str)>,
    pub delete: Option<(&'static str, &'static str)>,
    pub delete_many: Option<(&'static str, &'static str)>,
}

pub const EMPLOYEE_TOOLS: EntityToolNames = EntityToolNames {
    list: Some(("get_all_employees", "Get a page of employees from the system")),
    get: Some(("get_employee_by_id", "Get detailed information about one employee by ID")),
    create: Some(("add_employee", "Create a new employee. Requires email, firstName and badgeId.")),
    update: Some((
        "update_employee",
        "Update an employee. Send the id plus ONLY the fields that should change; all other fields are kept.",
    )),
    delete: Some(("delete_employee", "Delete one employee by ID")),
    delete_many: Some(("delete_employees", "Delete several employees by their IDs")),
};

pub const PRODUCT_TOOLS: EntityToolNames = EntityToolNames {
    list: Some(("get_all_products", "Get a page of products from the system")),
    get: Some(("get_product_by_id", "Get detailed information about one product by ID")),
    create: Some(("post_product", "Create a new product")),
    update: Some((
        "update_product",
        "Update a product. Send the id plus ONLY the fields that should change; all other fields are kept.",
    )),
    delete: Some(("delete_product", "Delete one product by ID")),
    delete_many: Some(("multi_delete_products", "Delete several products by their IDs")),
};

pub const SUPPLIER_TOOLS: EntityToolNames = EntityToolNames {
    list: Some(("get_all_suppliers", "Get a page of suppliers from the system")),
    get: Some(("get_supplier_by_id", "Get detailed information about one supplier by ID")),
    create: Some((
        "post_supplier",
        "Create a new supplier, including its legal information and bank account details",
    )),
    update: Some((
        "update_supplier",
        "Update a supplier. Send the id plus ONLY the fields that should change; all other fields are kept.",
    )),
    delete: None,
    delete_many: None,
};

pub const CARRIER_TOOLS: EntityToolNames = EntityToolNames {
    list: None,
    get: None,
    create: Some(("post_carrier", "Create a new carrier")),
    update: None,
    delete: None,
    delete_many: None,
};

/// Tools for one entity, backed by a shared client
pub fn entity_tools(client: Arc<RecordClient>, names: EntityToolNames) -> Vec<BoxedTool> {
    let mut tools: Vec<BoxedTool> = Vec::new();
    if let Some((name, desc)) = names.list {
        tools.push(Box::new(ListRecordsTool::new(name, desc, client.clone())));
    }
    if let Some((name, desc)) = names.get {
        tools.push(Box::new(GetRecordTool::new(name, desc, client.clone())));
    }
    if let Some((name, desc)) = names.create {
        tools.push(Box::new(CreateRecordTool::new(name, desc, client.clone())));
    }
    if let Some((name, desc)) = names.update {
        tools.push(Box::new(UpdateRecordTool::new(name, desc, client.clone())));
    }
    if let Some((name, desc)) = names.delete {
        tools.push(Box::new(DeleteRecordTool::new(name, desc, client.clone())));
    }
    if let Some((name, desc)) = names.delete_many {
        tools.push(Box::new(DeleteManyTool::new(name, desc, client)));
    }
    tools
}

/// Clients for every remote service the tools reach
pub struct Backends {
    pub employee: Arc<RecordClient>,
    pub product: Arc<RecordClient>,
    pub supplier: Arc<RecordClient>,
    pub carrier: Arc<RecordClient>,
    pub weather: Arc<WeatherClient>,
}

impl Backends {
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let timeout = config.request_timeout();
        let client = |entity: &'static Entity| -> crate::Result<Arc<RecordClient>> {
            let (service, token_env) = match entity.service {
                Service::Hrms => (&config.services.hrms, HRMS_TOKEN_ENV),
                Service::Scm => (&config.services.scm, SCM_TOKEN_ENV),
            };
            let client = RecordClient::new(
                entity,
                service.base_url.clone(),
                service.token(token_env),
                timeout,
            )?;
            Ok(Arc::new(client))
        };

        Ok(Self {
            employee: client(&EMPLOYEE)?,
            product: client(&PRODUCT)?,
            supplier: client(&SUPPLIER)?,
            carrier: client(&CARRIER)?,
            weather: Arc::new(WeatherClient::from_config(&config.services.weather, timeout)?),
        })
    }

    /// Every tool, in catalogue order
    pub fn all_tools(&self) -> Vec<BoxedTool> {
        let mut tools = Vec::new();
        tools.extend(entity_tools(self.employee.clone(), EMPLOYEE_TOOLS));
        tools.extend(entity_tools(self.product.clone(), PRODUCT_TOOLS));
        tools.extend(entity_tools(self.supplier.clone(), SUPPLIER_TOOLS));
        tools.extend(entity_tools(self.carrier.clone(), CARRIER_TOOLS));
        tools.push(Box::new(WeatherTool::new(self.weather.clone())));
        tools
    }

    /// Registry holding only the named tools
    pub fn registry_for(&self, names: &[&str]) -> ToolRegistry {
        self.all_tools()
            .into_iter()
            .filter(|t| names.contains(&t.name()))
            .collect()
    }

    pub fn full_registry(&self) -> ToolRegistry {
        self.all_tools().into_iter().collect()
    }
}
