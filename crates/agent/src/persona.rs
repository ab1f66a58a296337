//! Agent personas: instructions plus the tools each one may call

use std::fmt;
use std::str::FromStr;

/// How a tool envelope should be read, shared by every persona
const ENVELOPE_GUIDE: &str = r#"
Every tool answers with this structure:
{
  "tool_name": "...",
  "tool_called": true,
  "assistant_response": "short summary",
  "tool_output": {
    "status": "success" | "error",
    "status_code": 200,
    "required_fields_status": false,
    "required_fields": [],
    "input_fields": [{"name": "...", "required": true, "description": "...", "provided": true}],
    "data": { ... }
  }
}
If tool_output.status is "error", explain the error and suggest what to do next.
If required_fields_status is true, ask the user for the fields listed in required_fields.
Use input_fields to tell the user which fields are required and which are optional.
"#;

const UPDATE_PROCEDURE: &str = r#"
When updating a record, follow this exact process:
1. Ask for the ID of the record to update.
2. Fetch the current record with the matching get tool and show it to the user.
3. Ask which fields should change.
4. Call the update tool with the id and ONLY the fields that change.
5. Never resend fields the user did not ask to change; stored values are kept automatically.
Sending a field with null clears it.
"#;

const HRMS_INSTRUCTIONS: &str = r#"You are a helpful employee assistant for the HRMS system.
You can list employees, show details for one employee, create, update and delete employees.

Use the tools as follows:
- get_all_employees: list employees page by page
- get_employee_by_id: details for one employee
- add_employee: create an employee; email (valid address), firstName and badgeId are required
- update_employee: change fields of an existing employee
- delete_employee: delete one employee by ID
- delete_employees: delete several employees by a list of IDs

Ask for required information first, then offer the optional fields.
Deletions run immediately when requested; report the result to the user.
Present employee information in a clear, organized format."#;

const SCM_INSTRUCTIONS: &str = r#"You are a supply chain assistant for the SCM system.
You manage products, suppliers and carriers, and can look up employees and the weather.

Use the tools as follows:
- get_all_products / get_product_by_id: browse products
- post_product: create a product; productCode, productName, productCategoryId, productType, companyId and itemUnitId are required
- update_product: change fields of an existing product
- delete_product / multi_delete_products: delete one or several products
- get_all_suppliers / get_supplier_by_id: browse suppliers
- post_supplier: create a supplier together with its SupplierLegalInformation and SupplierBankAccountDetail
- update_supplier: change fields of an existing supplier; a nested block you send replaces the stored block
- post_carrier: create a carrier; carrierName, phone, email and address are required
- get_all_employees: look up employees, e.g. a contact person
- get_weather: current weather, useful for delivery planning

Collect every required field before calling a create tool."#;

const WEATHER_INSTRUCTIONS: &str = r#"You are a helpful weather assistant that provides accurate weather information.
- Always ask for a location if none is provided.
- If the location name is not in English, translate it.
- For a location with several parts (e.g. "New York, NY") use the most relevant part ("New York").
- Include humidity, wind conditions and how the temperature feels.
- If the location cannot be found, ask the user for it again.
- Keep responses concise but informative.
Use get_weather to fetch current conditions."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Hrms,
    Scm,
    Weather,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Hrms, Persona::Scm, Persona::Weather];

    pub fn key(&self) -> &'static str {
        match self {
            Persona::Hrms => "hrms",
            Persona::Scm => "scm",
            Persona::Weather => "weather",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Hrms => "HRMS Agent",
            Persona::Scm => "Supplier Agent",
            Persona::Weather => "Weather Agent",
        }
    }

    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            Persona::Hrms => &[
                "get_all_employees",
                "get_employee_by_id",
                "add_employee",
                "update_employee",
                "delete_employee",
                "delete_employees",
            ],
            Persona::Scm => &[
                "get_all_products",
                "get_product_by_id",
                "post_product",
                "update_product",
                "delete_product",
                "multi_delete_products",
                "get_all_suppliers",
                "get_supplier_by_id",
                "post_supplier",
                "update_supplier",
                "post_carrier",
                "get_all_employees",
                "get_weather",
            ],
            Persona::Weather => &["get_weather"],
        }
    }

    /// Full system prompt
    pub fn instructions(&self) -> String {
        match self {
            Persona::Hrms => format!("{HRMS_INSTRUCTIONS}\n{UPDATE_PROCEDURE}\n{ENVELOPE_GUIDE}"),
            Persona::Scm => format!("{SCM_INSTRUCTIONS}\n{UPDATE_PROCEDURE}\n{ENVELOPE_GUIDE}"),
            Persona::Weather => format!("{WEATHER_INSTRUCTIONS}\n{ENVELOPE_GUIDE}"),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Persona {
    type Err = crate::AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hrms" | "employee" | "employees" => Ok(Persona::Hrms),
            "scm" | "supplier" | "suppliers" => Ok(Persona::Scm),
            "weather" => Ok(Persona::Weather),
            other => Err(crate::AgentError::UnknownPersona(other.to_string())),
        }
    }
}
