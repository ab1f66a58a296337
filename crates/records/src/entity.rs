//! Static descriptors for the remote entities

use crate::fields::{FieldKind, FieldSpec};
use serde::Serialize;
use std::fmt;

/// Remote service an entity lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Hrms,
    Scm,
}

/// Body format for create and update requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEncoding {
    Multipart,
    Json,
}

/// Body shape of a bulk delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkDeleteBody {
    /// `{"ids": [..]}`
    Wrapped,
    /// `[..]`
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    DeleteMany,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::DeleteMany => "bulk delete",
        };
        f.write_str(name)
    }
}

/// Paths relative to the service base URL. `{id}` is substituted.
#[derive(Debug, Clone, Copy)]
pub struct Routes {
    pub list: Option<&'static str>,
    pub get: Option<&'static str>,
    pub create: Option<&'static str>,
    pub update: Option<&'static str>,
    pub delete: Option<&'static str>,
    pub delete_many: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct Entity {
    pub name: &'static str,
    pub plural: &'static str,
    pub service: Service,
    pub routes: Routes,
    pub encoding: WriteEncoding,
    pub bulk_delete: BulkDeleteBody,
    pub create_fields: &'static [FieldSpec],
    pub update_fields: &'static [FieldSpec],
}

impl Entity {
    pub fn route(&self, op: Operation) -> Option<&'static str> {
        match op {
            Operation::List => self.routes.list,
            Operation::Get => self.routes.get,
            Operation::Create => self.routes.create,
            Operation::Update => self.routes.update,
            Operation::Delete => self.routes.delete,
            Operation::DeleteMany => self.routes.delete_many,
        }
    }

    pub fn supports(&self, op: Operation) -> bool {
        self.route(op).is_some()
    }

    /// "employee" -> "Employee"
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

pub const ALL: [&Entity; 4] = [&EMPLOYEE, &PRODUCT, &SUPPLIER, &CARRIER];

pub fn by_name(name: &str) -> Option<&'static Entity> {
    ALL.into_iter().find(|e| e.name == name)
}

use FieldKind::{Boolean, Email, Integer, Number, Object, String as Text};

// --- employee ---

pub const EMPLOYEE: Entity = Entity {
    name: "employee",
    plural: "employees",
    service: Service::Hrms,
    routes: Routes {
        list: Some("employee/get-all-employee"),
        get: Some("employee/{id}"),
        create: Some("employee/add-employee"),
        update: Some("employee/update-employee"),
        delete: Some("employee/delete-employee/{id}"),
        delete_many: Some("employee/delete-employees"),
    },
    encoding: WriteEncoding::Multipart,
    bulk_delete: BulkDeleteBody::Wrapped,
    create_fields: EMPLOYEE_CREATE,
    update_fields: EMPLOYEE_UPDATE,
};

const EMPLOYEE_CREATE: &[FieldSpec] = &[
    FieldSpec::required("email", Email, "Employee email address (required)"),
    FieldSpec::required("firstName", Text, "Employee first name (required)"),
    FieldSpec::required("badgeId", Text, "Employee badge ID (required)"),
    FieldSpec::optional("lastName", Text, "Employee last name"),
    FieldSpec::optional("avatarUrl", Text, "URL to employee avatar image"),
    FieldSpec::optional("about", Text, "Brief description about the employee"),
    FieldSpec::optional("departmentId", Integer, "Department ID").nullable(),
    FieldSpec::optional("phone", Text, "Employee phone number"),
    FieldSpec::optional("emergencyPhone", Text, "Emergency contact phone number"),
    FieldSpec::optional("jobPositionId", Integer, "Job position ID").nullable(),
    FieldSpec::optional("country", Text, "Employee country").nullable(),
    FieldSpec::optional("managerId", Integer, "Manager's employee ID").nullable(),
    FieldSpec::optional("coachId", Integer, "Coach's employee ID").nullable(),
];

const EMPLOYEE_UPDATE: &[FieldSpec] = &[
    FieldSpec::required("id", Integer, "ID of the employee to update (required)"),
    FieldSpec::optional("email", Email, "Employee email address"),
    FieldSpec::optional("firstName", Text, "Employee first name"),
    FieldSpec::optional("badgeId", Text, "Employee badge ID"),
    FieldSpec::optional("lastName", Text, "Employee last name"),
    FieldSpec::optional("avatarUrl", Text, "URL to employee avatar image"),
    FieldSpec::optional("about", Text, "Brief description about the employee"),
    FieldSpec::optional("departmentId", Integer, "Department ID").nullable(),
    FieldSpec::optional("phone", Text, "Employee phone number"),
    FieldSpec::optional("emergencyPhone", Text, "Emergency contact phone number"),
    FieldSpec::optional("jobPositionId", Integer, "Job position ID").nullable(),
    FieldSpec::optional("country", Text, "Employee country").nullable(),
    FieldSpec::optional("managerId", Integer, "Manager's employee ID").nullable(),
    FieldSpec::optional("coachId", Integer, "Coach's employee ID").nullable(),
];

// --- product ---

pub const PRODUCT: Entity = Entity {
    name: "product",
    plural: "products",
    service: Service::Scm,
    routes: Routes {
        list: Some("product/get-product-list"),
        get: Some("product/{id}"),
        create: Some("product/save-product"),
        update: Some("product/update-product"),
        delete: Some("product/delete-product/{id}"),
        delete_many: Some("product/delete-products"),
    },
    encoding: WriteEncoding::Multipart,
    bulk_delete: BulkDeleteBody::Bare,
    create_fields: PRODUCT_CREATE,
    update_fields: PRODUCT_UPDATE,
};

const PRODUCT_CREATE: &[FieldSpec] = &[
    FieldSpec::required("productCode", Text, "Product code (required)"),
    FieldSpec::required("productName", Text, "Product name (required)"),
    FieldSpec::required("productCategoryId", Integer, "Product category ID (required)"),
    FieldSpec::required("productType", Text, "Product type (required)"),
    FieldSpec::optional("cost", Number, "Product cost"),
    FieldSpec::optional("isFixedAsset", Boolean, "Whether the product is a fixed asset"),
    FieldSpec::optional("assetCategoryId", Integer, "Asset category ID"),
    FieldSpec::optional("purchasePrice", Number, "Purchase price"),
    FieldSpec::optional("sellingPrice", Number, "Selling price"),
    FieldSpec::optional("purchaseTax", Number, "Purchase tax"),
    FieldSpec::optional("salesTax", Number, "Sales tax"),
    FieldSpec::optional("discount", Number, "Discount"),
    FieldSpec::required("companyId", Integer, "Company ID (required)"),
    FieldSpec::optional("description", Text, "Product description"),
    FieldSpec::optional("avatarFile", Text, "Product image reference").nullable(),
    FieldSpec::optional("status", Boolean, "Whether the product is active"),
    FieldSpec::required("itemUnitId", Integer, "Item unit ID (required)"),
];

const PRODUCT_UPDATE: &[FieldSpec] = &[
    FieldSpec::required("id", Integer, "ID of the product to update (required)"),
    FieldSpec::optional("productCode", Text, "Product code"),
    FieldSpec::optional("productName", Text, "Product name"),
    FieldSpec::optional("productCategoryId", Integer, "Product category ID"),
    FieldSpec::optional("productType", Text, "Product type"),
    FieldSpec::optional("cost", Number, "Product cost"),
    FieldSpec::optional("isFixedAsset", Boolean, "Whether the product is a fixed asset"),
    FieldSpec::optional("assetCategoryId", Integer, "Asset category ID"),
    FieldSpec::optional("purchasePrice", Number, "Purchase price"),
    FieldSpec::optional("sellingPrice", Number, "Selling price"),
    FieldSpec::optional("purchaseTax", Number, "Purchase tax"),
    FieldSpec::optional("salesTax", Number, "Sales tax"),
    FieldSpec::optional("discount", Number, "Discount"),
    FieldSpec::optional("companyId", Integer, "Company ID"),
    FieldSpec::optional("description", Text, "Product description"),
    FieldSpec::optional("avatarFile", Text, "Product image reference").nullable(),
    FieldSpec::optional("status", Boolean, "Whether the product is active"),
    FieldSpec::optional("itemUnitId", Integer, "Item unit ID"),
];

// --- supplier ---

pub const SUPPLIER: Entity = Entity {
    name: "supplier",
    plural: "suppliers",
    service: Service::Scm,
    routes: Routes {
        list: Some("supplier/get-supplier-list"),
        get: Some("supplier/{id}"),
        create: Some("supplier/save-supplier"),
        update: Some("supplier/update-supplier"),
        delete: None,
        delete_many: None,
    },
    encoding: WriteEncoding::Json,
    bulk_delete: BulkDeleteBody::Wrapped,
    create_fields: SUPPLIER_CREATE,
    update_fields: SUPPLIER_UPDATE,
};

const LEGAL_INFO_CREATE: &[FieldSpec] = &[
    FieldSpec::required("businessLicenseNumber", Text, "Business license number (required)"),
    FieldSpec::optional("taxIdentificationNumber", Text, "Tax identification number"),
    FieldSpec::optional("ksaTaxClassification", Text, "KSA tax classification"),
    FieldSpec::optional("vatRegistrationNumber", Text, "VAT registration number"),
    FieldSpec::optional("zakatCertificateFile", Text, "Zakat certificate file reference"),
    FieldSpec::optional("complianceCertificationFile", Text, "Compliance certification file reference"),
    FieldSpec::optional("insuranceCertificateFile", Text, "Insurance certificate file reference"),
    FieldSpec::required("antiCorruptionCompliance", Boolean, "Anti-corruption compliance (required)"),
    FieldSpec::required("ethicalSourcingAgreement", Boolean, "Ethical sourcing agreement (required)"),
    FieldSpec::required("supplierCodeOfConductAgreement", Boolean, "Code of conduct agreement (required)"),
    FieldSpec::optional("legalRepresentativeDetails", Text, "Legal representative details"),
    FieldSpec::optional("commercialRegistration", Text, "Commercial registration"),
    FieldSpec::optional("dunsNumber", Text, "DUNS number"),
];

const BANK_DETAIL_CREATE: &[FieldSpec] = &[
    FieldSpec::required("bankName", Text, "Bank name (required)"),
    FieldSpec::required("branchName", Text, "Branch name (required)"),
    FieldSpec::required("accountHolderName", Text, "Account holder name (required)"),
    FieldSpec::required("accountNumber", Text, "Account number (required)"),
    FieldSpec::optional("address", Text, "Bank address"),
    FieldSpec::required("routingNumber", Text, "Routing number (required)"),
    FieldSpec::optional("accountVerificationFile", Text, "Account verification file reference"),
    FieldSpec::optional("paymentTermsId", Integer, "Payment terms ID"),
    FieldSpec::required("countryId", Integer, "Bank country ID (required)"),
    FieldSpec::required("countryName", Text, "Bank country name (required)"),
    FieldSpec::required("currencyId", Integer, "Currency ID (required)"),
    FieldSpec::required("currencyName", Text, "Currency name (required)"),
];

const SUPPLIER_CREATE: &[FieldSpec] = &[
    FieldSpec::required("firstName", Text, "Supplier first name (required)"),
    FieldSpec::optional("middleName", Text, "Supplier middle name"),
    FieldSpec::required("lastName", Text, "Supplier last name (required)"),
    FieldSpec::required("companyName", Text, "Supplier company name (required)"),
    FieldSpec::optional("companyWebsite", Text, "Company website"),
    FieldSpec::optional("companyAddress", Text, "Company address"),
    FieldSpec::optional("street", Text, "Street"),
    FieldSpec::optional("city", Text, "City"),
    FieldSpec::optional("state", Text, "State"),
    FieldSpec::optional("zipCode", Text, "Zip code"),
    FieldSpec::required("contactNumber", Text, "Supplier contact number (required)"),
    FieldSpec::required("contactEmail", Email, "Supplier contact email (required)"),
    FieldSpec::required("supplierCategoryId", Integer, "Supplier category ID (required)"),
    FieldSpec::required("countryId", Integer, "Supplier country ID (required)"),
    FieldSpec::required("countryName", Text, "Supplier country name (required)"),
    FieldSpec::optional("supplierStatus", Text, "Supplier status"),
    FieldSpec::optional("avatarFile", Text, "Supplier avatar file reference"),
    FieldSpec::required(
        "SupplierLegalInformation",
        Object(LEGAL_INFO_CREATE),
        "Supplier legal information (required)",
    ),
    FieldSpec::required(
        "SupplierBankAccountDetail",
        Object(BANK_DETAIL_CREATE),
        "Supplier bank account details (required)",
    ),
];

const LEGAL_INFO_UPDATE: &[FieldSpec] = &[
    FieldSpec::optional("businessLicenseNumber", Text, "Business license number"),
    FieldSpec::optional("taxIdentificationNumber", Text, "Tax identification number"),
    FieldSpec::optional("ksaTaxClassification", Text, "KSA tax classification"),
    FieldSpec::optional("vatRegistrationNumber", Text, "VAT registration number"),
    FieldSpec::optional("zakatCertificateFile", Text, "Zakat certificate file reference"),
    FieldSpec::optional("complianceCertificationFile", Text, "Compliance certification file reference"),
    FieldSpec::optional("insuranceCertificateFile", Text, "Insurance certificate file reference"),
    FieldSpec::optional("antiCorruptionCompliance", Boolean, "Anti-corruption compliance"),
    FieldSpec::optional("ethicalSourcingAgreement", Boolean, "Ethical sourcing agreement"),
    FieldSpec::optional("supplierCodeOfConductAgreement", Boolean, "Code of conduct agreement"),
    FieldSpec::optional("legalRepresentativeDetails", Text, "Legal representative details"),
    FieldSpec::optional("commercialRegistration", Text, "Commercial registration"),
    FieldSpec::optional("dunsNumber", Text, "DUNS number"),
];

const BANK_DETAIL_UPDATE: &[FieldSpec] = &[
    FieldSpec::optional("bankName", Text, "Bank name"),
    FieldSpec::optional("branchName", Text, "Branch name"),
    FieldSpec::optional("accountHolderName", Text, "Account holder name"),
    FieldSpec::optional("accountNumber", Text, "Account number"),
    FieldSpec::optional("address", Text, "Bank address"),
    FieldSpec::optional("routingNumber", Text, "Routing number"),
    FieldSpec::optional("accountVerificationFile", Text, "Account verification file reference"),
    FieldSpec::optional("paymentTermsId", Integer, "Payment terms ID"),
    FieldSpec::optional("countryId", Integer, "Bank country ID"),
    FieldSpec::optional("countryName", Text, "Bank country name"),
    FieldSpec::optional("currencyId", Integer, "Currency ID"),
    FieldSpec::optional("currencyName", Text, "Currency name"),
];

const SUPPLIER_UPDATE: &[FieldSpec] = &[
    FieldSpec::required("id", Integer, "ID of the supplier to update (required)"),
    FieldSpec::optional("firstName", Text, "Supplier first name"),
    FieldSpec::optional("middleName", Text, "Supplier middle name"),
    FieldSpec::optional("lastName", Text, "Supplier last name"),
    FieldSpec::optional("companyName", Text, "Supplier company name"),
    FieldSpec::optional("companyWebsite", Text, "Company website"),
    FieldSpec::optional("companyAddress", Text, "Company address"),
    FieldSpec::optional("street", Text, "Street"),
    FieldSpec::optional("city", Text, "City"),
    FieldSpec::optional("state", Text, "State"),
    FieldSpec::optional("zipCode", Text, "Zip code"),
    FieldSpec::optional("contactNumber", Text, "Supplier contact number"),
    FieldSpec::optional("contactEmail", Email, "Supplier contact email"),
    FieldSpec::optional("supplierCategoryId", Integer, "Supplier category ID"),
    FieldSpec::optional("countryId", Integer, "Supplier country ID"),
    FieldSpec::optional("countryName", Text, "Supplier country name"),
    FieldSpec::optional("supplierStatus", Text, "Supplier status"),
    FieldSpec::optional("avatarFile", Text, "Supplier avatar file reference"),
    FieldSpec::optional(
        "SupplierLegalInformation",
        Object(LEGAL_INFO_UPDATE),
        "Supplier legal information; replaces the stored block as a whole",
    ),
    FieldSpec::optional(
        "SupplierBankAccountDetail",
        Object(BANK_DETAIL_UPDATE),
        "Supplier bank account details; replaces the stored block as a whole",
    ),
];

// --- carrier ---

pub const CARRIER: Entity = Entity {
    name: "carrier",
    plural: "carriers",
    service: Service::Scm,
    routes: Routes {
        list: None,
        get: None,
        create: Some("carrier/save-carrier"),
        update: None,
        delete: None,
        delete_many: None,
    },
    encoding: WriteEncoding::Json,
    bulk_delete: BulkDeleteBody::Wrapped,
    create_fields: CARRIER_CREATE,
    update_fields: &[],
};

const CARRIER_CREATE: &[FieldSpec] = &[
    FieldSpec::required("carrierName", Text, "Carrier name (required)"),
    FieldSpec::required("phone", Text, "Carrier phone number (required)"),
    FieldSpec::required("email", Email, "Carrier email address (required)"),
    FieldSpec::required("address", Text, "Carrier address (required)"),
];
