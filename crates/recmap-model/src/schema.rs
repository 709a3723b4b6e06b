//! Target entity field schemas.
//!
//! Schemas are owned and versioned by an external provider; this core only
//! reads them through the [`SchemaProvider`] trait.

use serde::{Deserialize, Serialize};

/// Conventional key of the free-form container some entities expose for
/// fields outside the fixed schema.
pub const CUSTOM_FIELDS_KEY: &str = "customFields";

/// Declared type of a target entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    String,
    LocalizedString,
    Id,
    Enum,
    Number,
    Money,
    Boolean,
    Date,
    Relation,
    Asset,
    Json,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::LocalizedString => "localized-string",
            FieldType::Id => "id",
            FieldType::Enum => "enum",
            FieldType::Number => "number",
            FieldType::Money => "money",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Relation => "relation",
            FieldType::Asset => "asset",
            FieldType::Json => "json",
        }
    }
}

/// One field of a target entity schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityField {
    /// Field key as it appears in mapped output.
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl EntityField {
    pub fn new(key: &str, field_type: FieldType) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            required: false,
            readonly: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Ordered field list for one target entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityFieldSchema {
    /// Entity type name (e.g. "product", "customer").
    pub entity: String,
    pub fields: Vec<EntityField>,
}

impl EntityFieldSchema {
    pub fn new(entity: &str, fields: Vec<EntityField>) -> Self {
        Self {
            entity: entity.to_string(),
            fields,
        }
    }

    /// Look up a field by key (case-sensitive, keys are canonical).
    pub fn field(&self, key: &str) -> Option<&EntityField> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// True when the schema exposes a free-form custom-fields container.
    pub fn has_custom_fields(&self) -> bool {
        self.fields.iter().any(|field| field.key == CUSTOM_FIELDS_KEY)
    }
}

/// External provider of entity field schemas.
///
/// A pure lookup: implementations return `None` for unknown entity types
/// and the core treats that as an empty suggestion list or a validation
/// error, never a panic.
pub trait SchemaProvider {
    fn field_schema(&self, entity_type: &str) -> Option<EntityFieldSchema>;
}

/// In-memory schema provider, mainly for tests and embedded callers.
#[derive(Debug, Default)]
pub struct StaticSchemaProvider {
    schemas: std::collections::BTreeMap<String, EntityFieldSchema>,
}

impl StaticSchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: EntityFieldSchema) -> Self {
        self.schemas.insert(schema.entity.clone(), schema);
        self
    }
}

impl SchemaProvider for StaticSchemaProvider {
    fn field_schema(&self, entity_type: &str) -> Option<EntityFieldSchema> {
        self.schemas.get(entity_type).cloned()
    }
}
