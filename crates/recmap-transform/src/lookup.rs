use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered reference dataset for the `lookup` transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupTable {
    /// Registry name referenced by `TransformConfig::Lookup.table`.
    pub name: String,
    /// Table rows; each row is an object.
    pub data: Vec<Value>,
    /// Default join field when a lookup does not name one.
    pub key_field: String,
}

impl LookupTable {
    pub fn new(name: &str, key_field: &str, data: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            data,
            key_field: key_field.to_string(),
        }
    }
}
