use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelObjectType {
    #[serde(rename = "model")]
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Model {
    /// Public model identifier, as accepted in the `model` request field.
    pub id: String,
    /// The object type, which is always "model".
    pub object: ModelObjectType,
    /// Unix timestamp (seconds).
    pub created: i64,
    pub owned_by: String,
}
