use serde::{Deserialize, Serialize};

use crate::openai::list_models::types::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListObjectType {
    #[serde(rename = "list")]
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListModelsResponse {
    /// The object type, which is always "list".
    pub object: ListObjectType,
    pub data: Vec<Model>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::list_models::types::ModelObjectType;

    #[test]
    fn serializes_openai_list_shape() {
        let response = ListModelsResponse {
            object: ListObjectType::List,
            data: vec![Model {
                id: "replicate/flux-schnell".to_string(),
                object: ModelObjectType::Model,
                created: 1_700_000_000,
                owned_by: "pixgate".to_string(),
            }],
        };

        let value = serde_json::to_value(&response).expect("serialize list models");
        assert_eq!(value["object"], "list");
        assert_eq!(value["data"][0]["id"], "replicate/flux-schnell");
        assert_eq!(value["data"][0]["object"], "model");
        assert_eq!(value["data"][0]["created"], 1_700_000_000);
        assert_eq!(value["data"][0]["owned_by"], "pixgate");
    }
}
