use serde::{Deserialize, Serialize};

/// `{ "error": { "message", "type", "code" } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub message: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, r#type: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: ErrorObject {
                message: message.into(),
                r#type: r#type.into(),
                code: code.into(),
            },
        }
    }
}
