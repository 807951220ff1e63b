use serde::{Deserialize, Serialize};

use crate::openai::create_chat_completions::types::ChatCompletionRequestMessage;

/// `POST /v1/chat/completions` body. `stream`, `user` and sampling parameters
/// are accepted with any JSON type and dropped; the conversation only selects
/// the image prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateChatCompletionRequestBody {
    #[serde(default)]
    pub messages: Vec<ChatCompletionRequestMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_fields_accept_any_type() {
        let parsed: CreateChatCompletionRequestBody = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":"a cat"}],"stream":"yes","user":7,"temperature":"hot"}"#,
        )
        .expect("deserialize chat body");
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.model, None);
    }
}
