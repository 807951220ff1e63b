use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatCompletionRole {
    #[serde(rename = "developer")]
    Developer,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "tool")]
    Tool,
    #[serde(rename = "function")]
    Function,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatCompletionContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatCompletionMessageContent {
    Text(String),
    Parts(Vec<ChatCompletionContentPart>),
}

impl ChatCompletionMessageContent {
    /// Plain text of the message. Non-text parts (images, audio) are skipped and
    /// text parts are joined with newlines.
    pub fn text(&self) -> String {
        match self {
            ChatCompletionMessageContent::Text(text) => text.clone(),
            ChatCompletionMessageContent::Parts(parts) => parts
                .iter()
                .filter(|part| part.kind == "text")
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatCompletionRequestMessage {
    pub role: ChatCompletionRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ChatCompletionMessageContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatCompletionResponseRole {
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatCompletionResponseMessage {
    pub role: ChatCompletionResponseRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatCompletionFinishReason {
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "length")]
    Length,
    #[serde(rename = "content_filter")]
    ContentFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletionUsage {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_accepts_plain_string() {
        let message: ChatCompletionRequestMessage =
            serde_json::from_str(r#"{"role":"user","content":"draw a cat"}"#).unwrap();
        assert_eq!(message.role, ChatCompletionRole::User);
        assert_eq!(message.content.unwrap().text(), "draw a cat");
    }

    #[test]
    fn content_parts_keep_only_text() {
        let message: ChatCompletionRequestMessage = serde_json::from_str(
            r#"{
              "role": "user",
              "content": [
                { "type": "text", "text": "a lighthouse" },
                { "type": "image_url", "image_url": { "url": "https://example.com/a.png" } },
                { "type": "text", "text": "at dusk" }
              ]
            }"#,
        )
        .unwrap();
        assert_eq!(message.content.unwrap().text(), "a lighthouse\nat dusk");
    }

    #[test]
    fn unknown_role_maps_to_other() {
        let message: ChatCompletionRequestMessage =
            serde_json::from_str(r#"{"role":"critic","content":"x"}"#).unwrap();
        assert_eq!(message.role, ChatCompletionRole::Other);
    }
}
