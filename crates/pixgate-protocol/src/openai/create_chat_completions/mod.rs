pub mod request;
pub mod response;
pub mod types;

pub use request::CreateChatCompletionRequestBody;
pub use response::{ChatCompletionChoice, ChatCompletionObjectType, CreateChatCompletionResponse};
pub use types::{
    ChatCompletionContentPart, ChatCompletionFinishReason, ChatCompletionMessageContent,
    ChatCompletionRequestMessage, ChatCompletionResponseMessage, ChatCompletionResponseRole,
    ChatCompletionRole, CompletionUsage,
};
