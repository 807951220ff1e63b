//! Inbound OpenAI bodies -> upstream payload.

use pixgate_protocol::openai::create_chat_completions::{
    ChatCompletionRole, CreateChatCompletionRequestBody,
};
use pixgate_protocol::openai::create_image::{CreateImageRequestBody, ImageResponseFormat};
use pixgate_protocol::upstream::GenerateImageRequestBody;
use serde_json::Value as JsonValue;

use crate::error::GatewayError;
use crate::registry::ModelRegistry;

/// Normalized image-generation request shared by the image and chat paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: Option<String>,
    pub response_format: ImageResponseFormat,
}

/// A request that is ready to go upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCall {
    pub payload: GenerateImageRequestBody,
    /// Public id the model resolved to (the default when none was given).
    pub public_model: String,
    pub response_format: ImageResponseFormat,
}

pub fn from_image_request(body: &[u8], registry: &ModelRegistry) -> Result<ImageCall, GatewayError> {
    let request = parse_image_request(body)?;
    resolve(request, registry)
}

/// Chat is a view over image generation: the last user message becomes the
/// prompt and the result is always requested as base64.
pub fn from_chat_request(body: &[u8], registry: &ModelRegistry) -> Result<ImageCall, GatewayError> {
    let request = parse_chat_request(body)?;
    resolve(request, registry)
}

pub fn parse_image_request(body: &[u8]) -> Result<GenerationRequest, GatewayError> {
    let value: JsonValue = if body.iter().all(u8::is_ascii_whitespace) {
        JsonValue::Null
    } else {
        serde_json::from_slice(body)
            .map_err(|err| GatewayError::invalid_request(format!("invalid json: {err}")))?
    };

    // The prompt check comes first so that a missing prompt wins over any
    // other problem with the body.
    match value.get("prompt") {
        None | Some(JsonValue::Null) => {
            return Err(GatewayError::missing_parameter(
                "missing 'prompt' in request body",
            ));
        }
        Some(JsonValue::String(prompt)) if prompt.trim().is_empty() => {
            return Err(GatewayError::missing_parameter(
                "missing 'prompt' in request body",
            ));
        }
        Some(JsonValue::String(_)) => {}
        Some(_) => return Err(GatewayError::invalid_request("'prompt' must be a string")),
    }

    let parsed: CreateImageRequestBody = serde_json::from_value(value)
        .map_err(|err| GatewayError::invalid_request(format!("invalid request body: {err}")))?;

    Ok(GenerationRequest {
        prompt: parsed.prompt.unwrap_or_default(),
        model: parsed.model,
        response_format: parsed.response_format.unwrap_or_default(),
    })
}

pub fn parse_chat_request(body: &[u8]) -> Result<GenerationRequest, GatewayError> {
    let parsed: CreateChatCompletionRequestBody = serde_json::from_slice(body)
        .map_err(|err| GatewayError::invalid_request(format!("invalid request body: {err}")))?;

    let prompt = parsed
        .messages
        .iter()
        .rev()
        .find(|message| message.role == ChatCompletionRole::User)
        .and_then(|message| message.content.as_ref())
        .map(|content| content.text())
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            GatewayError::invalid_request("no valid user message found in 'messages'")
        })?;

    Ok(GenerationRequest {
        prompt,
        model: parsed.model,
        response_format: ImageResponseFormat::B64Json,
    })
}

pub fn resolve(
    request: GenerationRequest,
    registry: &ModelRegistry,
) -> Result<ImageCall, GatewayError> {
    // An empty or blank model counts as absent.
    let model = request
        .model
        .as_deref()
        .filter(|model| !model.trim().is_empty());
    let entry = registry.resolve(model).ok_or_else(|| {
        GatewayError::invalid_model(format!(
            "unsupported model: {}",
            model.unwrap_or_default()
        ))
    })?;

    Ok(ImageCall {
        payload: GenerateImageRequestBody {
            prompt: request.prompt,
            provider: entry.provider.clone(),
            model_id: entry.upstream_model_id.clone(),
        },
        public_model: entry.public_id.clone(),
        response_format: request.response_format,
    })
}
