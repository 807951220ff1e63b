//! Upstream results -> OpenAI envelopes.

use bytes::Bytes;
use pixgate_protocol::openai::create_chat_completions::{
    ChatCompletionChoice, ChatCompletionFinishReason, ChatCompletionObjectType,
    ChatCompletionResponseMessage, ChatCompletionResponseRole, CompletionUsage,
    CreateChatCompletionResponse,
};
use pixgate_protocol::openai::create_image::{CreateImageResponse, ImageData, ImageResponseFormat};
use pixgate_protocol::openai::list_models::{ListModelsResponse, ListObjectType, Model, ModelObjectType};
use pixgate_protocol::upstream::GenerateImageResponseBody;

use crate::context::RequestContext;
use crate::error::GatewayError;
use crate::registry::ModelRegistry;
use crate::retry::UpstreamOutcome;
use crate::upstream_client::UpstreamFailure;

pub const OWNED_BY: &str = "pixgate";

/// Turns the upstream outcome into the base64 image, or the error the caller
/// sees.
pub fn image_from_outcome(outcome: UpstreamOutcome) -> Result<String, GatewayError> {
    match outcome {
        UpstreamOutcome::Success { body } => extract_image(&body),
        UpstreamOutcome::Failure { status, body } => Err(upstream_error(status, &body)),
    }
}

/// A 2xx reply is only usable when it carries a non-empty `image` string.
pub fn extract_image(body: &[u8]) -> Result<String, GatewayError> {
    let parsed: GenerateImageResponseBody = serde_json::from_slice(body).map_err(|err| {
        GatewayError::bad_gateway(format!("upstream returned an unreadable body: {err}"))
    })?;
    parsed
        .image
        .filter(|image| !image.is_empty())
        .ok_or_else(|| GatewayError::bad_gateway("no image data found in upstream response"))
}

pub fn upstream_error(status: u16, body: &Bytes) -> GatewayError {
    let body = String::from_utf8_lossy(body);
    GatewayError::upstream(status, format!("upstream returned {status}: {body}"))
}

pub fn transport_error(failure: &UpstreamFailure) -> GatewayError {
    GatewayError::internal(format!("internal error while handling request: {failure}"))
}

pub fn image_response(
    image: String,
    format: ImageResponseFormat,
    created: i64,
) -> CreateImageResponse {
    let data = match format {
        ImageResponseFormat::B64Json => ImageData {
            b64_json: Some(image),
            ..ImageData::default()
        },
    };
    CreateImageResponse {
        created,
        data: vec![data],
    }
}

pub fn markdown_image(b64: &str) -> String {
    format!("![Generated Image](data:image/png;base64,{b64})")
}

pub fn chat_response(
    ctx: &RequestContext,
    model: &str,
    image: &str,
    created: i64,
) -> CreateChatCompletionResponse {
    CreateChatCompletionResponse {
        id: format!("chatcmpl-{}", ctx.trace_id),
        object: ChatCompletionObjectType::ChatCompletion,
        created,
        model: model.to_string(),
        choices: vec![ChatCompletionChoice {
            index: 0,
            message: ChatCompletionResponseMessage {
                role: ChatCompletionResponseRole::Assistant,
                content: Some(markdown_image(image)),
            },
            finish_reason: ChatCompletionFinishReason::Stop,
        }],
        usage: CompletionUsage::default(),
    }
}

pub fn models_response(registry: &ModelRegistry, created: i64) -> ListModelsResponse {
    ListModelsResponse {
        object: ListObjectType::List,
        data: registry
            .list_all()
            .map(|id| Model {
                id: id.to_string(),
                object: ModelObjectType::Model,
                created,
                owned_by: OWNED_BY.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use pixgate_common::{DEFAULT_MODEL, builtin_models};

    use super::*;
    use crate::error::ErrorCode;
    use crate::upstream_client::UpstreamTransportErrorKind;

    const B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

    #[test]
    fn extracts_image_verbatim() {
        let body = format!(r#"{{"image":"{B64}"}}"#);
        assert_eq!(extract_image(body.as_bytes()).unwrap(), B64);
    }

    #[test]
    fn success_without_image_is_bad_gateway() {
        let bodies: [&[u8]; 5] = [
            br#"{}"#,
            br#"{"image":""}"#,
            br#"{"image":null}"#,
            b"<html>oops</html>",
            br#"{"image":42}"#,
        ];
        for body in bodies {
            let err = extract_image(body).unwrap_err();
            assert_eq!(err.code, ErrorCode::BadGateway);
            assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn failure_outcome_carries_status_and_body() {
        let err = image_from_outcome(UpstreamOutcome::Failure {
            status: 503,
            body: Bytes::from_static(b"overloaded"),
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message, "upstream returned 503: overloaded");
    }

    #[test]
    fn transport_failure_is_internal_error() {
        let err = transport_error(&UpstreamFailure::Transport {
            kind: UpstreamTransportErrorKind::Connect,
            message: "connection refused".to_string(),
        });
        assert_eq!(err.code, ErrorCode::InternalServerError);
        assert!(err.message.contains("connection refused"));
    }

    #[test]
    fn image_envelope_has_single_entry_under_format_key() {
        let response = image_response(B64.to_string(), ImageResponseFormat::B64Json, 7);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["created"], 7);
        assert_eq!(value["data"].as_array().unwrap().len(), 1);
        assert_eq!(value["data"][0]["b64_json"], B64);
    }

    #[test]
    fn chat_envelope_embeds_markdown_image() {
        let ctx = RequestContext::with_trace_id("pixgate-test");
        let response = chat_response(&ctx, DEFAULT_MODEL, B64, 9);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], "chatcmpl-pixgate-test");
        assert_eq!(value["object"], "chat.completion");
        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["choices"][0]["index"], 0);
        assert_eq!(value["choices"][0]["message"]["role"], "assistant");
        assert_eq!(
            value["choices"][0]["message"]["content"],
            format!("![Generated Image](data:image/png;base64,{B64})")
        );
        assert_eq!(value["choices"][0]["finish_reason"], "stop");
        assert_eq!(value["usage"]["prompt_tokens"], 0);
        assert_eq!(value["usage"]["completion_tokens"], 0);
        assert_eq!(value["usage"]["total_tokens"], 0);
    }

    #[test]
    fn models_envelope_lists_registry_in_order() {
        let registry = ModelRegistry::new(builtin_models(), DEFAULT_MODEL).unwrap();
        let response = models_response(&registry, 11);
        assert_eq!(response.data.len(), registry.len());
        assert_eq!(response.data[0].id, DEFAULT_MODEL);
        assert!(response.data.iter().all(|model| model.owned_by == OWNED_BY));
    }
}
