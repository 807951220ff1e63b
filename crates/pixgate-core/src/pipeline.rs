//! The three operations, composed from translator, upstream client and
//! normalizer. Chat goes through the same [`generate`] call as images.

use pixgate_protocol::openai::create_chat_completions::CreateChatCompletionResponse;
use pixgate_protocol::openai::create_image::CreateImageResponse;
use pixgate_protocol::openai::list_models::ListModelsResponse;
use time::OffsetDateTime;
use tracing::info;

use crate::context::RequestContext;
use crate::core::CoreState;
use crate::error::GatewayError;
use crate::normalize;
use crate::translate::{self, ImageCall};

pub fn list_models(state: &CoreState) -> ListModelsResponse {
    normalize::models_response(&state.registry, unix_now())
}

pub async fn create_image(
    state: &CoreState,
    ctx: &RequestContext,
    body: &[u8],
) -> Result<CreateImageResponse, GatewayError> {
    let call = translate::from_image_request(body, &state.registry)?;
    let image = generate(state, ctx, &call).await?;
    Ok(normalize::image_response(image, call.response_format, unix_now()))
}

pub async fn create_chat_completion(
    state: &CoreState,
    ctx: &RequestContext,
    body: &[u8],
) -> Result<CreateChatCompletionResponse, GatewayError> {
    let call = translate::from_chat_request(body, &state.registry)?;
    let image = generate(state, ctx, &call).await?;
    Ok(normalize::chat_response(
        ctx,
        &call.public_model,
        &image,
        unix_now(),
    ))
}

/// Sends one resolved call upstream and returns the base64 image.
pub async fn generate(
    state: &CoreState,
    ctx: &RequestContext,
    call: &ImageCall,
) -> Result<String, GatewayError> {
    info!(
        event = "generation_started",
        trace_id = %ctx.trace_id,
        model = %call.public_model,
        provider = %call.payload.provider,
        prompt_chars = call.payload.prompt.chars().count()
    );
    let outcome = state
        .upstream
        .send(&call.payload, ctx)
        .await
        .map_err(|failure| normalize::transport_error(&failure))?;
    normalize::image_from_outcome(outcome)
}

fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
