use http::Method;

use crate::error::GatewayError;

/// What a request needs before routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// CORS preflight under `/v1/`; answered without authentication.
    Preflight,
    /// Any other request under `/v1/`; authenticated before routing.
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListModels,
    ImageGenerations,
    ChatCompletions,
}

impl Route {
    pub fn operation(self) -> &'static str {
        match self {
            Route::ListModels => "openai.models_list",
            Route::ImageGenerations => "openai.images_generations",
            Route::ChatCompletions => "openai.chat",
        }
    }
}

/// Paths outside `/v1/` are rejected here, before authentication.
pub fn classify_scope(method: &Method, path: &str) -> Result<Scope, GatewayError> {
    if !path.starts_with("/v1/") {
        return Err(GatewayError::not_found(format!("path not found: {path}")));
    }
    if *method == Method::OPTIONS {
        return Ok(Scope::Preflight);
    }
    Ok(Scope::Protected)
}

pub fn classify_route(method: &Method, path: &str) -> Result<Route, GatewayError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["v1", "models"] => {
            ensure_method(method, Method::GET, "models list")?;
            Ok(Route::ListModels)
        }
        ["v1", "images", "generations"] => {
            ensure_method(method, Method::POST, "image generations")?;
            Ok(Route::ImageGenerations)
        }
        ["v1", "chat", "completions"] => {
            ensure_method(method, Method::POST, "chat completions")?;
            Ok(Route::ChatCompletions)
        }
        _ => Err(GatewayError::not_found(format!(
            "unsupported api path: {path}"
        ))),
    }
}

fn ensure_method(method: &Method, expected: Method, label: &str) -> Result<(), GatewayError> {
    if *method == expected {
        Ok(())
    } else {
        Err(GatewayError::method_not_allowed(format!(
            "invalid method {method} for {label}",
        )))
    }
}
