use serde::{Deserialize, Serialize};

/// The upstream only ever returns base64 data, so `url` is not a variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageResponseFormat {
    #[default]
    #[serde(rename = "b64_json")]
    B64Json,
}

/// `POST /v1/images/generations` body.
///
/// Only the fields the gateway acts on are typed. Everything else (`n`,
/// `size`, `quality`, `user`, ...) is accepted with any JSON type and dropped;
/// one image is generated per call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateImageRequestBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ImageResponseFormat>,
}
