//! Schema of the image-generation backend.

use serde::{Deserialize, Serialize};

/// Body of the single upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageRequestBody {
    pub prompt: String,
    pub provider: String,
    #[serde(rename = "modelId")]
    pub model_id: String,
}

/// Successful upstream body. `image` is raw base64 image data; its absence on a
/// 2xx reply is a distinct failure handled by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageResponseBody {
    #[serde(default)]
    pub image: Option<String>,
}
