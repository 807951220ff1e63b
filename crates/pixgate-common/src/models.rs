use serde::{Deserialize, Serialize};

/// Public model id used when a request does not name one.
pub const DEFAULT_MODEL: &str = "replicate/flux-1.1-pro-ultra";

/// One row of the model table: public id -> upstream (provider, model id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub id: String,
    pub provider: String,
    pub model_id: String,
}

impl ModelSpec {
    pub fn new(id: &str, provider: &str, model_id: &str) -> Self {
        Self {
            id: id.to_string(),
            provider: provider.to_string(),
            model_id: model_id.to_string(),
        }
    }
}

const BUILTIN_MODELS: &[(&str, &str, &str)] = &[
    // Replicate
    ("replicate/flux-1.1-pro-ultra", "replicate", "black-forest-labs/flux-1.1-pro-ultra"),
    ("replicate/flux-1.1-pro", "replicate", "black-forest-labs/flux-1.1-pro"),
    ("replicate/flux-pro", "replicate", "black-forest-labs/flux-pro"),
    ("replicate/flux-schnell", "replicate", "black-forest-labs/flux-schnell"),
    ("replicate/ideogram-v2", "replicate", "ideogram/ideogram-v2"),
    ("replicate/ideogram-v2-turbo", "replicate", "ideogram/ideogram-v2-turbo"),
    ("replicate/photon", "replicate", "photon"),
    ("replicate/photon-flash", "replicate", "photon-flash"),
    ("replicate/recraft-v3", "replicate", "recraft-v3"),
    (
        "replicate/stable-diffusion-3.5-large",
        "replicate",
        "stability-ai/stable-diffusion-3.5-large",
    ),
    (
        "replicate/stable-diffusion-3.5-turbo",
        "replicate",
        "stability-ai/stable-diffusion-3.5-large-turbo",
    ),
    // Vertex AI
    ("vertex/imagen-3.0-fast", "vertex", "imagen-3.0-fast-generate-001"),
    ("vertex/imagen-3.0-standard", "vertex", "imagen-3.0-generate-001"),
    // Fireworks
    ("fireworks/flux-1-dev-fp8", "fireworks", "accounts/fireworks/models/flux-1-dev-fp8"),
    (
        "fireworks/flux-1-schnell-fp8",
        "fireworks",
        "accounts/fireworks/models/flux-1-schnell-fp8",
    ),
    (
        "fireworks/playground-v2.5",
        "fireworks",
        "accounts/fireworks/models/playground-v2.5-1024px-aesthetic",
    ),
    (
        "fireworks/playground-v2",
        "fireworks",
        "accounts/fireworks/models/playground-v2-1024px-aesthetic",
    ),
    (
        "fireworks/japanese-sdxl",
        "fireworks",
        "accounts/fireworks/models/japanese-stable-diffusion-xl",
    ),
    ("fireworks/ssd-1b", "fireworks", "accounts/fireworks/models/ssd-1b"),
    (
        "fireworks/stable-diffusion-xl-1.0",
        "fireworks",
        "accounts/fireworks/models/stable-diffusion-xl-1024-v1-0",
    ),
];

/// The model table shipped with the binary, in declaration order.
pub fn builtin_models() -> Vec<ModelSpec> {
    BUILTIN_MODELS
        .iter()
        .map(|(id, provider, model_id)| ModelSpec::new(id, provider, model_id))
        .collect()
}
