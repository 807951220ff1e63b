use std::collections::HashMap;

use pixgate_common::ModelSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub public_id: String,
    pub provider: String,
    pub upstream_model_id: String,
}

impl From<ModelSpec> for ModelEntry {
    fn from(spec: ModelSpec) -> Self {
        Self {
            public_id: spec.id,
            provider: spec.provider,
            upstream_model_id: spec.model_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("model table is empty")]
    Empty,
    #[error("duplicate model id: {0}")]
    DuplicateModel(String),
    #[error("default model {0} is not in the model table")]
    MissingDefault(String),
}

/// Read-only public model table. Built once at start-up; the only way to change
/// it is a restart.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    index: HashMap<String, usize>,
    default_id: String,
}

impl ModelRegistry {
    pub fn new(
        specs: impl IntoIterator<Item = ModelSpec>,
        default_id: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let default_id = default_id.into();
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for spec in specs {
            let entry = ModelEntry::from(spec);
            if index.contains_key(&entry.public_id) {
                return Err(RegistryError::DuplicateModel(entry.public_id));
            }
            index.insert(entry.public_id.clone(), entries.len());
            entries.push(entry);
        }
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        if !index.contains_key(&default_id) {
            return Err(RegistryError::MissingDefault(default_id));
        }
        Ok(Self {
            entries,
            index,
            default_id,
        })
    }

    pub fn lookup(&self, public_id: &str) -> Option<&ModelEntry> {
        self.index.get(public_id).map(|idx| &self.entries[*idx])
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn default_entry(&self) -> &ModelEntry {
        // `new` guarantees the default is indexed.
        &self.entries[self.index[&self.default_id]]
    }

    /// `None` resolves to the default model.
    pub fn resolve(&self, public_id: Option<&str>) -> Option<&ModelEntry> {
        match public_id {
            Some(id) => self.lookup(id),
            None => Some(self.default_entry()),
        }
    }

    /// Public ids in declaration order.
    pub fn list_all(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.public_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pixgate_common::{DEFAULT_MODEL, builtin_models};

    use super::*;

    fn builtin() -> ModelRegistry {
        ModelRegistry::new(builtin_models(), DEFAULT_MODEL).unwrap()
    }

    #[test]
    fn every_registered_id_resolves() {
        let registry = builtin();
        for spec in builtin_models() {
            let entry = registry.lookup(&spec.id).expect("registered id");
            assert_eq!(entry.provider, spec.provider);
            assert_eq!(entry.upstream_model_id, spec.model_id);
        }
    }

    #[test]
    fn unknown_ids_do_not_resolve() {
        let registry = builtin();
        for id in ["", "dall-e-3", "replicate/", "REPLICATE/FLUX-PRO", "replicate/flux-pro "] {
            assert!(registry.lookup(id).is_none(), "{id:?} should not resolve");
        }
    }

    #[test]
    fn missing_model_resolves_to_default() {
        let registry = builtin();
        let entry = registry.resolve(None).unwrap();
        assert_eq!(entry.public_id, DEFAULT_MODEL);
        assert_eq!(entry.provider, "replicate");
        assert_eq!(entry.upstream_model_id, "black-forest-labs/flux-1.1-pro-ultra");
        assert!(registry.lookup(registry.default_id()).is_some());
    }

    #[test]
    fn list_keeps_declaration_order() {
        let registry = builtin();
        let listed: Vec<&str> = registry.list_all().collect();
        let declared: Vec<String> = builtin_models().into_iter().map(|spec| spec.id).collect();
        assert_eq!(listed, declared);
    }

    #[test]
    fn rejects_duplicates() {
        let specs = vec![
            ModelSpec::new("a", "p", "m1"),
            ModelSpec::new("a", "p", "m2"),
        ];
        assert_eq!(
            ModelRegistry::new(specs, "a").unwrap_err(),
            RegistryError::DuplicateModel("a".to_string())
        );
    }

    #[test]
    fn rejects_unknown_default() {
        let specs = vec![ModelSpec::new("a", "p", "m1")];
        assert_eq!(
            ModelRegistry::new(specs, "b").unwrap_err(),
            RegistryError::MissingDefault("b".to_string())
        );
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(
            ModelRegistry::new(Vec::new(), "a").unwrap_err(),
            RegistryError::Empty
        );
    }
}
