use uuid::Uuid;

/// Per-request state threaded through every component. Owned by the request
/// that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Opaque correlation token; also returned in the trace header.
    pub trace_id: String,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            trace_id: format!("pixgate-{}", Uuid::new_v4()),
        }
    }

    pub fn with_trace_id(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_ids_are_unique_and_prefixed() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert!(a.trace_id.starts_with("pixgate-"));
        assert_ne!(a.trace_id, b.trace_id);
    }
}
