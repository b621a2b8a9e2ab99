//! Request correlation tokens.
//!
//! # Responsibilities
//! - Create a trace per logical operation (e.g., per incoming request)
//! - Carry trace and span ids into every outgoing call it causes
//!
//! # Design Decisions
//! - Immutable once created; passed explicitly as `&Trace`, never via globals
//! - Observability only: never changes routing, timeouts or outcome
//! - Sent to peers as `x-trace-id` / `x-span-id` headers

use std::fmt;

use rand::Rng;
use uuid::Uuid;

/// Header carrying the trace id on outgoing requests.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Header carrying the span id on outgoing requests.
pub const SPAN_ID_HEADER: &str = "x-span-id";

/// Correlation token threaded through outgoing calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trace {
    trace_id: String,
    span_id: String,
}

impl Trace {
    /// Create a new trace with fresh trace and span ids.
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4().simple().to_string(),
            span_id: new_span_id(),
        }
    }

    /// Create a trace sharing this trace id with a fresh span id.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: new_span_id(),
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trace_id={} span_id={}", self.trace_id, self.span_id)
    }
}

fn new_span_id() -> String {
    format!("{:016x}", rand::thread_rng().gen::<u64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_trace_ids_are_hex() {
        let trace = Trace::new();
        assert_eq!(trace.trace_id().len(), 32);
        assert_eq!(trace.span_id().len(), 16);
        assert!(trace.trace_id().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(trace.span_id().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_traces_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| Trace::new().trace_id().to_string()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_child_keeps_trace_id() {
        let parent = Trace::new();
        let child = parent.child();
        assert_eq!(child.trace_id(), parent.trace_id());
        assert_ne!(child.span_id(), parent.span_id());
    }

    #[test]
    fn test_display() {
        let trace = Trace::new();
        let rendered = trace.to_string();
        assert!(rendered.contains(trace.trace_id()));
        assert!(rendered.contains(trace.span_id()));
    }
}
