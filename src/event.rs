//! Event records as seen by the collector.

use k8s_openapi::api::core::v1::Event;

/// A single event record reported by the event source.
///
/// Records are not deduplicated upstream: several records may share the same
/// `(reason, type, involved_object_kind)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub reason: String,
    /// Event type, e.g. `Normal` or `Warning`.
    pub type_: String,
    /// Kind of the object the event is about, e.g. `Pod`.
    pub involved_object_kind: String,
    /// Number of occurrences this record stands for.
    pub count: u64,
}

impl EventRecord {
    pub fn new(
        reason: impl Into<String>,
        type_: impl Into<String>,
        involved_object_kind: impl Into<String>,
        count: u64,
    ) -> Self {
        Self {
            reason: reason.into(),
            type_: type_.into(),
            involved_object_kind: involved_object_kind.into(),
            count,
        }
    }
}

impl From<&Event> for EventRecord {
    /// Absent fields map to the empty string; an absent or negative count maps to 0.
    fn from(event: &Event) -> Self {
        Self {
            reason: event.reason.clone().unwrap_or_default(),
            type_: event.type_.clone().unwrap_or_default(),
            involved_object_kind: event.involved_object.kind.clone().unwrap_or_default(),
            count: event
                .count
                .and_then(|count| u64::try_from(count).ok())
                .unwrap_or(0),
        }
    }
}
