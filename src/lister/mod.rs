//! Event source abstraction.
//!
//! The collector depends only on the `EventLister` trait, so tests can drive it
//! with in-memory listers while production uses [`KubeEventLister`].

mod kubernetes;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ListError;
use crate::event::EventRecord;

pub use kubernetes::KubeEventLister;

/// A read-only query capability returning every event visible cluster-wide.
///
/// Implementations must be safe to call concurrently; the collector shares a
/// single lister across all in-flight scrapes.
#[async_trait]
pub trait EventLister: Send + Sync {
    /// List all events across all namespaces.
    async fn list(&self) -> Result<Vec<EventRecord>, ListError>;
}

/// Shared reference to an event lister.
pub type EventListerRef = Arc<dyn EventLister>;
