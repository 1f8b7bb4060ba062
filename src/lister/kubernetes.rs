//! Event lister backed by the Kubernetes core/v1 Events API.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Event;
use kube::api::ListParams;
use kube::{Api, Client};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::error::{ApiSnafu, ClientInitSnafu, ListError, ListerError};
use crate::event::EventRecord;

use super::EventLister;

/// Lists core/v1 events across all namespaces.
///
/// With a non-zero page size the list is fetched in pages of that many items
/// using the API server's continue token, so a large event backlog does not
/// arrive as one response.
#[derive(Clone)]
pub struct KubeEventLister {
    api: Api<Event>,
    page_size: u32,
}

impl KubeEventLister {
    /// Create a lister from an existing client.
    pub fn new(client: Client, page_size: u32) -> Self {
        Self {
            api: Api::all(client),
            page_size,
        }
    }

    /// Create a lister from the ambient configuration.
    ///
    /// Uses the local kubeconfig when present and falls back to the in-cluster
    /// service account otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if no usable credentials are found.
    pub async fn try_default(page_size: u32) -> Result<Self, ListerError> {
        let client = Client::try_default().await.context(ClientInitSnafu)?;
        info!(
            default_namespace = client.default_namespace(),
            page_size, "Connected to Kubernetes API"
        );
        Ok(Self::new(client, page_size))
    }

    fn first_page_params(&self) -> ListParams {
        let params = ListParams::default();
        if self.page_size > 0 {
            params.limit(self.page_size)
        } else {
            params
        }
    }
}

#[async_trait]
impl EventLister for KubeEventLister {
    async fn list(&self) -> Result<Vec<EventRecord>, ListError> {
        let mut params = self.first_page_params();
        let mut records = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self.api.list(&params).await.context(ApiSnafu)?;
            pages += 1;
            records.extend(page.items.iter().map(EventRecord::from));

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    params = self.first_page_params().continue_token(&token);
                }
                _ => break,
            }
        }

        debug!(records = records.len(), pages, "Listed events");
        Ok(records)
    }
}
