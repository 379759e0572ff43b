//! Child Data Provider
//!
//! The controller only depends on [`ChildProvider`]: given a node id, asynchronously
//! produce its children or a [`ProviderError`]. Backends are injected, so a mock generator,
//! a closure or a real source can be swapped without touching the controller.

pub mod mock;

use crate::error::ProviderError;
use crate::tree::Node;
use async_trait::async_trait;
use futures::future::BoxFuture;

pub use mock::{MockChildProvider, MockProviderConfig};

/// Async source of a node's children
#[async_trait]
pub trait ChildProvider: Send + Sync {
    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<Node>, ProviderError>;
}

/// Future returned by closure-backed providers
pub type FetchFuture = BoxFuture<'static, Result<Vec<Node>, ProviderError>>;

/// Provider backed by a plain function `parent_id -> future of children`
pub struct FnProvider<F> {
    fetch: F,
}

#[async_trait]
impl<F> ChildProvider for FnProvider<F>
where
    F: Fn(&str) -> FetchFuture + Send + Sync,
{
    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<Node>, ProviderError> {
        (self.fetch)(parent_id).await
    }
}

/// Wrap a closure as a provider
pub fn from_fn<F>(fetch: F) -> FnProvider<F>
where
    F: Fn(&str) -> FetchFuture + Send + Sync,
{
    FnProvider { fetch }
}
