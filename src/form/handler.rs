use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::LinkError;
use crate::models::{CreatedLink, LinkRequest};

/// Performs the create-short-link operation for a [`LinkForm`](super::LinkForm).
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn create_link(&self, request: &LinkRequest) -> Result<CreatedLink, LinkError>;
}

#[async_trait]
impl<T: SubmitHandler + ?Sized> SubmitHandler for Arc<T> {
    async fn create_link(&self, request: &LinkRequest) -> Result<CreatedLink, LinkError> {
        (**self).create_link(request).await
    }
}
