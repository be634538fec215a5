use std::sync::Arc;

use outloud_core::model::{Block, BlockId, Price, Question, ThemeConfig, UserId};
use tracing::debug;

use crate::backend::Backend;
use crate::error::BackendError;

/// Read-only fetches: theme, catalog, bundle price and question lists.
#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn Backend>,
}

impl CatalogService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Returns `BackendError` if the theme could not be fetched.
    pub async fn theme(&self) -> Result<ThemeConfig, BackendError> {
        self.backend.theme().await
    }

    /// Blocks in backend order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the catalog could not be fetched.
    pub async fn blocks(&self, user_id: Option<UserId>) -> Result<Vec<Block>, BackendError> {
        let blocks = self.backend.blocks(user_id).await?;
        debug!(count = blocks.len(), "catalog loaded");
        Ok(blocks)
    }

    /// # Errors
    ///
    /// Returns `BackendError` if the price could not be fetched.
    pub async fn bundle_price(&self) -> Result<Price, BackendError> {
        self.backend.bundle_price().await
    }

    /// # Errors
    ///
    /// Returns `BackendError` if the questions could not be fetched.
    pub async fn questions(&self, block_id: BlockId) -> Result<Vec<Question>, BackendError> {
        let questions = self.backend.questions(block_id).await?;
        debug!(%block_id, count = questions.len(), "questions loaded");
        Ok(questions)
    }
}
