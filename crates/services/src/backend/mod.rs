mod http;
mod memory;

use async_trait::async_trait;
use outloud_core::model::{
    Block, BlockId, Price, PurchaseRequest, Question, QuestionId, ThemeConfig, UserId,
};

use crate::error::BackendError;

pub use http::HttpBackend;
pub use memory::{BackendCall, InMemoryBackend};

/// The HTTP/JSON surface the viewer consumes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the display configuration.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn theme(&self) -> Result<ThemeConfig, BackendError>;

    /// Fetch the ordered block catalog, optionally scoped to a viewer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn blocks(&self, user_id: Option<UserId>) -> Result<Vec<Block>, BackendError>;

    /// Fetch the price of the "all blocks" bundle.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn bundle_price(&self) -> Result<Price, BackendError>;

    /// Fetch the ordered questions of a block.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn questions(&self, block_id: BlockId) -> Result<Vec<Question>, BackendError>;

    /// Whether the viewer already owns the block.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn check_purchase(&self, user_id: UserId, block_id: BlockId)
    -> Result<bool, BackendError>;

    /// Submit a purchase. `Ok(false)` means the backend answered with a refusal.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn purchase(&self, request: &PurchaseRequest) -> Result<bool, BackendError>;

    /// Record that the viewer saw a question.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    async fn log_view(&self, user_id: UserId, question_id: QuestionId)
    -> Result<(), BackendError>;
}
