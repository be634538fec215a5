use std::sync::Arc;

use outloud_core::model::{BlockId, PurchaseRequest, PurchaseTarget, UserId};
use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::BackendError;

/// Issues purchase requests. Purchases are not re-verified afterwards.
#[derive(Clone)]
pub struct PurchaseService {
    backend: Arc<dyn Backend>,
}

impl PurchaseService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// # Errors
    ///
    /// Returns `BackendError` if the request could not be delivered.
    pub async fn purchase_block(
        &self,
        user_id: UserId,
        block_id: BlockId,
    ) -> Result<bool, BackendError> {
        self.purchase(&PurchaseRequest::block(user_id, block_id))
            .await
    }

    /// Unlock every block with a single request carrying no block id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request could not be delivered.
    pub async fn purchase_all(&self, user_id: UserId) -> Result<bool, BackendError> {
        self.purchase(&PurchaseRequest::all_blocks(user_id)).await
    }

    /// Submit `request`. `Ok(false)` means the backend refused it.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request could not be delivered.
    pub async fn purchase(&self, request: &PurchaseRequest) -> Result<bool, BackendError> {
        let target = match request.target {
            PurchaseTarget::Block(block_id) => block_id.to_string(),
            PurchaseTarget::AllBlocks => "all".to_owned(),
        };
        let accepted = self.backend.purchase(request).await?;
        if accepted {
            info!(user_id = %request.user_id, target, "purchase accepted");
        } else {
            warn!(user_id = %request.user_id, target, "purchase refused by backend");
        }
        Ok(accepted)
    }
}
