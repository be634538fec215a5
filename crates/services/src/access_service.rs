use std::sync::Arc;

use outloud_core::gate::{Access, Gate, GateStep, Refusal};
use outloud_core::model::{Block, BlockId, UserId};
use outloud_core::{EntryOutcome, Request};
use tracing::debug;

use crate::backend::Backend;
use crate::error::GateError;
use crate::host::Host;
use crate::purchase_service::PurchaseService;

/// Drives the access gate against the backend and the host dialog.
#[derive(Clone)]
pub struct AccessGateService {
    backend: Arc<dyn Backend>,
    purchases: PurchaseService,
}

impl AccessGateService {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            purchases: PurchaseService::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Decide access without asking the viewer anything.
    ///
    /// # Errors
    ///
    /// Returns `GateError::IdentityMissing` for a paid block without a viewer
    /// and `GateError::Backend` if the purchase check fails.
    pub async fn check_access(
        &self,
        block: &Block,
        user_id: Option<UserId>,
    ) -> Result<Access, GateError> {
        let gate = Gate::new(block, user_id);
        let mut step = gate.begin();
        loop {
            if let Some(access) = gate.access_for(&step) {
                return Ok(access);
            }
            step = match step {
                GateStep::CheckPurchase { user_id, block_id } => {
                    let purchased = self.purchased(user_id, block_id).await?;
                    gate.on_purchase_status(purchased)
                }
                GateStep::Refuse(Refusal::IdentityMissing) => {
                    return Err(GateError::IdentityMissing);
                }
                other => return Ok(gate.access_for(&other).unwrap_or(Access::Denied)),
            };
        }
    }

    /// Run the whole entry flow, including the purchase confirmation.
    ///
    /// # Errors
    ///
    /// Returns `GateError::IdentityMissing` before any network call when a
    /// paid block has no viewer, and `GateError::Backend` when the purchase
    /// check or the purchase itself fails.
    pub async fn enter(
        &self,
        block: &Block,
        user_id: Option<UserId>,
        host: &dyn Host,
    ) -> Result<EntryOutcome, GateError> {
        let gate = Gate::new(block, user_id);
        let mut step = gate.begin();
        loop {
            debug!(block_id = %block.id(), ?step, "gate step");
            step = match step {
                GateStep::Grant => return Ok(EntryOutcome::Entered { purchased: false }),
                GateStep::CheckPurchase { user_id, block_id } => {
                    let purchased = self.purchased(user_id, block_id).await?;
                    gate.on_purchase_status(purchased)
                }
                GateStep::Confirm { prompt } => gate.on_confirmation(host.confirm(&prompt).await),
                GateStep::Purchase(request) => {
                    let accepted = self.purchases.purchase(&request).await.map_err(|source| {
                        GateError::Backend {
                            request: Request::Purchase,
                            source,
                        }
                    })?;
                    return Ok(if accepted {
                        EntryOutcome::Entered { purchased: true }
                    } else {
                        EntryOutcome::PurchaseRejected
                    });
                }
                GateStep::Deny => return Ok(EntryOutcome::Denied),
                GateStep::Refuse(Refusal::IdentityMissing) => {
                    return Err(GateError::IdentityMissing);
                }
            };
        }
    }

    async fn purchased(
        &self,
        user_id: UserId,
        block_id: BlockId,
    ) -> Result<bool, GateError> {
        self.backend
            .check_purchase(user_id, block_id)
            .await
            .map_err(|source| GateError::Backend {
                request: Request::PurchaseCheck,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use async_trait::async_trait;
    use outloud_core::model::{Price, PurchaseRequest};

    use super::*;
    use crate::backend::{BackendCall, InMemoryBackend};

    struct Answer {
        accept: bool,
        prompts: RefCell<Vec<String>>,
    }

    impl Answer {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Host for Answer {
        async fn confirm(&self, prompt: &str) -> bool {
            self.prompts.borrow_mut().push(prompt.to_owned());
            self.accept
        }

        fn alert(&self, _message: &str) {}
    }

    fn user() -> Option<UserId> {
        Some(UserId::new(9))
    }

    fn paid() -> Block {
        Block::paid(BlockId::new(2), "Deep", Price::new(100.0))
    }

    fn service(backend: &InMemoryBackend) -> AccessGateService {
        AccessGateService::new(Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn free_block_needs_no_backend_call() {
        let backend = InMemoryBackend::new();
        let block = Block::free(BlockId::new(1), "Intro");

        let access = service(&backend).check_access(&block, None).await.unwrap();

        assert_eq!(access, Access::Accessible);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn unpurchased_block_requires_purchase() {
        let backend = InMemoryBackend::new();

        let access = service(&backend).check_access(&paid(), user()).await.unwrap();

        assert_eq!(
            access,
            Access::RequiresPurchase {
                price: Price::new(100.0)
            }
        );
    }

    #[tokio::test]
    async fn owned_block_enters_without_purchase() {
        let backend = InMemoryBackend::new().with_purchase(UserId::new(9), BlockId::new(2));
        let host = Answer::new(true);

        let outcome = service(&backend).enter(&paid(), user(), &host).await.unwrap();

        assert_eq!(outcome, EntryOutcome::Entered { purchased: false });
        assert!(backend.purchases().is_empty());
        assert!(host.prompts.borrow().is_empty());
    }

    #[tokio::test]
    async fn declined_confirmation_purchases_nothing() {
        let backend = InMemoryBackend::new();
        let host = Answer::new(false);

        let outcome = service(&backend).enter(&paid(), user(), &host).await.unwrap();

        assert_eq!(outcome, EntryOutcome::Denied);
        assert!(backend.purchases().is_empty());
        assert_eq!(host.prompts.borrow().as_slice(), ["Buy \"Deep\" for 100 ₽?"]);
    }

    #[tokio::test]
    async fn accepted_confirmation_purchases_once() {
        let backend = InMemoryBackend::new();
        let host = Answer::new(true);

        let outcome = service(&backend).enter(&paid(), user(), &host).await.unwrap();

        assert_eq!(outcome, EntryOutcome::Entered { purchased: true });
        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::CheckPurchase {
                    user_id: UserId::new(9),
                    block_id: BlockId::new(2)
                },
                BackendCall::Purchase(PurchaseRequest::block(UserId::new(9), BlockId::new(2))),
            ]
        );
    }

    #[tokio::test]
    async fn backend_reported_access_skips_the_check() {
        let backend = InMemoryBackend::new();
        let host = Answer::new(false);
        let open = paid().with_accessible(true);
        let locked = paid().with_accessible(false);

        let gate = service(&backend);
        assert_eq!(
            gate.enter(&open, user(), &host).await.unwrap(),
            EntryOutcome::Entered { purchased: false }
        );
        assert_eq!(
            gate.enter(&locked, user(), &host).await.unwrap(),
            EntryOutcome::Denied
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_identity_makes_no_calls() {
        let backend = InMemoryBackend::new();
        let host = Answer::new(true);

        let err = service(&backend).enter(&paid(), None, &host).await.unwrap_err();

        assert!(matches!(err, GateError::IdentityMissing));
        assert!(backend.calls().is_empty());
        assert!(host.prompts.borrow().is_empty());
    }

    #[tokio::test]
    async fn failed_check_reports_the_request() {
        let backend = InMemoryBackend::new().failing(Request::PurchaseCheck);
        let host = Answer::new(true);

        let err = service(&backend).enter(&paid(), user(), &host).await.unwrap_err();

        assert!(matches!(
            err,
            GateError::Backend {
                request: Request::PurchaseCheck,
                ..
            }
        ));
        assert!(backend.purchases().is_empty());
    }
}
