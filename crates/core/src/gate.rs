//! Access decisions for entering a block.
//!
//! The gate is a handful of pure steps; whoever drives it performs the
//! network calls and the confirmation dialog in between.

use crate::model::{Block, BlockId, Price, PurchaseRequest, UserId};

/// Result of a non-interactive access check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Access {
    Accessible,
    RequiresPurchase { price: Price },
    Denied,
}

/// Why the gate refused to run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    IdentityMissing,
}

/// The next thing the driver of the gate must do.
#[derive(Debug, Clone, PartialEq)]
pub enum GateStep {
    /// Enter the block.
    Grant,
    /// Ask the backend whether the viewer already owns the block.
    CheckPurchase { user_id: UserId, block_id: BlockId },
    /// Ask the viewer to confirm buying the block.
    Confirm { prompt: String },
    /// Issue the purchase, then enter without re-verifying it.
    Purchase(PurchaseRequest),
    /// The viewer declined; stay on the catalog.
    Deny,
    /// Stop before any network call.
    Refuse(Refusal),
}

/// Gate run for one block and one (possibly unknown) viewer.
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    block: &'a Block,
    user: Option<UserId>,
}

impl<'a> Gate<'a> {
    #[must_use]
    pub fn new(block: &'a Block, user: Option<UserId>) -> Self {
        Self { block, user }
    }

    /// First step. Free blocks pass even without a viewer identity.
    #[must_use]
    pub fn begin(&self) -> GateStep {
        if !self.block.is_paid() {
            return GateStep::Grant;
        }
        let Some(user_id) = self.user else {
            return GateStep::Refuse(Refusal::IdentityMissing);
        };
        match self.block.accessible() {
            Some(true) => GateStep::Grant,
            Some(false) => self.confirm(),
            None => GateStep::CheckPurchase {
                user_id,
                block_id: self.block.id(),
            },
        }
    }

    #[must_use]
    pub fn on_purchase_status(&self, purchased: bool) -> GateStep {
        if purchased { GateStep::Grant } else { self.confirm() }
    }

    #[must_use]
    pub fn on_confirmation(&self, accepted: bool) -> GateStep {
        match (accepted, self.user) {
            (true, Some(user_id)) => {
                GateStep::Purchase(PurchaseRequest::block(user_id, self.block.id()))
            }
            (true, None) => GateStep::Refuse(Refusal::IdentityMissing),
            (false, _) => GateStep::Deny,
        }
    }

    /// Map a step to the non-interactive access answer, if it is one.
    #[must_use]
    pub fn access_for(&self, step: &GateStep) -> Option<Access> {
        match step {
            GateStep::Grant | GateStep::Purchase(_) => Some(Access::Accessible),
            GateStep::Confirm { .. } => Some(Access::RequiresPurchase {
                price: self.block.price(),
            }),
            GateStep::Deny => Some(Access::Denied),
            GateStep::CheckPurchase { .. } | GateStep::Refuse(_) => None,
        }
    }

    fn confirm(&self) -> GateStep {
        GateStep::Confirm {
            prompt: confirmation_prompt(self.block),
        }
    }
}

#[must_use]
pub fn confirmation_prompt(block: &Block) -> String {
    format!("Buy \"{}\" for {} ₽?", block.name(), block.price())
}
