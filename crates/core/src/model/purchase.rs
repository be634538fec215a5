use crate::model::ids::{BlockId, UserId};

/// What a purchase unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseTarget {
    Block(BlockId),
    AllBlocks,
}

/// A fire-and-forget request to mark content as purchased for a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PurchaseRequest {
    pub user_id: UserId,
    pub target: PurchaseTarget,
}

impl PurchaseRequest {
    #[must_use]
    pub fn block(user_id: UserId, block_id: BlockId) -> Self {
        Self {
            user_id,
            target: PurchaseTarget::Block(block_id),
        }
    }

    #[must_use]
    pub fn all_blocks(user_id: UserId) -> Self {
        Self {
            user_id,
            target: PurchaseTarget::AllBlocks,
        }
    }

    /// Block id carried on the wire; `None` means every block.
    #[must_use]
    pub fn block_id(&self) -> Option<BlockId> {
        match self.target {
            PurchaseTarget::Block(id) => Some(id),
            PurchaseTarget::AllBlocks => None,
        }
    }
}
