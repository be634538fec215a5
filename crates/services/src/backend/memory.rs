use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use outloud_core::Request;
use outloud_core::model::{
    Block, BlockId, Price, PurchaseRequest, PurchaseTarget, Question, QuestionId, ThemeConfig,
    UserId,
};

use super::Backend;
use crate::error::BackendError;

/// One call observed by `InMemoryBackend`, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Theme,
    Blocks { user_id: Option<UserId> },
    BundlePrice,
    Questions(BlockId),
    CheckPurchase { user_id: UserId, block_id: BlockId },
    Purchase(PurchaseRequest),
    LogView { user_id: UserId, question_id: QuestionId },
}

#[derive(Debug, Default)]
struct State {
    theme: ThemeConfig,
    blocks: Vec<Block>,
    questions: HashMap<BlockId, Vec<Question>>,
    owned: HashSet<(UserId, BlockId)>,
    bundle_price: Price,
    reject_purchases: bool,
    reporting_access: bool,
    failing: HashSet<Request>,
    calls: Vec<BackendCall>,
}

/// Scriptable backend for tests and the offline demo. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Small catalog with one free and two paid blocks.
    #[must_use]
    pub fn demo() -> Self {
        let question = |id: u64, text: &str| Question::new(QuestionId::new(id), text);
        Self::new()
            .with_theme(ThemeConfig {
                background_color: Some("#FDF6E3".to_owned()),
                text_color: Some("#073642".to_owned()),
                font_family: None,
            })
            .with_block(
                Block::free(BlockId::new(1), "Warm-up"),
                vec![
                    question(101, "What did you learn this week?"),
                    question(102, "Which habit would you like to drop?"),
                    question(103, "Who made you laugh recently?"),
                ],
            )
            .with_block(
                Block::paid(BlockId::new(2), "Deeper talks", Price::new(149.0)),
                vec![
                    question(201, "What are you most afraid of losing?"),
                    question(202, "When did you last change your mind?"),
                ],
            )
            .with_block(
                Block::paid(BlockId::new(3), "Late night", Price::new(99.5)),
                vec![question(301, "What would you tell your younger self?")],
            )
            .with_bundle_price(Price::new(199.0))
    }

    #[must_use]
    pub fn with_theme(self, theme: ThemeConfig) -> Self {
        self.edit(|state| state.theme = theme);
        self
    }

    /// Append a block to the catalog together with its questions.
    #[must_use]
    pub fn with_block(self, block: Block, questions: Vec<Question>) -> Self {
        self.edit(|state| {
            state.questions.insert(block.id(), questions);
            state.blocks.push(block);
        });
        self
    }

    #[must_use]
    pub fn with_bundle_price(self, price: Price) -> Self {
        self.edit(|state| state.bundle_price = price);
        self
    }

    /// Mark `block_id` as already owned by `user_id`.
    #[must_use]
    pub fn with_purchase(self, user_id: UserId, block_id: BlockId) -> Self {
        self.edit(|state| {
            state.owned.insert((user_id, block_id));
        });
        self
    }

    /// Answer every purchase with a refusal.
    #[must_use]
    pub fn rejecting_purchases(self) -> Self {
        self.edit(|state| state.reject_purchases = true);
        self
    }

    /// Fail every call of the given kind.
    #[must_use]
    pub fn failing(self, request: Request) -> Self {
        self.edit(|state| {
            state.failing.insert(request);
        });
        self
    }

    /// Fill `Block::accessible` when the catalog is requested for a viewer.
    #[must_use]
    pub fn reporting_access(self) -> Self {
        self.edit(|state| state.reporting_access = true);
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().map(|state| state.calls.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn purchases(&self) -> Vec<PurchaseRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Purchase(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn view_logs(&self) -> Vec<QuestionId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::LogView { question_id, .. } => Some(question_id),
                _ => None,
            })
            .collect()
    }

    fn edit(&self, f: impl FnOnce(&mut State)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, BackendError> {
        self.state
            .lock()
            .map_err(|e| BackendError::Unavailable(e.to_string()))
    }

    /// Record the call, then fail it if its kind was scripted to fail.
    fn record(
        &self,
        call: BackendCall,
        request: Request,
    ) -> Result<MutexGuard<'_, State>, BackendError> {
        let mut state = self.lock()?;
        state.calls.push(call);
        if state.failing.contains(&request) {
            return Err(BackendError::Unavailable(format!("{request} is scripted to fail")));
        }
        Ok(state)
    }
}

impl State {
    fn owns(&self, user_id: UserId, block_id: BlockId) -> bool {
        self.owned.contains(&(user_id, block_id))
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn theme(&self) -> Result<ThemeConfig, BackendError> {
        let state = self.record(BackendCall::Theme, Request::Theme)?;
        Ok(state.theme.clone())
    }

    async fn blocks(&self, user_id: Option<UserId>) -> Result<Vec<Block>, BackendError> {
        let state = self.record(BackendCall::Blocks { user_id }, Request::Catalog)?;
        let blocks = match (state.reporting_access, user_id) {
            (true, Some(user_id)) => state
                .blocks
                .iter()
                .map(|block| {
                    let open = !block.is_paid() || state.owns(user_id, block.id());
                    block.clone().with_accessible(open)
                })
                .collect(),
            _ => state.blocks.clone(),
        };
        Ok(blocks)
    }

    async fn bundle_price(&self) -> Result<Price, BackendError> {
        let state = self.record(BackendCall::BundlePrice, Request::BundlePrice)?;
        Ok(state.bundle_price)
    }

    async fn questions(&self, block_id: BlockId) -> Result<Vec<Question>, BackendError> {
        let state = self.record(BackendCall::Questions(block_id), Request::Questions)?;
        Ok(state.questions.get(&block_id).cloned().unwrap_or_default())
    }

    async fn check_purchase(
        &self,
        user_id: UserId,
        block_id: BlockId,
    ) -> Result<bool, BackendError> {
        let state = self.record(
            BackendCall::CheckPurchase { user_id, block_id },
            Request::PurchaseCheck,
        )?;
        Ok(state.owns(user_id, block_id))
    }

    async fn purchase(&self, request: &PurchaseRequest) -> Result<bool, BackendError> {
        let mut state = self.record(BackendCall::Purchase(*request), Request::Purchase)?;
        if state.reject_purchases {
            return Ok(false);
        }
        let unlocked: Vec<BlockId> = match request.target {
            PurchaseTarget::Block(block_id) => vec![block_id],
            PurchaseTarget::AllBlocks => state.blocks.iter().map(Block::id).collect(),
        };
        for block_id in unlocked {
            state.owned.insert((request.user_id, block_id));
        }
        Ok(true)
    }

    async fn log_view(
        &self,
        user_id: UserId,
        question_id: QuestionId,
    ) -> Result<(), BackendError> {
        self.record(
            BackendCall::LogView {
                user_id,
                question_id,
            },
            Request::ViewLog,
        )?;
        Ok(())
    }
}
