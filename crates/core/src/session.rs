use crate::model::{Block, BlockId, Price, Question, Theme, UserId, Viewer};
use crate::navigator::QuestionNavigator;

/// Which surface the viewer is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Questions,
}

/// Everything the viewer's page knows, owned by a single controller.
///
/// Created at startup, changed only through `ViewerSession::handle`, and
/// dropped on reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerSession {
    pub(crate) viewer: Option<Viewer>,
    pub(crate) theme: Theme,
    pub(crate) catalog: Vec<Block>,
    pub(crate) catalog_loaded: bool,
    pub(crate) bundle_price: Option<Price>,
    pub(crate) entering: Option<BlockId>,
    pub(crate) navigator: Option<QuestionNavigator>,
}

impl ViewerSession {
    #[must_use]
    pub fn new(viewer: Option<Viewer>) -> Self {
        Self {
            viewer,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.viewer.as_ref().map(Viewer::id)
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn catalog(&self) -> &[Block] {
        &self.catalog
    }

    #[must_use]
    pub fn catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.catalog.iter().find(|block| block.id() == id)
    }

    #[must_use]
    pub fn bundle_price(&self) -> Option<Price> {
        self.bundle_price
    }

    /// Block currently passing through the gate or loading its questions.
    #[must_use]
    pub fn entering(&self) -> Option<BlockId> {
        self.entering
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        if self.navigator.is_some() {
            Screen::Questions
        } else {
            Screen::Catalog
        }
    }

    #[must_use]
    pub fn navigator(&self) -> Option<&QuestionNavigator> {
        self.navigator.as_ref()
    }

    #[must_use]
    pub fn current_block_id(&self) -> Option<BlockId> {
        self.navigator.as_ref().map(QuestionNavigator::block_id)
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.navigator
            .as_ref()
            .map(QuestionNavigator::current_index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.navigator
            .as_ref()
            .and_then(QuestionNavigator::current_question)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.navigator
            .as_ref()
            .map(QuestionNavigator::questions)
            .unwrap_or_default()
    }
}
