//! Pure event dispatcher over `ViewerSession`.
//!
//! `handle` never performs I/O. It returns the next session plus the effects
//! the caller must run; effect results come back as further events.

use std::fmt;

use crate::error::{Failure, Request};
use crate::model::{
    Block, BlockId, Price, PurchaseRequest, Question, QuestionId, ThemeConfig, Theme, UserId,
};
use crate::navigator::{NavInput, QuestionNavigator};
use crate::session::ViewerSession;

/// How the access gate finished for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Enter the block. `purchased` is true when a purchase was issued on the way.
    Entered { purchased: bool },
    /// The viewer declined the purchase.
    Denied,
    /// The backend answered the purchase with a refusal.
    PurchaseRejected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started,
    ThemeLoaded(ThemeConfig),
    ThemeFailed,
    CatalogLoaded(Vec<Block>),
    CatalogFailed(Failure),
    BundlePriceLoaded(Price),
    BlockSelected(BlockId),
    AccessResolved {
        block_id: BlockId,
        outcome: Result<EntryOutcome, Failure>,
    },
    QuestionsLoaded {
        block_id: BlockId,
        result: Result<Vec<Question>, Failure>,
    },
    Navigate(NavInput),
    BackToCatalog,
    BuyAllRequested,
    /// `Ok(false)` means the backend refused the purchase.
    PurchaseAllSettled(Result<bool, Failure>),
}

/// Non-blocking notices shown to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    IdentityMissing,
    RequestFailed(Request),
    EmptyBlock,
    PurchaseRejected,
    AllBlocksUnlocked,
}

impl Alert {
    #[must_use]
    pub fn from_failure(failure: &Failure) -> Self {
        match failure {
            Failure::Network { request, .. } => Alert::RequestFailed(*request),
            Failure::IdentityMissing => Alert::IdentityMissing,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::IdentityMissing => f.write_str("Could not identify the user"),
            Alert::RequestFailed(Request::Catalog) => f.write_str("Could not load blocks"),
            Alert::RequestFailed(Request::PurchaseCheck) => {
                f.write_str("Could not check the purchase")
            }
            Alert::RequestFailed(Request::Purchase) => f.write_str("Purchase failed"),
            Alert::RequestFailed(Request::Questions) => f.write_str("Could not load questions"),
            Alert::RequestFailed(other) => write!(f, "Could not load {other}"),
            Alert::EmptyBlock => f.write_str("This block has no questions yet"),
            Alert::PurchaseRejected => f.write_str("Purchase failed"),
            Alert::AllBlocksUnlocked => f.write_str("All blocks unlocked"),
        }
    }
}

/// Side effects requested by a transition, run by the caller in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchTheme,
    FetchCatalog,
    FetchBundlePrice,
    /// Run the access gate for `block`; answer with `Event::AccessResolved`.
    EnterBlock {
        block: Block,
        user_id: Option<UserId>,
    },
    FetchQuestions {
        block_id: BlockId,
    },
    /// Fire-and-forget; no event comes back.
    LogView {
        user_id: UserId,
        question_id: QuestionId,
    },
    PurchaseAll(PurchaseRequest),
    Alert(Alert),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub session: ViewerSession,
    pub effects: Vec<Effect>,
}

impl ViewerSession {
    /// Apply one event.
    #[must_use]
    pub fn handle(mut self, event: Event) -> Transition {
        let mut effects = Vec::new();

        match event {
            Event::Started => {
                effects.push(Effect::FetchTheme);
                effects.push(Effect::FetchCatalog);
                effects.push(Effect::FetchBundlePrice);
            }
            Event::ThemeLoaded(config) => {
                self.theme = Theme::resolve(&config);
            }
            // Defaults stay in place.
            Event::ThemeFailed => {}
            Event::CatalogLoaded(blocks) => {
                self.catalog = blocks;
                self.catalog_loaded = true;
            }
            Event::CatalogFailed(failure) => {
                effects.push(Effect::Alert(Alert::from_failure(&failure)));
            }
            Event::BundlePriceLoaded(price) => {
                self.bundle_price = Some(price);
            }
            Event::BlockSelected(block_id) => {
                self.select_block(block_id, &mut effects);
            }
            Event::AccessResolved { block_id, outcome } => {
                self.resolve_access(block_id, outcome, &mut effects);
            }
            Event::QuestionsLoaded { block_id, result } => {
                self.load_questions(block_id, result, &mut effects);
            }
            Event::Navigate(input) => {
                let user_id = self.user_id();
                if let Some(navigator) = self.navigator.as_mut() {
                    if let Some(question) = navigator.apply(input) {
                        push_view_log(&mut effects, user_id, question);
                    }
                }
            }
            Event::BackToCatalog => {
                self.navigator = None;
            }
            Event::BuyAllRequested => match self.user_id() {
                Some(user_id) => {
                    effects.push(Effect::PurchaseAll(PurchaseRequest::all_blocks(user_id)));
                }
                None => effects.push(Effect::Alert(Alert::IdentityMissing)),
            },
            Event::PurchaseAllSettled(result) => match result {
                Ok(true) => {
                    effects.push(Effect::Alert(Alert::AllBlocksUnlocked));
                    effects.push(Effect::FetchCatalog);
                }
                Ok(false) => effects.push(Effect::Alert(Alert::PurchaseRejected)),
                Err(failure) => effects.push(Effect::Alert(Alert::from_failure(&failure))),
            },
        }

        Transition {
            session: self,
            effects,
        }
    }

    fn select_block(&mut self, block_id: BlockId, effects: &mut Vec<Effect>) {
        if self.navigator.is_some() || self.entering.is_some() {
            return;
        }
        let Some(block) = self.block(block_id).cloned() else {
            return;
        };
        self.entering = Some(block_id);
        effects.push(Effect::EnterBlock {
            block,
            user_id: self.user_id(),
        });
    }

    fn resolve_access(
        &mut self,
        block_id: BlockId,
        outcome: Result<EntryOutcome, Failure>,
        effects: &mut Vec<Effect>,
    ) {
        if self.entering != Some(block_id) {
            return;
        }
        match outcome {
            Ok(EntryOutcome::Entered { purchased }) => {
                if purchased {
                    effects.push(Effect::FetchCatalog);
                }
                effects.push(Effect::FetchQuestions { block_id });
            }
            Ok(EntryOutcome::Denied) => {
                self.entering = None;
            }
            Ok(EntryOutcome::PurchaseRejected) => {
                self.entering = None;
                effects.push(Effect::Alert(Alert::PurchaseRejected));
            }
            Err(failure) => {
                self.entering = None;
                effects.push(Effect::Alert(Alert::from_failure(&failure)));
            }
        }
    }

    fn load_questions(
        &mut self,
        block_id: BlockId,
        result: Result<Vec<Question>, Failure>,
        effects: &mut Vec<Effect>,
    ) {
        if self.entering != Some(block_id) {
            return;
        }
        self.entering = None;

        let questions = match result {
            Ok(questions) => questions,
            Err(failure) => {
                effects.push(Effect::Alert(Alert::from_failure(&failure)));
                return;
            }
        };
        if questions.is_empty() {
            effects.push(Effect::Alert(Alert::EmptyBlock));
            return;
        }

        let user_id = self.user_id();
        let navigator = self
            .navigator
            .insert(QuestionNavigator::new(block_id, questions));
        if let Some(question) = navigator.start() {
            push_view_log(effects, user_id, question);
        }
    }
}

fn push_view_log(effects: &mut Vec<Effect>, user_id: Option<UserId>, question: &Question) {
    if let Some(user_id) = user_id {
        effects.push(Effect::LogView {
            user_id,
            question_id: question.id(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Viewer;
    use crate::navigator::SwipeDirection;
    use crate::session::Screen;

    const USER: u64 = 77;

    fn catalog() -> Vec<Block> {
        vec![
            Block::free(BlockId::new(1), "Intro"),
            Block::paid(BlockId::new(2), "Deep", Price::new(100.0)),
        ]
    }

    fn questions(ids: &[u64]) -> Vec<Question> {
        ids.iter()
            .map(|id| Question::new(QuestionId::new(*id), format!("Q{id}")))
            .collect()
    }

    fn loaded_session() -> ViewerSession {
        ViewerSession::new(Some(Viewer::new(UserId::new(USER))))
            .handle(Event::CatalogLoaded(catalog()))
            .session
    }

    fn enter(session: ViewerSession, block_id: u64, qs: &[u64]) -> Transition {
        let block_id = BlockId::new(block_id);
        let session = session.handle(Event::BlockSelected(block_id)).session;
        let session = session
            .handle(Event::AccessResolved {
                block_id,
                outcome: Ok(EntryOutcome::Entered { purchased: false }),
            })
            .session;
        session.handle(Event::QuestionsLoaded {
            block_id,
            result: Ok(questions(qs)),
        })
    }

    fn view_logs(effects: &[Effect]) -> Vec<QuestionId> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::LogView { question_id, .. } => Some(*question_id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_fetches_theme_catalog_and_bundle_price() {
        let transition = ViewerSession::new(None).handle(Event::Started);
        assert_eq!(
            transition.effects,
            vec![
                Effect::FetchTheme,
                Effect::FetchCatalog,
                Effect::FetchBundlePrice
            ]
        );
    }

    #[test]
    fn theme_failure_keeps_defaults() {
        let transition = ViewerSession::new(None).handle(Event::ThemeFailed);
        assert_eq!(transition.session.theme(), &Theme::default());
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn selecting_a_block_asks_the_gate() {
        let transition = loaded_session().handle(Event::BlockSelected(BlockId::new(2)));
        assert_eq!(transition.session.entering(), Some(BlockId::new(2)));
        assert_eq!(
            transition.effects,
            vec![Effect::EnterBlock {
                block: catalog()[1].clone(),
                user_id: Some(UserId::new(USER)),
            }]
        );
    }

    #[test]
    fn unknown_block_is_ignored() {
        let transition = loaded_session().handle(Event::BlockSelected(BlockId::new(9)));
        assert!(transition.effects.is_empty());
        assert_eq!(transition.session.entering(), None);
    }

    #[test]
    fn second_selection_while_gating_is_ignored() {
        let session = loaded_session()
            .handle(Event::BlockSelected(BlockId::new(2)))
            .session;
        let transition = session.handle(Event::BlockSelected(BlockId::new(1)));
        assert!(transition.effects.is_empty());
        assert_eq!(transition.session.entering(), Some(BlockId::new(2)));
    }

    #[test]
    fn purchase_on_entry_refreshes_catalog_then_fetches_questions() {
        let session = loaded_session()
            .handle(Event::BlockSelected(BlockId::new(2)))
            .session;
        let transition = session.handle(Event::AccessResolved {
            block_id: BlockId::new(2),
            outcome: Ok(EntryOutcome::Entered { purchased: true }),
        });
        assert_eq!(
            transition.effects,
            vec![
                Effect::FetchCatalog,
                Effect::FetchQuestions {
                    block_id: BlockId::new(2)
                }
            ]
        );
    }

    #[test]
    fn denied_entry_stays_on_catalog() {
        let session = loaded_session()
            .handle(Event::BlockSelected(BlockId::new(2)))
            .session;
        let transition = session.handle(Event::AccessResolved {
            block_id: BlockId::new(2),
            outcome: Ok(EntryOutcome::Denied),
        });
        assert!(transition.effects.is_empty());
        assert_eq!(transition.session.entering(), None);
        assert_eq!(transition.session.screen(), Screen::Catalog);
    }

    #[test]
    fn gate_failure_surfaces_alert() {
        let session = loaded_session()
            .handle(Event::BlockSelected(BlockId::new(2)))
            .session;
        let transition = session.handle(Event::AccessResolved {
            block_id: BlockId::new(2),
            outcome: Err(Failure::network(Request::PurchaseCheck, "timeout")),
        });
        assert_eq!(
            transition.effects,
            vec![Effect::Alert(Alert::RequestFailed(Request::PurchaseCheck))]
        );
        assert_eq!(transition.session.entering(), None);
    }

    #[test]
    fn entering_shows_first_question_and_logs_it() {
        let transition = enter(loaded_session(), 1, &[10, 11]);
        let session = &transition.session;
        assert_eq!(session.screen(), Screen::Questions);
        assert_eq!(session.current_block_id(), Some(BlockId::new(1)));
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(view_logs(&transition.effects), vec![QuestionId::new(10)]);
    }

    #[test]
    fn empty_block_alerts_and_stays_on_catalog() {
        let transition = enter(loaded_session(), 1, &[]);
        assert_eq!(transition.session.screen(), Screen::Catalog);
        assert_eq!(transition.effects, vec![Effect::Alert(Alert::EmptyBlock)]);
    }

    #[test]
    fn stale_questions_are_dropped() {
        let transition = loaded_session().handle(Event::QuestionsLoaded {
            block_id: BlockId::new(1),
            result: Ok(questions(&[10])),
        });
        assert_eq!(transition.session.screen(), Screen::Catalog);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn next_twice_on_single_question_logs_once_in_total() {
        let entered = enter(loaded_session(), 1, &[10]);
        let mut logs = view_logs(&entered.effects);
        let mut session = entered.session;
        for _ in 0..2 {
            let transition = session.handle(Event::Navigate(NavInput::Next));
            logs.extend(view_logs(&transition.effects));
            session = transition.session;
        }
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(logs, vec![QuestionId::new(10)]);
    }

    #[test]
    fn every_navigation_source_logs_the_shown_question() {
        let mut session = enter(loaded_session(), 1, &[10, 11, 12]).session;
        let steps = [
            (NavInput::Tap, Some(11)),
            (NavInput::Swipe(SwipeDirection::Left), Some(12)),
            (NavInput::Swipe(SwipeDirection::Left), None),
            (NavInput::Swipe(SwipeDirection::Right), Some(11)),
            (NavInput::Prev, Some(10)),
            (NavInput::Prev, None),
            (NavInput::Show(2), Some(12)),
        ];
        for (input, expected) in steps {
            let transition = session.handle(Event::Navigate(input));
            let expected: Vec<_> = expected.map(QuestionId::new).into_iter().collect();
            assert_eq!(view_logs(&transition.effects), expected, "{input:?}");
            session = transition.session;
        }
    }

    #[test]
    fn navigation_without_identity_skips_view_logs() {
        let session = ViewerSession::new(None)
            .handle(Event::CatalogLoaded(catalog()))
            .session;
        let transition = enter(session, 1, &[10, 11]);
        assert_eq!(transition.session.current_index(), Some(0));
        assert!(view_logs(&transition.effects).is_empty());
    }

    #[test]
    fn back_to_catalog_discards_questions() {
        let session = enter(loaded_session(), 1, &[10, 11]).session;
        let session = session.handle(Event::BackToCatalog).session;
        assert_eq!(session.screen(), Screen::Catalog);
        assert!(session.questions().is_empty());
        assert_eq!(session.current_index(), None);
    }

    #[test]
    fn reentry_resets_the_cursor() {
        let session = enter(loaded_session(), 1, &[10, 11]).session;
        let session = session.handle(Event::Navigate(NavInput::Next)).session;
        assert_eq!(session.current_index(), Some(1));
        let session = session.handle(Event::BackToCatalog).session;
        let session = enter(session, 1, &[10, 11]).session;
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn buy_all_issues_one_request_without_block() {
        let transition = loaded_session().handle(Event::BuyAllRequested);
        assert_eq!(
            transition.effects,
            vec![Effect::PurchaseAll(PurchaseRequest::all_blocks(
                UserId::new(USER)
            ))]
        );
    }

    #[test]
    fn buy_all_without_identity_alerts() {
        let transition = ViewerSession::new(None).handle(Event::BuyAllRequested);
        assert_eq!(
            transition.effects,
            vec![Effect::Alert(Alert::IdentityMissing)]
        );
    }

    #[test]
    fn settled_buy_all_refreshes_catalog() {
        let transition = loaded_session().handle(Event::PurchaseAllSettled(Ok(true)));
        assert_eq!(
            transition.effects,
            vec![
                Effect::Alert(Alert::AllBlocksUnlocked),
                Effect::FetchCatalog
            ]
        );
    }

    #[test]
    fn alert_messages() {
        assert_eq!(Alert::EmptyBlock.to_string(), "This block has no questions yet");
        assert_eq!(
            Alert::RequestFailed(Request::Catalog).to_string(),
            "Could not load blocks"
        );
        assert_eq!(
            Alert::RequestFailed(Request::Theme).to_string(),
            "Could not load theme"
        );
    }
}
