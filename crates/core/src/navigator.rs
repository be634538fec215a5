//! Finite cursor over a block's questions.
//!
//! Out-of-range moves are no-ops: the cursor never leaves `[0, len)`.

use crate::model::{BlockId, Question};

/// Horizontal travel, in pixels, before a pointer drag counts as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Classify a horizontal drag (`end_x - start_x`); short drags are not swipes.
    #[must_use]
    pub fn classify(delta_x: f64) -> Option<Self> {
        if delta_x <= -SWIPE_THRESHOLD_PX {
            Some(Self::Left)
        } else if delta_x >= SWIPE_THRESHOLD_PX {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// Every navigation source funnels into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavInput {
    Next,
    Prev,
    Show(usize),
    Swipe(SwipeDirection),
    /// Full-surface tap; advances by one.
    Tap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionNavigator {
    block_id: BlockId,
    questions: Vec<Question>,
    current: usize,
}

impl QuestionNavigator {
    /// Fresh cursor at index 0. Nothing is shown until `start` or `show`.
    #[must_use]
    pub fn new(block_id: BlockId, questions: Vec<Question>) -> Self {
        Self {
            block_id,
            questions,
            current: 0,
        }
    }

    /// Show the first question, if any.
    pub fn start(&mut self) -> Option<&Question> {
        self.show(0)
    }

    /// Move to `index`. Returns the displayed question, or `None` when
    /// `index` is out of range and the cursor did not move.
    pub fn show(&mut self, index: usize) -> Option<&Question> {
        if index >= self.questions.len() {
            return None;
        }
        self.current = index;
        self.questions.get(index)
    }

    pub fn next(&mut self) -> Option<&Question> {
        self.show(self.current.saturating_add(1))
    }

    pub fn prev(&mut self) -> Option<&Question> {
        let index = self.current.checked_sub(1)?;
        self.show(index)
    }

    pub fn apply(&mut self, input: NavInput) -> Option<&Question> {
        match input {
            NavInput::Next | NavInput::Tap | NavInput::Swipe(SwipeDirection::Left) => self.next(),
            NavInput::Prev | NavInput::Swipe(SwipeDirection::Right) => self.prev(),
            NavInput::Show(index) => self.show(index),
        }
    }

    #[must_use]
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Backward control is enabled.
    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.current > 0 && !self.questions.is_empty()
    }

    /// Forward control is enabled.
    #[must_use]
    pub fn can_next(&self) -> bool {
        self.current.saturating_add(1) < self.questions.len()
    }

    /// "3 / 10"
    #[must_use]
    pub fn progress_label(&self) -> String {
        if self.questions.is_empty() {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.current + 1, self.questions.len())
    }
}
