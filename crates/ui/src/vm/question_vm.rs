use outloud_core::ViewerSession;

/// What the question card shows for the current cursor position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub block_name: String,
    pub text: String,
    pub progress: String,
    pub can_prev: bool,
    pub can_next: bool,
}

/// `None` unless the viewer is inside a non-empty block.
#[must_use]
pub fn map_question(session: &ViewerSession) -> Option<QuestionVm> {
    let navigator = session.navigator()?;
    let question = navigator.current_question()?;
    let block_name = session
        .block(navigator.block_id())
        .map(|block| block.name().to_owned())
        .unwrap_or_default();
    Some(QuestionVm {
        block_name,
        text: question.text().to_owned(),
        progress: navigator.progress_label(),
        can_prev: navigator.can_prev(),
        can_next: navigator.can_next(),
    })
}
