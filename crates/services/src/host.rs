use async_trait::async_trait;
use outloud_core::ViewerSession;

/// What the surrounding surface provides to the controller.
///
/// Futures are not required to be `Send`: dialogs live on the UI thread.
#[async_trait(?Send)]
pub trait Host {
    /// Ask a yes/no question. Dismissing the dialog counts as "no".
    async fn confirm(&self, prompt: &str) -> bool;

    /// Show a non-blocking notice.
    fn alert(&self, message: &str);

    /// Called after every transition so the surface can redraw early.
    fn session_changed(&self, _session: &ViewerSession) {}
}
