use std::sync::Arc;

use outloud_core::model::Viewer;
use services::Backend;

pub trait UiApp: Send + Sync {
    fn backend(&self) -> Arc<dyn Backend>;
    fn viewer(&self) -> Option<Viewer>;
}

#[derive(Clone)]
pub struct AppContext {
    backend: Arc<dyn Backend>,
    viewer: Option<Viewer>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            backend: app.backend(),
            viewer: app.viewer(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn viewer(&self) -> Option<Viewer> {
        self.viewer.clone()
    }
}

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
