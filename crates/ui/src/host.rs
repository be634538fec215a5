use std::sync::Arc;

use async_trait::async_trait;
use dioxus::prelude::*;
use outloud_core::model::Viewer;
use outloud_core::{Event, ViewerSession};
use services::{Backend, Host, ViewerController};
use tokio::sync::oneshot;
use tracing::debug;

/// A confirmation waiting for the viewer's answer.
pub struct PendingConfirm {
    pub prompt: String,
    reply: oneshot::Sender<bool>,
}

/// Bridges the controller to the page: dialogs, notices and redraws all go
/// through signals.
#[derive(Clone, Copy, PartialEq)]
pub struct DialogHost {
    pending: Signal<Option<PendingConfirm>>,
    notice: Signal<Option<String>>,
    snapshot: Signal<ViewerSession>,
}

impl DialogHost {
    #[must_use]
    pub fn new(
        pending: Signal<Option<PendingConfirm>>,
        notice: Signal<Option<String>>,
        snapshot: Signal<ViewerSession>,
    ) -> Self {
        Self {
            pending,
            notice,
            snapshot,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        self.pending.read().as_ref().map(|pending| pending.prompt.clone())
    }

    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.notice.read().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Signal<ViewerSession> {
        self.snapshot
    }

    /// Resolve the open confirmation, if any.
    pub fn answer(&self, accepted: bool) {
        let mut pending = self.pending;
        let taken = pending.write().take();
        if let Some(confirm) = taken {
            // The gate may have been dropped meanwhile; nothing to resolve then.
            let _ = confirm.reply.send(accepted);
        }
    }

    pub fn dismiss_notice(&self) {
        let mut notice = self.notice;
        notice.set(None);
    }
}

#[async_trait(?Send)]
impl Host for DialogHost {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        let mut pending = self.pending;
        pending.set(Some(PendingConfirm {
            prompt: prompt.to_owned(),
            reply,
        }));
        answer.await.unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        let mut notice = self.notice;
        notice.set(Some(message.to_owned()));
    }

    fn session_changed(&self, session: &ViewerSession) {
        let mut snapshot = self.snapshot;
        snapshot.set(session.clone());
    }
}

/// Cheap handle the views use to feed events into the controller.
#[derive(Clone, Copy)]
pub struct ViewerHandle {
    events: Coroutine<Event>,
    host: DialogHost,
}

// Every handle owns its own dialog signals.
impl PartialEq for ViewerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
    }
}

impl ViewerHandle {
    #[must_use]
    pub fn new(events: Coroutine<Event>, host: DialogHost) -> Self {
        Self { events, host }
    }

    #[must_use]
    pub fn host(&self) -> DialogHost {
        self.host
    }

    /// Queue `event` for the controller. Events are applied in the order they
    /// are queued, even while earlier requests are still pending.
    pub fn dispatch(&self, event: Event) {
        self.events.send(event);
    }
}

/// Start the task that owns the controller and return a handle to it.
pub fn use_viewer(backend: Arc<dyn Backend>, viewer: Option<Viewer>) -> ViewerHandle {
    let pending = use_signal(|| None::<PendingConfirm>);
    let notice = use_signal(|| None::<String>);
    let snapshot = {
        let viewer = viewer.clone();
        use_signal(move || ViewerSession::new(viewer))
    };
    let host = DialogHost::new(pending, notice, snapshot);
    let events = use_coroutine(move |inbox: UnboundedReceiver<Event>| {
        let mut controller = ViewerController::new(Arc::clone(&backend), viewer.clone());
        async move {
            controller.run(inbox, &host).await;
            debug!("viewer inbox closed");
        }
    });
    use_hook(|| {
        let handle = ViewerHandle::new(events, host);
        handle.dispatch(Event::Started);
        handle
    })
}
