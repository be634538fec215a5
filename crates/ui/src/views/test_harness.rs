use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use outloud_core::Event;
use outloud_core::model::{
    Block, BlockId, Price, PurchaseRequest, Question, QuestionId, ThemeConfig, UserId, Viewer,
};
use services::{Backend, BackendError, InMemoryBackend};

use crate::host::{ViewerHandle, use_viewer};
use crate::views::ViewerPage;

/// The in-memory backend, except that the theme request never answers.
pub struct StalledTheme(pub InMemoryBackend);

#[async_trait]
impl Backend for StalledTheme {
    async fn theme(&self) -> Result<ThemeConfig, BackendError> {
        std::future::pending().await
    }

    async fn blocks(&self, user_id: Option<UserId>) -> Result<Vec<Block>, BackendError> {
        self.0.blocks(user_id).await
    }

    async fn bundle_price(&self) -> Result<Price, BackendError> {
        self.0.bundle_price().await
    }

    async fn questions(&self, block_id: BlockId) -> Result<Vec<Question>, BackendError> {
        self.0.questions(block_id).await
    }

    async fn check_purchase(
        &self,
        user_id: UserId,
        block_id: BlockId,
    ) -> Result<bool, BackendError> {
        self.0.check_purchase(user_id, block_id).await
    }

    async fn purchase(&self, request: &PurchaseRequest) -> Result<bool, BackendError> {
        self.0.purchase(request).await
    }

    async fn log_view(&self, user_id: UserId, question_id: QuestionId) -> Result<(), BackendError> {
        self.0.log_view(user_id, question_id).await
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    backend: Arc<dyn Backend>,
    viewer: Option<Viewer>,
    handle: Rc<Cell<Option<ViewerHandle>>>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewerHarness(props: ViewHarnessProps) -> Element {
    let handle = use_viewer(Arc::clone(&props.backend), props.viewer.clone());
    props.handle.set(Some(handle));
    rsx! { ViewerPage { handle } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: InMemoryBackend,
    handle: Rc<Cell<Option<ViewerHandle>>>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Queue an event as if the page had raised it.
    pub fn dispatch(&self, event: Event) {
        let handle = self.handle.get().expect("rebuild before dispatching");
        self.dom.in_runtime(|| handle.dispatch(event));
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until pending tasks and redraws have settled.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(backend: InMemoryBackend, viewer: Option<Viewer>) -> ViewHarness {
    let inspect = backend.clone();
    setup_view_harness_with(Arc::new(backend), inspect, viewer)
}

/// Like `setup_view_harness`, serving through `backend` while `inspect`
/// records the calls.
pub fn setup_view_harness_with(
    backend: Arc<dyn Backend>,
    inspect: InMemoryBackend,
    viewer: Option<Viewer>,
) -> ViewHarness {
    let handle = Rc::new(Cell::new(None));
    let dom = VirtualDom::new_with_props(
        ViewerHarness,
        ViewHarnessProps {
            backend,
            viewer,
            handle: Rc::clone(&handle),
        },
    );
    ViewHarness {
        dom,
        backend: inspect,
        handle,
    }
}

/// Render a single component once, without any backend.
pub fn render_once<P: Clone + 'static>(component: fn(P) -> Element, props: P) -> String {
    let mut dom = VirtualDom::new_with_props(component, props);
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}
