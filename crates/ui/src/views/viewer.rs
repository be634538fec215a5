use dioxus::prelude::*;
use outloud_core::{Event, Screen};

use crate::context::AppContext;
use crate::host::{ViewerHandle, use_viewer};
use crate::views::{CatalogView, ConfirmDialog, NoticeBanner, QuestionView};
use crate::vm::{map_catalog, map_question};

/// The whole viewer page, wired to the app's backend and viewer.
#[component]
pub fn ViewerView() -> Element {
    let ctx = use_context::<AppContext>();
    let handle = use_viewer(ctx.backend(), ctx.viewer());
    rsx! { ViewerPage { handle } }
}

/// Renders the controller's latest session and routes input back to it.
#[component]
pub fn ViewerPage(handle: ViewerHandle) -> Element {
    let host = handle.host();
    let snapshot = host.snapshot();

    let session = snapshot.read();
    let css = session.theme().css();
    let question = map_question(&session);
    let catalog = map_catalog(&session);
    let screen = session.screen();
    drop(session);

    rsx! {
        div { class: "viewer", style: "{css}",
            if let Some(message) = host.notice() {
                NoticeBanner { message, on_dismiss: move |_| host.dismiss_notice() }
            }

            match (screen, question) {
                (Screen::Questions, Some(vm)) => rsx! {
                    QuestionView {
                        vm,
                        on_navigate: move |input| handle.dispatch(Event::Navigate(input)),
                        on_back: move |_| handle.dispatch(Event::BackToCatalog),
                    }
                },
                _ => rsx! {
                    CatalogView {
                        vm: catalog,
                        on_select: move |block_id| handle.dispatch(Event::BlockSelected(block_id)),
                        on_buy_all: move |_| handle.dispatch(Event::BuyAllRequested),
                    }
                },
            }

            if let Some(prompt) = host.prompt() {
                ConfirmDialog { prompt, on_answer: move |accepted| host.answer(accepted) }
            }
        }
    }
}
