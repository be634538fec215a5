use dioxus::prelude::*;
use outloud_core::{NavInput, SwipeDirection};

use crate::vm::QuestionVm;

/// Question card. A short press advances; a horizontal drag of at least
/// `SWIPE_THRESHOLD_PX` swipes.
#[component]
pub fn QuestionView(
    vm: QuestionVm,
    on_navigate: EventHandler<NavInput>,
    on_back: EventHandler<()>,
) -> Element {
    let mut drag_start = use_signal(|| None::<f64>);

    rsx! {
        div {
            class: "page questions",
            tabindex: 0,
            onkeydown: move |evt: KeyboardEvent| match evt.key() {
                Key::ArrowRight => on_navigate.call(NavInput::Next),
                Key::ArrowLeft => on_navigate.call(NavInput::Prev),
                Key::Escape => on_back.call(()),
                _ => {}
            },

            header { class: "question-header",
                button {
                    id: "back",
                    class: "btn link",
                    onclick: move |_| on_back.call(()),
                    "← Blocks"
                }
                h2 { "{vm.block_name}" }
                span { class: "progress", "{vm.progress}" }
            }

            div {
                class: "question-card",
                onpointerdown: move |evt: PointerEvent| {
                    drag_start.set(Some(evt.client_coordinates().x));
                },
                onpointerup: move |evt: PointerEvent| {
                    let start = drag_start.write().take();
                    let Some(start) = start else {
                        return;
                    };
                    let input = match SwipeDirection::classify(evt.client_coordinates().x - start) {
                        Some(direction) => NavInput::Swipe(direction),
                        None => NavInput::Tap,
                    };
                    on_navigate.call(input);
                },
                onpointerleave: move |_| drag_start.set(None),
                p { class: "question-text", "{vm.text}" }
            }

            nav { class: "question-nav",
                button {
                    id: "prev",
                    class: "btn",
                    disabled: !vm.can_prev,
                    onclick: move |_| on_navigate.call(NavInput::Prev),
                    "Previous"
                }
                button {
                    id: "next",
                    class: "btn primary",
                    disabled: !vm.can_next,
                    onclick: move |_| on_navigate.call(NavInput::Next),
                    "Next"
                }
            }
        }
    }
}
