use dioxus::prelude::*;

#[component]
pub fn ConfirmDialog(prompt: String, on_answer: EventHandler<bool>) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal", role: "dialog",
                p { "{prompt}" }
                div { class: "modal-actions",
                    button {
                        id: "confirm-no",
                        class: "btn",
                        onclick: move |_| on_answer.call(false),
                        "Cancel"
                    }
                    button {
                        id: "confirm-yes",
                        class: "btn primary",
                        onclick: move |_| on_answer.call(true),
                        "Buy"
                    }
                }
            }
        }
    }
}

#[component]
pub fn NoticeBanner(message: String, on_dismiss: EventHandler<()>) -> Element {
    rsx! {
        div { class: "notice", role: "alert",
            span { "{message}" }
            button {
                class: "btn link",
                onclick: move |_| on_dismiss.call(()),
                "Dismiss"
            }
        }
    }
}
