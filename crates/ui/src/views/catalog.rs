use dioxus::prelude::*;
use outloud_core::model::BlockId;

use crate::vm::{BlockCardVm, CatalogVm};

#[component]
pub fn CatalogView(
    vm: CatalogVm,
    on_select: EventHandler<BlockId>,
    on_buy_all: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "page catalog",
            if let Some(greeting) = vm.greeting.clone() {
                p { class: "greeting", "{greeting}" }
            }
            h2 { "Blocks" }

            if !vm.loaded {
                p { "Loading..." }
            } else if vm.blocks.is_empty() {
                p { "No blocks yet." }
            } else {
                ul { class: "block-list",
                    for card in vm.blocks.clone() {
                        BlockCard { key: "{card.id}", card, on_select }
                    }
                }
            }

            button {
                id: "buy-all",
                class: "btn buy-all",
                onclick: move |_| on_buy_all.call(()),
                "{vm.buy_all_label}"
            }
        }
    }
}

#[component]
fn BlockCard(card: BlockCardVm, on_select: EventHandler<BlockId>) -> Element {
    let id = card.id;
    let class = if card.locked { "block-card locked" } else { "block-card" };
    rsx! {
        li {
            button {
                class: "{class}",
                disabled: card.pending,
                onclick: move |_| on_select.call(id),
                span { class: "block-name", "{card.name}" }
                span { class: "block-label", "{card.label}" }
            }
        }
    }
}
