use dioxus::prelude::*;
use std::sync::Arc;

use outloud_core::model::{
    Block, BlockId, Price, PurchaseRequest, Question, QuestionId, ThemeConfig, UserId, Viewer,
};
use outloud_core::{Event, Request};
use services::InMemoryBackend;

use super::test_harness::{
    StalledTheme, render_once, setup_view_harness, setup_view_harness_with,
};
use crate::views::{CatalogView, ConfirmDialog, QuestionView};
use crate::vm::{BlockCardVm, CatalogVm, QuestionVm};

#[component]
fn CatalogHarness(vm: CatalogVm) -> Element {
    rsx! { CatalogView { vm, on_select: |_| {}, on_buy_all: |_| {} } }
}

#[component]
fn QuestionHarness(vm: QuestionVm) -> Element {
    rsx! { QuestionView { vm, on_navigate: |_| {}, on_back: |_| {} } }
}

#[component]
fn DialogHarness(prompt: String) -> Element {
    rsx! { ConfirmDialog { prompt, on_answer: |_| {} } }
}

/// The opening tag of the element with the given id.
fn opening_tag<'a>(html: &'a str, id: &str) -> &'a str {
    let start = html
        .find(&format!("id=\"{id}\""))
        .unwrap_or_else(|| panic!("no #{id} in {html}"));
    let end = html[start..].find('>').map_or(html.len(), |offset| start + offset);
    &html[start..end]
}

fn question_vm(can_prev: bool, can_next: bool) -> QuestionVm {
    QuestionVm {
        block_name: "Intro".to_owned(),
        text: "What made you smile today?".to_owned(),
        progress: "1 / 2".to_owned(),
        can_prev,
        can_next,
    }
}

#[test]
fn catalog_renders_labels_in_order() {
    let vm = CatalogVm {
        loaded: true,
        blocks: vec![
            BlockCardVm {
                id: BlockId::new(1),
                name: "Intro".to_owned(),
                label: "Free".to_owned(),
                locked: false,
                pending: false,
            },
            BlockCardVm {
                id: BlockId::new(2),
                name: "Deep".to_owned(),
                label: "Paid · 100 ₽".to_owned(),
                locked: true,
                pending: false,
            },
        ],
        buy_all_label: "Buy all blocks · 250 ₽".to_owned(),
        greeting: Some("Hi, Ann!".to_owned()),
    };

    let html = render_once(CatalogHarness, CatalogHarnessProps { vm });

    let intro = html.find("Intro").expect("intro rendered");
    let deep = html.find("Deep").expect("deep rendered");
    assert!(intro < deep, "catalog order lost in {html}");
    assert!(html.contains("Paid · 100 ₽"), "missing paid label in {html}");
    assert!(html.contains("Buy all blocks · 250 ₽"), "missing buy-all in {html}");
    assert!(html.contains("Hi, Ann!"), "missing greeting in {html}");
}

#[test]
fn catalog_shows_loading_before_fetch() {
    let vm = CatalogVm {
        loaded: false,
        blocks: Vec::new(),
        buy_all_label: "Buy all blocks".to_owned(),
        greeting: None,
    };
    let html = render_once(CatalogHarness, CatalogHarnessProps { vm });
    assert!(html.contains("Loading..."), "missing loading text in {html}");
}

#[test]
fn first_question_disables_previous_only() {
    let html = render_once(
        QuestionHarness,
        QuestionHarnessProps {
            vm: question_vm(false, true),
        },
    );
    assert!(html.contains("What made you smile today?"));
    assert!(html.contains("1 / 2"));
    assert!(opening_tag(&html, "prev").contains("disabled"), "prev enabled in {html}");
    assert!(!opening_tag(&html, "next").contains("disabled"), "next disabled in {html}");
}

#[test]
fn confirm_dialog_shows_prompt() {
    let html = render_once(
        DialogHarness,
        DialogHarnessProps {
            prompt: "Buy \"Deep\" for 100 ₽?".to_owned(),
        },
    );
    assert!(html.contains("for 100 ₽?"), "missing prompt in {html}");
    assert!(html.contains("Cancel") && html.contains("Buy"));
}

#[tokio::test(flavor = "current_thread")]
async fn viewer_loads_theme_and_catalog_on_start() {
    let backend = InMemoryBackend::new()
        .with_theme(ThemeConfig {
            background_color: Some("#111111".to_owned()),
            text_color: None,
            font_family: Some("Georgia".to_owned()),
        })
        .with_block(
            Block::free(BlockId::new(1), "Intro"),
            vec![Question::new(QuestionId::new(10), "First?")],
        )
        .with_block(
            Block::paid(BlockId::new(2), "Deep", Price::new(100.0)),
            Vec::new(),
        )
        .with_bundle_price(Price::new(150.0));
    let mut harness = setup_view_harness(backend, Some(Viewer::new(UserId::new(5))));

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("background-color: #111111"), "theme not applied in {html}");
    assert!(html.contains("color: #000000"), "default text color missing in {html}");
    assert!(html.contains("font-family: Georgia"), "font missing in {html}");
    assert!(html.contains("Intro") && html.contains("Deep"), "catalog missing in {html}");
    assert!(html.contains("Buy all blocks · 150 ₽"), "bundle price missing in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn viewer_keeps_defaults_when_theme_fails() {
    let backend = InMemoryBackend::new()
        .failing(Request::Theme)
        .with_block(Block::free(BlockId::new(1), "Intro"), Vec::new());
    let mut harness = setup_view_harness(backend, None);

    harness.rebuild();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("background-color: #FFFFFF"), "defaults missing in {html}");
    assert!(html.contains("font-family: Arial"), "defaults missing in {html}");
    assert!(!html.contains(r#"role="alert""#), "theme failure must not alert: {html}");
    assert!(html.contains("Intro"));
}

#[tokio::test(flavor = "current_thread")]
async fn back_to_back_events_both_apply_while_theme_is_pending() {
    let backend = InMemoryBackend::demo();
    let mut harness = setup_view_harness_with(
        Arc::new(StalledTheme(backend.clone())),
        backend,
        Some(Viewer::new(UserId::new(9))),
    );

    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("Warm-up"), "catalog should load without the theme");

    harness.dispatch(Event::BuyAllRequested);
    harness.dispatch(Event::BlockSelected(BlockId::new(1)));
    harness.settle().await;
    let html = harness.render();

    assert_eq!(
        harness.backend.purchases(),
        vec![PurchaseRequest::all_blocks(UserId::new(9))]
    );
    assert!(html.contains("All blocks unlocked"), "buy-all notice missing in {html}");
    assert!(html.contains("What did you learn this week?"), "block not entered in {html}");
    assert!(html.contains("1 / 3"), "progress missing in {html}");
    assert!(html.contains("background-color: #FFFFFF"), "defaults missing in {html}");
}
