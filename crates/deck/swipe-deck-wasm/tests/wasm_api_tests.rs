#![cfg(target_arch = "wasm32")]
use js_sys::{Function, JSON};
use serde_json::{json, Value};
use serde_wasm_bindgen as swb;
use swipe_deck_wasm::{abi_version, SwipeDeck};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn deck_with(count: u32) -> SwipeDeck {
    let mut deck = SwipeDeck::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    deck.set_container_size(300.0, 408.0);
    let count_fn = Function::new_no_args(&format!("return {count};"));
    let content_fn = Function::new_with_args("i", "return 'card-' + i;");
    let overlay_fn = Function::new_with_args("i", "return i % 2 === 0 ? 'like' : null;");
    deck.set_data_source(count_fn, content_fn, Some(overlay_fn));
    deck
}

fn update(deck: &mut SwipeDeck, dt: f32) -> Value {
    swb::from_value(deck.update(dt).unwrap()).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults_and_partial_config() {
    assert!(SwipeDeck::new(JsValue::NULL, JsValue::NULL).is_ok());
    let cfg = JSON::parse(r#"{ "visible_capacity": 2 }"#).unwrap();
    let flags = JSON::parse(r#"{ "fade_next_card_in": true }"#).unwrap();
    assert!(SwipeDeck::new(cfg, flags).is_ok());
}

#[wasm_bindgen_test]
fn invalid_config_is_an_error() {
    let cfg = JSON::parse(r#"{ "visible_capacity": 0 }"#).unwrap();
    assert!(SwipeDeck::new(cfg, JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn data_source_callbacks_fill_the_window() {
    let mut deck = deck_with(5);
    assert_eq!(deck.card_count(), 5);
    assert_eq!(deck.view_for_index(2).as_string().as_deref(), Some("card-2"));
    assert!(deck.view_for_index(3).is_undefined());

    let out = update(&mut deck, 0.0);
    let cards = out["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 3);
    // back-to-front, overlay only on even indices
    assert_eq!(cards[0]["index"].as_f64(), Some(2.0));
    assert_eq!(cards[0]["has_overlay"], json!(true));
    assert_eq!(cards[1]["has_overlay"], json!(false));
    assert_eq!(cards[2]["slot"].as_f64(), Some(0.0));
}

#[wasm_bindgen_test]
fn swipe_resolves_after_update() {
    let mut deck = deck_with(5);
    deck.swipe("right").unwrap();
    assert!(deck.is_animating());
    assert_eq!(deck.current_index(), 1);

    let out = update(&mut deck, 1.0);
    let events = out["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], json!("swipe_resolved"));
    assert_eq!(events[0]["index"].as_f64(), Some(0.0));
    assert_eq!(events[0]["direction"], json!("right"));
    assert!(!deck.is_animating());
}

#[wasm_bindgen_test]
fn unknown_direction_is_rejected() {
    let mut deck = deck_with(5);
    assert!(deck.swipe("up").is_err());
    assert_eq!(deck.current_index(), 0);
}

#[wasm_bindgen_test]
fn drag_past_half_width_commits_left() {
    let mut deck = deck_with(2);
    assert!(deck.drag_begin(150.0, 100.0));
    deck.drag_move(-200.0, 0.0);
    deck.drag_end();
    let out = update(&mut deck, 1.0);
    let kinds: Vec<&str> = out["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["drag_progress", "swipe_resolved"]);
}

#[wasm_bindgen_test]
fn tap_and_revert_round_trip() {
    let mut deck = deck_with(5);
    deck.swipe("left").unwrap();
    update(&mut deck, 1.0);
    deck.revert();
    update(&mut deck, 1.5);
    assert_eq!(deck.current_index(), 0);
    deck.tap();
    let out = update(&mut deck, 0.0);
    let events = out["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], json!("card_selected"));
    assert_eq!(events[0]["index"].as_f64(), Some(0.0));
}

#[wasm_bindgen_test]
fn frame_for_index_reports_slot_geometry() {
    let deck = deck_with(3);
    let frame: Value = swb::from_value(deck.frame_for_index(0).unwrap()).unwrap();
    assert_eq!(frame["size"]["width"].as_f64(), Some(300.0));
    assert_eq!(frame["origin"]["y"].as_f64(), Some(0.0));
}
