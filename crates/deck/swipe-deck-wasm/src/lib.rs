use js_sys::Function;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use swipe_deck_core::{
    CardSnapshot, CardStackController, DeckConfig, DeckDataSource, DeckDelegate, DeckEvent,
    DeckFlags, DeckState, EventQueue, Point, Size, SnapshotRenderer, SwipeDirection, TweenEngine,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Pulls card content from JS callbacks:
/// `count() -> number`, `content(index) -> any`, `overlay(index) -> any | null`.
struct JsDataSource {
    count: Function,
    content: Function,
    overlay: Option<Function>,
}

impl DeckDataSource for JsDataSource {
    type Content = JsValue;
    type Overlay = JsValue;

    fn card_count(&self) -> usize {
        match self.count.call0(&JsValue::UNDEFINED) {
            Ok(v) => v
                .as_f64()
                .filter(|n| n.is_finite() && *n > 0.0)
                .map_or(0, |n| n as usize),
            Err(e) => {
                log::warn!("count callback threw: {e:?}");
                0
            }
        }
    }

    fn content_for_index(&mut self, index: usize) -> JsValue {
        self.content
            .call1(&JsValue::UNDEFINED, &JsValue::from_f64(index as f64))
            .unwrap_or(JsValue::UNDEFINED)
    }

    fn overlay_for_index(&mut self, index: usize) -> Option<JsValue> {
        let f = self.overlay.as_ref()?;
        match f.call1(&JsValue::UNDEFINED, &JsValue::from_f64(index as f64)) {
            Ok(v) if !jsvalue_is_undefined_or_null(&v) => Some(v),
            _ => None,
        }
    }
}

/// Per-frame result of [`SwipeDeck::update`].
#[derive(Serialize)]
struct UpdateOut {
    deck: DeckState,
    /// Back-to-front; cards flying off come last.
    cards: Vec<CardSnapshot>,
    events: Vec<DeckEvent>,
}

#[wasm_bindgen]
pub struct SwipeDeck {
    core: CardStackController<JsDataSource, TweenEngine>,
    events: EventQueue,
}

#[wasm_bindgen]
impl SwipeDeck {
    /// Create a deck. Both arguments are optional JSON objects:
    ///   new SwipeDeck({ visible_capacity: 4 }, { move_background_cards: true })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, flags: JsValue) -> Result<SwipeDeck, JsError> {
        console_error_panic_hook::set_once();

        let cfg: DeckConfig = if jsvalue_is_undefined_or_null(&config) {
            DeckConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let flags: DeckFlags = if jsvalue_is_undefined_or_null(&flags) {
            DeckFlags::default()
        } else {
            swb::from_value(flags).map_err(|e| JsError::new(&format!("flags error: {e}")))?
        };
        let (delegate, events) = DeckDelegate::queued(flags);
        let core = CardStackController::new(cfg, TweenEngine::new())
            .map_err(|e| JsError::new(&e.to_string()))?
            .with_delegate(delegate);
        Ok(SwipeDeck { core, events })
    }

    /// Install the content callbacks and populate the deck.
    #[wasm_bindgen(js_name = set_data_source)]
    pub fn set_data_source(&mut self, count: Function, content: Function, overlay: Option<Function>) {
        self.core.set_data_source(JsDataSource {
            count,
            content,
            overlay,
        });
    }

    #[wasm_bindgen(js_name = set_container_size)]
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.core.on_container_resized(Size::new(width, height));
    }

    /// Re-read the data source after JS-side data changes.
    #[wasm_bindgen]
    pub fn reload(&mut self) {
        self.core.reload();
    }

    #[wasm_bindgen(js_name = reset_to_start)]
    pub fn reset_to_start(&mut self) {
        self.core.reset_to_start();
    }

    /// Fling the front card: `"left"` or `"right"`.
    #[wasm_bindgen]
    pub fn swipe(&mut self, direction: &str) -> Result<(), JsError> {
        let direction: SwipeDirection = swb::from_value(JsValue::from_str(direction))
            .map_err(|e| JsError::new(&format!("swipe direction error: {e}")))?;
        self.core.swipe(direction);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn revert(&mut self) {
        self.core.revert();
    }

    /// Pointer down at (x, y) in container coordinates. Returns whether
    /// the front card took the press.
    #[wasm_bindgen(js_name = drag_begin)]
    pub fn drag_begin(&mut self, x: f32, y: f32) -> bool {
        self.core.drag_began(Point::new(x, y))
    }

    /// Pointer displacement since `drag_begin`.
    #[wasm_bindgen(js_name = drag_move)]
    pub fn drag_move(&mut self, dx: f32, dy: f32) {
        self.core.drag_moved(dx, dy);
    }

    #[wasm_bindgen(js_name = drag_end)]
    pub fn drag_end(&mut self) {
        self.core.drag_ended();
    }

    #[wasm_bindgen]
    pub fn tap(&mut self) {
        self.core.tap();
    }

    /// Step animations by dt (seconds). Returns `{ deck, cards, events }`.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> Result<JsValue, JsError> {
        self.core.tick(dt);
        let mut renderer = SnapshotRenderer::default();
        self.core.render(&mut renderer);
        let out = UpdateOut {
            deck: renderer.deck,
            cards: renderer.cards,
            events: self.events.drain(),
        };
        swb::to_value(&out).map_err(|e| JsError::new(&format!("update output error: {e}")))
    }

    /// Content the data source returned for a global index, if still visible.
    #[wasm_bindgen(js_name = view_for_index)]
    pub fn view_for_index(&self, index: usize) -> JsValue {
        self.core
            .view_for_index(index)
            .cloned()
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Static frame `{ origin, size }` of window slot `position`.
    #[wasm_bindgen(js_name = frame_for_index)]
    pub fn frame_for_index(&self, position: usize) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.frame_for_index(position))
            .map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    #[wasm_bindgen(js_name = current_index)]
    pub fn current_index(&self) -> usize {
        self.core.current_index()
    }

    #[wasm_bindgen(js_name = card_count)]
    pub fn card_count(&self) -> usize {
        self.core.card_count()
    }

    #[wasm_bindgen(js_name = is_animating)]
    pub fn is_animating(&self) -> bool {
        self.core.is_animating()
    }
}

/// ABI guard for JS wrappers.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
