#![allow(dead_code)]
//! Shared test doubles: a vector-backed data source and a recording engine.

use swipe_deck_core::{
    AnimProperty, AnimTarget, AnimValue, AnimationEngine, AnimationId, AnimationRequest,
    CardStackController, DeckConfig, DeckDataSource, DeckDelegate, DeckEvent, DeckFlags,
    EventQueue, Size, TweenEngine,
};

pub const WIDTH: f32 = 300.0;
pub const HEIGHT: f32 = 408.0;

#[derive(Debug, Default)]
pub struct VecSource {
    pub cards: Vec<String>,
    pub with_overlays: bool,
    pub requested: Vec<usize>,
}

impl VecSource {
    pub fn new(count: usize) -> Self {
        Self {
            cards: (0..count).map(|i| format!("card-{i}")).collect(),
            with_overlays: true,
            requested: Vec::new(),
        }
    }
}

impl DeckDataSource for VecSource {
    type Content = String;
    type Overlay = String;

    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn content_for_index(&mut self, index: usize) -> String {
        self.requested.push(index);
        self.cards[index].clone()
    }

    fn overlay_for_index(&mut self, index: usize) -> Option<String> {
        self.with_overlays.then(|| format!("overlay-{index}"))
    }
}

pub type TweenDeck = CardStackController<VecSource, TweenEngine>;

/// Deck of `count` cards in a 300x408 container (front slot 300x400).
pub fn deck(count: usize, flags: DeckFlags) -> (TweenDeck, EventQueue) {
    deck_with(count, DeckConfig::default(), flags)
}

pub fn deck_with(count: usize, cfg: DeckConfig, flags: DeckFlags) -> (TweenDeck, EventQueue) {
    let (delegate, events) = DeckDelegate::queued(flags);
    let mut ctrl = CardStackController::new(cfg, TweenEngine::new())
        .unwrap()
        .with_delegate(delegate)
        .with_container_size(Size::new(WIDTH, HEIGHT));
    ctrl.set_data_source(VecSource::new(count));
    (ctrl, events)
}

/// Run the tween engine until nothing is in flight.
pub fn settle(ctrl: &mut TweenDeck) {
    for _ in 0..10 {
        ctrl.tick(0.5);
        if ctrl.engine().is_idle() {
            return;
        }
    }
}

/// Full press-drag-release on the front card, grabbed in its top half.
pub fn fling(ctrl: &mut TweenDeck, dx: f32, dy: f32) {
    let front = ctrl.frame_for_slot(0);
    assert!(ctrl.drag_began(front.center().offset(0.0, -10.0)));
    ctrl.drag_moved(dx / 2.0, dy / 2.0);
    ctrl.drag_moved(dx, dy);
    ctrl.drag_ended();
}

pub fn resolved(events: &[DeckEvent]) -> Vec<DeckEvent> {
    events
        .iter()
        .filter(|e| !matches!(e, DeckEvent::DragProgress { .. }))
        .cloned()
        .collect()
}

pub fn contents(ctrl: &TweenDeck) -> Vec<String> {
    ctrl.visible_cards().iter().map(|c| c.content().clone()).collect()
}

/// Engine that records requests and completes them only when told to.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    next: u64,
    pub requests: Vec<(AnimationId, AnimationRequest)>,
    pub active: Vec<AnimationId>,
    pub cancelled: Vec<AnimTarget>,
}

impl RecordingEngine {
    pub fn last_for(&self, target: AnimTarget, property: AnimProperty) -> Option<&AnimationRequest> {
        self.requests
            .iter()
            .rev()
            .map(|(_, r)| r)
            .find(|r| r.target == target && r.property == property)
    }

    pub fn take_active(&mut self) -> Vec<AnimationId> {
        std::mem::take(&mut self.active)
    }
}

impl AnimationEngine for RecordingEngine {
    fn animate(&mut self, request: AnimationRequest) -> AnimationId {
        let superseded: Vec<AnimationId> = self
            .requests
            .iter()
            .filter(|(_, r)| r.target == request.target && r.property == request.property)
            .map(|(id, _)| *id)
            .collect();
        self.active.retain(|id| !superseded.contains(id));
        let id = AnimationId(self.next);
        self.next += 1;
        self.requests.push((id, request));
        self.active.push(id);
        id
    }

    fn cancel(&mut self, target: AnimTarget) {
        self.cancelled.push(target);
        let dropped: Vec<AnimationId> = self
            .requests
            .iter()
            .filter(|(_, r)| r.target == target)
            .map(|(id, _)| *id)
            .collect();
        self.active.retain(|id| !dropped.contains(id));
    }
}

pub fn scalar(v: AnimValue) -> f32 {
    v.as_scalar().expect("scalar animation value")
}
