//! CardStackController: owns the deck position and the visible window,
//! lays the stack out and orchestrates advance, revert and reload.
//!
//! Methods:
//! - set_data_source, reload, reset_to_start (content virtualization)
//! - swipe, revert (programmatic actions, rejected while animating)
//! - drag_began/drag_moved/drag_ended/tap (pointer input for the front card)
//! - animation_finished / tick (completion routing)
//! - render (back-to-front walk for a [`Renderable`])

use std::fmt;

use hashbrown::HashMap;

use crate::animation::{
    AnimProperty, AnimTarget, AnimValue, AnimationEngine, AnimationRequest, AnimationSpec,
    TickingEngine,
};
use crate::card::{
    CardCompletion, CardReaction, CardSignal, DragPhase, DraggableCard, SwipeDirection,
};
use crate::config::DeckConfig;
use crate::error::Result;
use crate::geometry::{Frame, Point, Size, StackGeometry};
use crate::host::{CardRender, DeckDataSource, DeckDelegate, DeckEvent, DeckState, Renderable};
use crate::ids::{AnimationId, CardId, IdAllocator};

type Card<S> = DraggableCard<<S as DeckDataSource>::Content, <S as DeckDataSource>::Overlay>;

/// Follow-up work attached to an in-flight animation.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Completion {
    Card {
        card: CardId,
        completion: CardCompletion,
    },
    /// Front slot finished moving after a swipe.
    AdvanceSettled {
        front: CardId,
        index: usize,
        direction: SwipeDirection,
    },
    /// Background slots are back at rest after a snap-back.
    BackgroundReset { card: CardId },
    /// Restored front card finished fading in.
    RevertSettled { card: CardId },
    AppearSettled,
}

impl Completion {
    fn card(&self) -> Option<CardId> {
        match *self {
            Completion::Card { card, .. }
            | Completion::BackgroundReset { card }
            | Completion::RevertSettled { card } => Some(card),
            Completion::AdvanceSettled { front, .. } => Some(front),
            Completion::AppearSettled => None,
        }
    }
}

pub struct CardStackController<S: DeckDataSource, E: AnimationEngine> {
    cfg: DeckConfig,
    engine: E,
    source: Option<S>,
    delegate: DeckDelegate,
    ids: IdAllocator,

    geometry: StackGeometry,
    current_index: usize,
    card_count: usize,
    window: Vec<Card<S>>,
    /// Cards flying off-screen after a swipe, detached from the window.
    departing: Vec<Card<S>>,

    pending: HashMap<AnimationId, Completion>,
    animating: bool,
    deck: DeckState,
}

impl<S: DeckDataSource, E: AnimationEngine> fmt::Debug for CardStackController<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardStackController")
            .field("cfg", &self.cfg)
            .field("current_index", &self.current_index)
            .field("card_count", &self.card_count)
            .field("window", &self.window.iter().map(|c| c.id()).collect::<Vec<_>>())
            .field(
                "departing",
                &self.departing.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .field("pending", &self.pending.len())
            .field("animating", &self.animating)
            .field("deck", &self.deck)
            .finish()
    }
}

fn make_card<S: DeckDataSource>(
    ids: &mut IdAllocator,
    source: &mut S,
    index: usize,
    frame: Frame,
) -> Card<S> {
    let content = source.content_for_index(index);
    let overlay = source.overlay_for_index(index);
    DraggableCard::new(ids.alloc_card(), content, overlay, frame)
}

impl<S: DeckDataSource, E: AnimationEngine> CardStackController<S, E> {
    /// Create an empty deck. Call [`set_container_size`](Self::set_container_size)
    /// and [`set_data_source`](Self::set_data_source) to populate it.
    pub fn new(cfg: DeckConfig, engine: E) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            geometry: StackGeometry::from_config(&cfg, Size::ZERO),
            cfg,
            engine,
            source: None,
            delegate: DeckDelegate::default(),
            ids: IdAllocator::new(),
            current_index: 0,
            card_count: 0,
            window: Vec::new(),
            departing: Vec::new(),
            pending: HashMap::new(),
            animating: false,
            deck: DeckState::default(),
        })
    }

    pub fn with_delegate(mut self, delegate: DeckDelegate) -> Self {
        self.delegate = delegate;
        self
    }

    pub fn with_container_size(mut self, size: Size) -> Self {
        self.set_container_size(size);
        self
    }

    pub fn set_delegate(&mut self, delegate: DeckDelegate) {
        self.delegate = delegate;
    }

    pub fn delegate(&self) -> &DeckDelegate {
        &self.delegate
    }

    pub fn config(&self) -> &DeckConfig {
        &self.cfg
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn data_source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Mutable access for host-side data changes; call [`reload`](Self::reload)
    /// afterwards to pick them up.
    pub fn data_source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn visible_len(&self) -> usize {
        self.window.len()
    }

    pub fn visible_cards(&self) -> &[Card<S>] {
        &self.window
    }

    pub fn departing_cards(&self) -> &[Card<S>] {
        &self.departing
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Number of in-flight animations the deck still expects a completion for.
    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }

    pub fn deck_state(&self) -> DeckState {
        self.deck
    }

    pub fn container_size(&self) -> Size {
        self.geometry.container
    }

    fn screen_width(&self) -> f32 {
        self.cfg.screen_width.unwrap_or(self.geometry.container.width)
    }

    /// Static frame of window slot `position`.
    pub fn frame_for_slot(&self, position: usize) -> Frame {
        self.geometry.frame_for_slot(position)
    }

    /// Alias of [`frame_for_slot`](Self::frame_for_slot) under the host-facing name.
    pub fn frame_for_index(&self, position: usize) -> Frame {
        self.frame_for_slot(position)
    }

    /// Content bound to global deck index `index`, if it is in the window.
    pub fn view_for_index(&self, index: usize) -> Option<&S::Content> {
        let position = index.checked_sub(self.current_index)?;
        self.window.get(position).map(|card| card.content())
    }

    pub fn set_container_size(&mut self, size: Size) {
        self.geometry = StackGeometry::from_config(&self.cfg, size);
        self.layout_deck();
    }

    /// Host notification that the container changed size (rotation, window
    /// resize). Slots snap to their new static frames.
    pub fn on_container_resized(&mut self, size: Size) {
        log::debug!("container resized to {}x{}", size.width, size.height);
        self.set_container_size(size);
    }

    /// Place every window slot at its static frame without animation.
    pub fn layout_deck(&mut self) {
        for (position, card) in self.window.iter_mut().enumerate() {
            card.set_frame(self.geometry.frame_for_slot(position));
        }
    }

    pub fn set_data_source(&mut self, source: S) {
        self.source = Some(source);
        self.reload();
    }

    /// Sync the window with the data source.
    pub fn reload(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let count = source.card_count();
        self.card_count = count;
        if count == 0 {
            log::debug!("reload: empty data source");
            return;
        }
        if self.current_index == 0 {
            self.clear();
        }
        if self.current_index > count {
            self.current_index = count;
        }
        let remaining = count - self.current_index;
        if self.window.len() > remaining {
            let dropped: Vec<CardId> = self.window.drain(remaining..).map(|c| c.id()).collect();
            for id in dropped {
                self.cancel_card(id);
            }
        }

        if remaining > self.window.len() {
            if self.window.is_empty() {
                self.setup_deck();
                self.layout_deck();
                if self.delegate.flags.appear_animation {
                    self.apply_appear_animation();
                }
            } else {
                self.load_missing_cards();
            }
        } else {
            self.reconfigure_cards();
        }
        log::debug!(
            "reload: {} cards, current {}, window {}",
            count,
            self.current_index,
            self.window.len()
        );
    }

    /// Rewind to the first card and reload.
    pub fn reset_to_start(&mut self) {
        self.clear();
        self.reload();
    }

    fn clear(&mut self) {
        self.current_index = 0;
        for card in self.window.drain(..) {
            self.engine.cancel(AnimTarget::Card(card.id()));
        }
        let departing = &self.departing;
        self.pending.retain(|_, c| {
            matches!(c, Completion::Card { card, .. } if departing.iter().any(|d| d.id() == *card))
        });
        self.animating = false;
    }

    fn setup_deck(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let needed = self
            .cfg
            .visible_capacity
            .min(self.card_count.saturating_sub(self.current_index));
        for position in 0..needed {
            let frame = self.geometry.frame_for_slot(position);
            let mut card = make_card(&mut self.ids, source, self.current_index + position, frame);
            let front = position == 0;
            card.set_opacity(if front {
                self.cfg.alpha_opaque
            } else {
                self.cfg.alpha_semi_transparent
            });
            card.set_interactive(front);
            self.window.push(card);
        }
    }

    /// Top up a partially filled window from `current + len` onwards, then
    /// re-bind the slots that were already there.
    fn load_missing_cards(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        let existing = self.window.len();
        let remaining = self.card_count.saturating_sub(self.current_index + existing);
        let to_add = self.cfg.visible_capacity.saturating_sub(existing).min(remaining);
        for _ in 0..to_add {
            let position = self.window.len();
            let frame = self.geometry.frame_for_slot(position);
            let mut card = make_card(&mut self.ids, source, self.current_index + position, frame);
            card.set_opacity(self.cfg.alpha_semi_transparent);
            card.set_interactive(false);
            self.window.push(card);
        }
        for (position, card) in self.window.iter_mut().take(existing).enumerate() {
            let index = self.current_index + position;
            card.configure(source.content_for_index(index), source.overlay_for_index(index));
        }
    }

    fn reconfigure_cards(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        for (position, card) in self.window.iter_mut().enumerate() {
            let index = self.current_index + position;
            card.configure(source.content_for_index(index), source.overlay_for_index(index));
        }
    }

    fn apply_appear_animation(&mut self) {
        self.animating = true;
        self.deck.interactive = false;
        let spec = AnimationSpec::linear(self.cfg.appear_duration).delayed(self.cfg.swipe_duration);
        self.engine.animate(AnimationRequest {
            target: AnimTarget::Deck,
            property: AnimProperty::Opacity,
            from: AnimValue::Scalar(0.0),
            to: AnimValue::Scalar(1.0),
            spec,
        });
        let id = self.engine.animate(AnimationRequest {
            target: AnimTarget::Deck,
            property: AnimProperty::Scale,
            from: AnimValue::Scalar(self.cfg.appear_scale_from),
            to: AnimValue::Scalar(1.0),
            spec,
        });
        self.deck.opacity = 1.0;
        self.deck.scale = 1.0;
        self.pending.insert(id, Completion::AppearSettled);
    }

    fn cancel_card(&mut self, card: CardId) {
        self.engine.cancel(AnimTarget::Card(card));
        self.pending.retain(|_, c| c.card() != Some(card));
    }

    fn front_accepts_input(&self) -> bool {
        self.deck.interactive
            && self
                .window
                .first()
                .is_some_and(|c| c.is_interactive() && !c.is_hidden())
    }

    /// The front card is pressed, dragged or still settling from a release.
    fn front_is_busy(&self) -> bool {
        self.window
            .first()
            .is_some_and(|c| c.phase() != DragPhase::Idle)
    }

    /// Fling the front card off programmatically.
    pub fn swipe(&mut self, direction: SwipeDirection) {
        if self.animating {
            log::debug!("swipe {direction:?} ignored: deck is animating");
            return;
        }
        if self.front_is_busy() {
            log::debug!("swipe {direction:?} ignored: front card is held");
            return;
        }
        if self.window.is_empty() {
            return;
        }
        self.animating = true;
        let screen_width = self.screen_width();
        let front = &mut self.window[0];
        let card = front.id();
        match front.swipe(&mut self.engine, direction, &self.cfg, screen_width) {
            Some(reaction) => self.handle_reaction(card, reaction),
            None => self.animating = false,
        }
    }

    /// Bring back the most recently swiped card.
    pub fn revert(&mut self) {
        if self.animating {
            log::debug!("revert ignored: deck is animating");
            return;
        }
        if self.front_is_busy() {
            log::debug!("revert ignored: front card is held");
            return;
        }
        if self.current_index == 0 {
            return;
        }
        if self.source.is_none() {
            return;
        }
        if self.card_count.saturating_sub(self.current_index) >= self.cfg.visible_capacity {
            if let Some(last) = self.window.pop() {
                self.cancel_card(last.id());
            }
        }
        let Some(source) = self.source.as_mut() else {
            return;
        };
        self.current_index -= 1;

        let mut card = make_card(
            &mut self.ids,
            source,
            self.current_index,
            self.geometry.frame_for_slot(0),
        );
        card.set_opacity(self.cfg.alpha_transparent);
        card.set_interactive(true);
        let fade = card.animate_opacity(
            &mut self.engine,
            self.cfg.alpha_transparent,
            self.cfg.alpha_opaque,
            AnimationSpec::linear(self.cfg.revert_duration),
        );
        self.pending
            .insert(fade, Completion::RevertSettled { card: card.id() });
        self.window.insert(0, card);
        self.animating = true;

        let spec = AnimationSpec::linear(self.cfg.background_frame_duration);
        for (position, card) in self.window.iter_mut().enumerate().skip(1) {
            card.set_opacity(self.cfg.alpha_semi_transparent);
            card.set_interactive(false);
            card.animate_frame(&mut self.engine, self.geometry.frame_for_slot(position), spec);
        }
        log::debug!("reverted to card {}", self.current_index);
    }

    /// Press on the front card, `touch` in container coordinates.
    pub fn drag_began(&mut self, touch: Point) -> bool {
        if !self.front_accepts_input() {
            return false;
        }
        let front = &mut self.window[0];
        let card = front.id();
        if !front.drag_began(&mut self.engine, touch) {
            return false;
        }
        self.pending.retain(|_, c| {
            !matches!(c, Completion::Card { card: id, .. } if *id == card)
        });
        true
    }

    /// Pointer displacement since the press.
    pub fn drag_moved(&mut self, dx: f32, dy: f32) {
        let Some(front) = self.window.first_mut() else {
            return;
        };
        let card = front.id();
        if let Some(signal) = front.drag_moved(dx, dy, &self.cfg.drag) {
            self.handle_signal(card, signal);
        }
    }

    pub fn drag_ended(&mut self) {
        let screen_width = self.screen_width();
        let Some(front) = self.window.first_mut() else {
            return;
        };
        let card = front.id();
        let reaction = front.drag_ended(&mut self.engine, &self.cfg, screen_width);
        self.handle_reaction(card, reaction);
    }

    /// Tap on the front card.
    pub fn tap(&mut self) {
        if !self.front_accepts_input() {
            return;
        }
        let front = &self.window[0];
        let signal = front.tap();
        let card = front.id();
        self.handle_signal(card, signal);
    }

    fn handle_reaction(&mut self, card: CardId, reaction: CardReaction) {
        if let Some((id, completion)) = reaction.completion {
            self.pending.insert(id, Completion::Card { card, completion });
        }
        if let Some(signal) = reaction.signal {
            self.handle_signal(card, signal);
        }
    }

    fn handle_signal(&mut self, card: CardId, signal: CardSignal) {
        match signal {
            CardSignal::Dragged { percent, direction } => self.card_dragged(percent, direction),
            CardSignal::Swiped(direction) => self.swiped_action(direction),
            CardSignal::Reset => self.card_was_reset(),
            CardSignal::Tapped => {
                if let Some(position) = self.window.iter().position(|c| c.id() == card) {
                    self.delegate.emit(DeckEvent::CardSelected {
                        index: self.current_index + position,
                    });
                }
            }
        }
    }

    fn card_dragged(&mut self, percent: f32, direction: SwipeDirection) {
        self.animating = true;
        if self.delegate.flags.move_background_cards {
            self.move_other_cards(percent);
        }
        self.delegate
            .emit(DeckEvent::DragProgress { percent, direction });
    }

    /// Pull background slots towards the slot in front of them.
    fn move_other_cards(&mut self, percent: f32) {
        let t = percent / 100.0;
        let fade = self.delegate.flags.fade_next_card_in;
        let ids: Vec<CardId> = self.window.iter().skip(1).map(|c| c.id()).collect();
        for id in ids {
            self.cancel_card(id);
        }
        for (position, card) in self.window.iter_mut().enumerate().skip(1) {
            card.set_frame(self.geometry.interpolate_slot(position, position - 1, t));
            if fade && position == 1 {
                let semi = self.cfg.alpha_semi_transparent;
                card.set_opacity(semi + (self.cfg.alpha_opaque - semi) * t);
            }
        }
    }

    fn card_was_reset(&mut self) {
        if self.window.len() <= 1 {
            self.animating = false;
            return;
        }
        // A newer reset supersedes the previous one's frame tweens.
        self.pending
            .retain(|_, c| !matches!(c, Completion::BackgroundReset { .. }));
        let spec = AnimationSpec::linear(self.cfg.background_frame_duration);
        for (position, card) in self.window.iter_mut().enumerate().skip(1) {
            let id = card.animate_frame(&mut self.engine, self.geometry.frame_for_slot(position), spec);
            if position == 1 {
                self.pending
                    .insert(id, Completion::BackgroundReset { card: card.id() });
            }
        }
    }

    /// Front card committed: advance the window and re-layout.
    fn swiped_action(&mut self, direction: SwipeDirection) {
        self.animating = true;
        if self.window.is_empty() {
            return;
        }
        let mut gone = self.window.remove(0);
        gone.set_interactive(false);
        self.departing.push(gone);
        self.current_index += 1;
        let resolved = self.current_index - 1;

        let next = self.current_index + self.window.len();
        if self.window.len() < self.cfg.visible_capacity && next < self.card_count {
            if let Some(source) = self.source.as_mut() {
                let frame = self.geometry.frame_for_slot(self.window.len());
                let mut card = make_card(&mut self.ids, source, next, frame);
                card.set_hidden(true);
                card.set_interactive(false);
                card.set_opacity(self.cfg.alpha_semi_transparent);
                self.window.push(card);
            }
        }

        if self.window.is_empty() {
            log::debug!("deck exhausted after card {resolved}");
            self.delegate.emit(DeckEvent::SwipeResolved {
                index: resolved,
                direction,
            });
            self.animating = false;
            self.delegate.emit(DeckEvent::DeckExhausted);
            return;
        }

        let spec = self
            .delegate
            .background_card_animation
            .unwrap_or_else(|| AnimationSpec::linear(self.cfg.background_frame_duration));
        let fade_in = self.delegate.flags.fade_next_card_in;
        for (position, card) in self.window.iter_mut().enumerate() {
            let frame = self.geometry.frame_for_slot(position);
            let id = card.animate_frame(&mut self.engine, frame, spec);
            if position == 0 {
                self.pending.insert(
                    id,
                    Completion::AdvanceSettled {
                        front: card.id(),
                        index: resolved,
                        direction,
                    },
                );
                if fade_in {
                    card.set_opacity(self.cfg.alpha_opaque);
                } else {
                    let from = card.opacity();
                    card.animate_opacity(
                        &mut self.engine,
                        from,
                        self.cfg.alpha_opaque,
                        AnimationSpec::linear(self.cfg.background_frame_duration),
                    );
                }
            } else {
                card.set_opacity(self.cfg.alpha_semi_transparent);
                card.set_interactive(false);
            }
        }
        log::debug!(
            "advanced past card {resolved}: current {}, window {}",
            self.current_index,
            self.window.len()
        );
    }

    /// Route an engine completion. Unknown or superseded ids are ignored.
    pub fn animation_finished(&mut self, id: AnimationId) {
        let Some(completion) = self.pending.remove(&id) else {
            log::trace!("ignoring completion {id:?}");
            return;
        };
        log::trace!("completion {id:?}: {completion:?}");
        match completion {
            Completion::Card { card, completion } => {
                if let Some(c) = self
                    .window
                    .iter_mut()
                    .chain(self.departing.iter_mut())
                    .find(|c| c.id() == card)
                {
                    c.finish(completion);
                }
                if completion == CardCompletion::SwipedOff {
                    self.departing.retain(|c| c.id() != card);
                }
            }
            Completion::AdvanceSettled {
                front,
                index,
                direction,
            } => {
                if let Some(last) = self.window.last_mut() {
                    last.set_hidden(false);
                }
                if let Some(first) = self.window.first_mut() {
                    if first.id() == front {
                        first.set_interactive(true);
                        first.set_opacity(self.cfg.alpha_opaque);
                    }
                }
                self.animating = false;
                self.delegate
                    .emit(DeckEvent::SwipeResolved { index, direction });
            }
            Completion::BackgroundReset { .. } => {
                self.animating = false;
                for card in self.window.iter_mut().skip(1) {
                    card.set_opacity(self.cfg.alpha_semi_transparent);
                }
            }
            Completion::RevertSettled { .. } => {
                self.animating = false;
            }
            Completion::AppearSettled => {
                self.animating = false;
                self.deck.interactive = true;
            }
        }
    }

    fn card_render<'a>(
        &'a self,
        card: &'a Card<S>,
        index: Option<usize>,
        slot: Option<usize>,
    ) -> CardRender<'a, S::Content, S::Overlay> {
        let target = AnimTarget::Card(card.id());
        let scalar = |property, model: f32| {
            self.engine
                .presentation(target, property)
                .and_then(|v| v.as_scalar())
                .unwrap_or(model)
        };
        let animated_frame = self
            .engine
            .presentation(target, AnimProperty::Frame)
            .and_then(|v| v.as_frame());
        let frame = animated_frame.unwrap_or_else(|| card.frame());
        let center = self
            .engine
            .presentation(target, AnimProperty::Center)
            .and_then(|v| v.as_point())
            .unwrap_or_else(|| match animated_frame {
                Some(f) => f.center(),
                None => card.center(),
            });
        CardRender {
            id: card.id(),
            index,
            slot,
            frame,
            center,
            rotation: scalar(AnimProperty::Rotation, card.rotation()),
            scale: scalar(AnimProperty::Scale, card.scale()),
            opacity: scalar(AnimProperty::Opacity, card.opacity()),
            overlay_mode: card.overlay_mode(),
            overlay_opacity: scalar(AnimProperty::OverlayOpacity, card.overlay_opacity()),
            hidden: card.is_hidden(),
            interactive: card.is_interactive(),
            content: card.content(),
            overlay: card.overlay(),
        }
    }

    /// Walk the deck back-to-front: window from the back slot forward, then
    /// cards still flying off on top.
    pub fn render<R: Renderable<S::Content, S::Overlay> + ?Sized>(&self, renderer: &mut R) {
        let presented = |property, model: f32| {
            self.engine
                .presentation(AnimTarget::Deck, property)
                .and_then(|v| v.as_scalar())
                .unwrap_or(model)
        };
        renderer.render_deck(&DeckState {
            opacity: presented(AnimProperty::Opacity, self.deck.opacity),
            scale: presented(AnimProperty::Scale, self.deck.scale),
            interactive: self.deck.interactive,
        });
        for (position, card) in self.window.iter().enumerate().rev() {
            let render = self.card_render(card, Some(self.current_index + position), Some(position));
            renderer.render_card(&render);
        }
        for card in &self.departing {
            renderer.render_card(&self.card_render(card, None, None));
        }
    }
}

impl<S: DeckDataSource, E: TickingEngine> CardStackController<S, E> {
    /// Advance the engine by `dt` seconds and route finished animations.
    pub fn tick(&mut self, dt: f32) {
        for id in self.engine.advance(dt) {
            self.animation_finished(id);
        }
    }
}
