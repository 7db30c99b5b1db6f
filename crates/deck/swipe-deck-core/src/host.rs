//! Contracts between the deck and its host: pull-based content, capability
//! flags plus optional event handlers, and the render walk.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::animation::AnimationSpec;
use crate::card::SwipeDirection;
use crate::geometry::{Frame, Point};
use crate::ids::CardId;
use crate::overlay::OverlayMode;

/// Supplies card content on demand, like a virtualized list.
pub trait DeckDataSource {
    type Content;
    type Overlay;

    fn card_count(&self) -> usize;

    fn content_for_index(&mut self, index: usize) -> Self::Content;

    fn overlay_for_index(&mut self, _index: usize) -> Option<Self::Overlay> {
        None
    }
}

/// Optional behaviours a host opts into. Everything defaults to off.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckFlags {
    /// Scale/fade the deck in on first population.
    pub appear_animation: bool,
    /// Re-flow background cards while the front card is dragged.
    pub move_background_cards: bool,
    /// Fade the next card to opaque while the front card is dragged.
    pub fade_next_card_in: bool,
}

/// Discrete notifications for the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeckEvent {
    DragProgress {
        percent: f32,
        direction: SwipeDirection,
    },
    SwipeResolved {
        index: usize,
        direction: SwipeDirection,
    },
    DeckExhausted,
    CardSelected {
        index: usize,
    },
}

type Handler<A> = Box<dyn FnMut(A) + Send + Sync>;

/// Capability flags and optional handler slots, passed at construction.
#[derive(Default)]
pub struct DeckDelegate {
    pub flags: DeckFlags,
    /// Replaces the default frame animation used when the stack advances.
    pub background_card_animation: Option<AnimationSpec>,
    on_drag_progress: Option<Handler<(f32, SwipeDirection)>>,
    on_swipe_resolved: Option<Handler<(usize, SwipeDirection)>>,
    on_deck_exhausted: Option<Handler<()>>,
    on_card_selected: Option<Handler<usize>>,
}

impl fmt::Debug for DeckDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckDelegate")
            .field("flags", &self.flags)
            .field("background_card_animation", &self.background_card_animation)
            .field("on_drag_progress", &self.on_drag_progress.is_some())
            .field("on_swipe_resolved", &self.on_swipe_resolved.is_some())
            .field("on_deck_exhausted", &self.on_deck_exhausted.is_some())
            .field("on_card_selected", &self.on_card_selected.is_some())
            .finish()
    }
}

impl DeckDelegate {
    pub fn new(flags: DeckFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// A delegate whose handlers push every event into a shared queue.
    pub fn queued(flags: DeckFlags) -> (Self, EventQueue) {
        let queue = EventQueue::default();
        let (q1, q2, q3, q4) = (queue.clone(), queue.clone(), queue.clone(), queue.clone());
        let delegate = Self::new(flags)
            .on_drag_progress(move |percent, direction| {
                q1.push(DeckEvent::DragProgress { percent, direction })
            })
            .on_swipe_resolved(move |index, direction| {
                q2.push(DeckEvent::SwipeResolved { index, direction })
            })
            .on_deck_exhausted(move || q3.push(DeckEvent::DeckExhausted))
            .on_card_selected(move |index| q4.push(DeckEvent::CardSelected { index }));
        (delegate, queue)
    }

    pub fn with_background_card_animation(mut self, spec: AnimationSpec) -> Self {
        self.background_card_animation = Some(spec);
        self
    }

    pub fn on_drag_progress(
        mut self,
        mut f: impl FnMut(f32, SwipeDirection) + Send + Sync + 'static,
    ) -> Self {
        self.on_drag_progress = Some(Box::new(move |(p, d)| f(p, d)));
        self
    }

    pub fn on_swipe_resolved(
        mut self,
        mut f: impl FnMut(usize, SwipeDirection) + Send + Sync + 'static,
    ) -> Self {
        self.on_swipe_resolved = Some(Box::new(move |(i, d)| f(i, d)));
        self
    }

    pub fn on_deck_exhausted(mut self, mut f: impl FnMut() + Send + Sync + 'static) -> Self {
        self.on_deck_exhausted = Some(Box::new(move |()| f()));
        self
    }

    pub fn on_card_selected(mut self, f: impl FnMut(usize) + Send + Sync + 'static) -> Self {
        self.on_card_selected = Some(Box::new(f));
        self
    }

    /// Dispatch to the matching handler, if one is installed.
    pub(crate) fn emit(&mut self, event: DeckEvent) {
        match &event {
            DeckEvent::DragProgress { .. } => log::trace!("deck event {event:?}"),
            _ => log::debug!("deck event {event:?}"),
        }
        match event {
            DeckEvent::DragProgress { percent, direction } => {
                if let Some(h) = self.on_drag_progress.as_mut() {
                    h((percent, direction));
                }
            }
            DeckEvent::SwipeResolved { index, direction } => {
                if let Some(h) = self.on_swipe_resolved.as_mut() {
                    h((index, direction));
                }
            }
            DeckEvent::DeckExhausted => {
                if let Some(h) = self.on_deck_exhausted.as_mut() {
                    h(());
                }
            }
            DeckEvent::CardSelected { index } => {
                if let Some(h) = self.on_card_selected.as_mut() {
                    h(index);
                }
            }
        }
    }
}

/// Shared FIFO of deck events, filled by [`DeckDelegate::queued`].
#[derive(Clone, Debug, Default)]
pub struct EventQueue(Arc<Mutex<Vec<DeckEvent>>>);

impl EventQueue {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DeckEvent>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, event: DeckEvent) {
        self.lock().push(event);
    }

    pub fn drain(&self) -> Vec<DeckEvent> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Deck-level visual state (appear animation).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeckState {
    pub opacity: f32,
    pub scale: f32,
    pub interactive: bool,
}

impl Default for DeckState {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            interactive: true,
        }
    }
}

/// One card as it should be drawn this frame, presentation values applied.
#[derive(Debug)]
pub struct CardRender<'a, C, O> {
    pub id: CardId,
    /// Global deck index; `None` for a card flying off after a swipe.
    pub index: Option<usize>,
    /// Window position (0 = front); `None` for a departing card.
    pub slot: Option<usize>,
    pub frame: Frame,
    pub center: Point,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub overlay_mode: OverlayMode,
    pub overlay_opacity: f32,
    pub hidden: bool,
    pub interactive: bool,
    pub content: &'a C,
    pub overlay: Option<&'a O>,
}

impl<C, O> CardRender<'_, C, O> {
    /// Handle-free copy, e.g. for serialization to a script host.
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            id: self.id,
            index: self.index,
            slot: self.slot,
            frame: self.frame,
            center: self.center,
            rotation: self.rotation,
            scale: self.scale,
            opacity: self.opacity,
            overlay_mode: self.overlay_mode,
            overlay_opacity: self.overlay_opacity,
            has_overlay: self.overlay.is_some(),
            hidden: self.hidden,
            interactive: self.interactive,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: CardId,
    pub index: Option<usize>,
    pub slot: Option<usize>,
    pub frame: Frame,
    pub center: Point,
    pub rotation: f32,
    pub scale: f32,
    pub opacity: f32,
    pub overlay_mode: OverlayMode,
    pub overlay_opacity: f32,
    pub has_overlay: bool,
    pub hidden: bool,
    pub interactive: bool,
}

/// Platform view adapter. The deck walks cards back-to-front.
pub trait Renderable<C, O> {
    fn render_deck(&mut self, _deck: &DeckState) {}

    fn render_card(&mut self, card: &CardRender<'_, C, O>);
}

/// Collects handle-free snapshots; handy for tests and script hosts.
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    pub deck: DeckState,
    pub cards: Vec<CardSnapshot>,
}

impl<C, O> Renderable<C, O> for SnapshotRenderer {
    fn render_deck(&mut self, deck: &DeckState) {
        self.deck = *deck;
    }

    fn render_card(&mut self, card: &CardRender<'_, C, O>) {
        self.cards.push(card.snapshot());
    }
}
