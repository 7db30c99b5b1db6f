mod common;

use common::*;
use swipe_deck_core::{
    DeckConfig, DeckEvent, DeckFlags, Renderable, SnapshotRenderer, SwipeDirection,
};

#[test]
fn initial_window_holds_capacity_cards() {
    // it should bind indices [0, 1, 2] from a five card source
    let (ctrl, events) = deck(5, DeckFlags::default());
    assert_eq!(ctrl.current_index(), 0);
    assert_eq!(ctrl.card_count(), 5);
    assert_eq!(contents(&ctrl), vec!["card-0", "card-1", "card-2"]);
    assert_eq!(ctrl.data_source().unwrap().requested, vec![0, 1, 2]);
    assert!(events.is_empty());

    let cards = ctrl.visible_cards();
    assert!(cards[0].is_interactive());
    assert_eq!(cards[0].opacity(), 1.0);
    for card in &cards[1..] {
        assert!(!card.is_interactive());
        assert_eq!(card.opacity(), 0.7);
    }
    for (position, card) in cards.iter().enumerate() {
        assert_eq!(card.frame(), ctrl.frame_for_slot(position));
    }
}

#[test]
fn window_never_exceeds_remaining_cards() {
    // it should show only as many cards as the source has
    let (ctrl, _) = deck(2, DeckFlags::default());
    assert_eq!(ctrl.visible_len(), 2);

    let (empty, _) = deck(0, DeckFlags::default());
    assert_eq!(empty.visible_len(), 0);
    assert_eq!(empty.card_count(), 0);
}

#[test]
fn commit_right_advances_and_reports_once() {
    let (mut ctrl, events) = deck(5, DeckFlags::default());
    fling(&mut ctrl, 200.0, 10.0);

    // it should advance the window before the animations settle
    assert_eq!(ctrl.current_index(), 1);
    assert_eq!(contents(&ctrl), vec!["card-1", "card-2", "card-3"]);
    assert!(ctrl.is_animating());
    assert!(ctrl.visible_cards()[2].is_hidden());
    assert_eq!(ctrl.departing_cards().len(), 1);
    assert!(resolved(&events.drain()).is_empty());

    settle(&mut ctrl);
    let fired = resolved(&events.drain());
    assert_eq!(
        fired,
        vec![DeckEvent::SwipeResolved {
            index: 0,
            direction: SwipeDirection::Right
        }]
    );
    assert!(!ctrl.is_animating());
    assert!(ctrl.departing_cards().is_empty());
    let cards = ctrl.visible_cards();
    assert!(cards[0].is_interactive());
    assert_eq!(cards[0].opacity(), 1.0);
    assert!(!cards[2].is_hidden());
}

#[test]
fn last_card_commit_exhausts_deck() {
    // it should report the swipe and then exhaustion, leaving nothing visible
    let (mut ctrl, events) = deck(1, DeckFlags::default());
    fling(&mut ctrl, -200.0, 0.0);
    assert_eq!(ctrl.visible_len(), 0);
    assert_eq!(ctrl.current_index(), 1);
    assert_eq!(
        resolved(&events.drain()),
        vec![
            DeckEvent::SwipeResolved {
                index: 0,
                direction: SwipeDirection::Left
            },
            DeckEvent::DeckExhausted
        ]
    );
    assert!(!ctrl.is_animating());
    settle(&mut ctrl);
    assert!(ctrl.departing_cards().is_empty());
}

#[test]
fn window_length_tracks_commits() {
    // it should keep min(capacity, total - n) cards after n commits
    for n in 0..=5usize {
        let (mut ctrl, _) = deck(5, DeckFlags::default());
        for _ in 0..n {
            ctrl.swipe(SwipeDirection::Left);
            settle(&mut ctrl);
        }
        assert_eq!(ctrl.current_index(), n);
        assert_eq!(ctrl.visible_len(), 3.min(5 - n), "after {n} commits");
        for (position, content) in contents(&ctrl).iter().enumerate() {
            assert_eq!(content, &format!("card-{}", n + position));
        }
    }
}

#[test]
fn swipe_is_ignored_while_animating() {
    let (mut ctrl, events) = deck(5, DeckFlags::default());
    ctrl.swipe(SwipeDirection::Right);
    ctrl.swipe(SwipeDirection::Right);
    settle(&mut ctrl);
    assert_eq!(ctrl.current_index(), 1);
    assert_eq!(resolved(&events.drain()).len(), 1);
}

#[test]
fn programmatic_swipe_reports_direction() {
    let (mut ctrl, events) = deck(3, DeckFlags::default());
    ctrl.swipe(SwipeDirection::Left);
    settle(&mut ctrl);
    ctrl.swipe(SwipeDirection::Right);
    settle(&mut ctrl);
    assert_eq!(
        resolved(&events.drain()),
        vec![
            DeckEvent::SwipeResolved {
                index: 0,
                direction: SwipeDirection::Left
            },
            DeckEvent::SwipeResolved {
                index: 1,
                direction: SwipeDirection::Right
            },
        ]
    );
}

#[test]
fn revert_restores_previous_card() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    ctrl.swipe(SwipeDirection::Right);
    settle(&mut ctrl);
    assert_eq!(contents(&ctrl), vec!["card-1", "card-2", "card-3"]);

    ctrl.revert();
    // it should rebuild the front card from the source and fade it in
    assert_eq!(ctrl.current_index(), 0);
    assert_eq!(contents(&ctrl), vec!["card-0", "card-1", "card-2"]);
    assert!(ctrl.is_animating());
    assert_eq!(ctrl.visible_cards()[0].frame(), ctrl.frame_for_slot(0));

    settle(&mut ctrl);
    assert!(!ctrl.is_animating());
    let cards = ctrl.visible_cards();
    assert_eq!(cards[0].opacity(), 1.0);
    assert!(cards[0].is_interactive());
    for (position, card) in cards.iter().enumerate() {
        assert_eq!(card.frame(), ctrl.frame_for_slot(position));
    }
}

#[test]
fn revert_near_the_end_keeps_trailing_cards() {
    // it should not drop a background card when fewer than capacity remain
    let (mut ctrl, _) = deck(4, DeckFlags::default());
    for _ in 0..2 {
        ctrl.swipe(SwipeDirection::Left);
        settle(&mut ctrl);
    }
    assert_eq!(contents(&ctrl), vec!["card-2", "card-3"]);
    ctrl.revert();
    settle(&mut ctrl);
    assert_eq!(contents(&ctrl), vec!["card-1", "card-2", "card-3"]);
}

#[test]
fn revert_is_a_no_op_at_start_or_while_animating() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    ctrl.revert();
    assert_eq!(ctrl.current_index(), 0);
    assert!(!ctrl.is_animating());

    ctrl.swipe(SwipeDirection::Left);
    ctrl.revert();
    assert_eq!(ctrl.current_index(), 1);
    settle(&mut ctrl);
    assert_eq!(contents(&ctrl), vec!["card-1", "card-2", "card-3"]);
}

#[test]
fn view_for_index_covers_only_the_window() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    ctrl.swipe(SwipeDirection::Right);
    settle(&mut ctrl);
    assert_eq!(ctrl.view_for_index(0), None);
    assert_eq!(ctrl.view_for_index(1).map(String::as_str), Some("card-1"));
    assert_eq!(ctrl.view_for_index(3).map(String::as_str), Some("card-3"));
    assert_eq!(ctrl.view_for_index(4), None);
}

#[test]
fn tap_selects_current_index() {
    let (mut ctrl, events) = deck(5, DeckFlags::default());
    ctrl.swipe(SwipeDirection::Right);
    settle(&mut ctrl);
    events.drain();
    ctrl.tap();
    assert_eq!(events.drain(), vec![DeckEvent::CardSelected { index: 1 }]);
}

#[test]
fn reload_tops_up_a_partial_window() {
    let (mut ctrl, _) = deck(4, DeckFlags::default());
    for _ in 0..2 {
        ctrl.swipe(SwipeDirection::Left);
        settle(&mut ctrl);
    }
    assert_eq!(ctrl.visible_len(), 2);

    let source = ctrl.data_source_mut().unwrap();
    source.cards.extend(["card-4".to_string(), "card-5".into(), "card-6".into()]);
    source.requested.clear();
    ctrl.reload();

    // it should append at the true next index and re-bind what was there
    assert_eq!(ctrl.card_count(), 7);
    assert_eq!(contents(&ctrl), vec!["card-2", "card-3", "card-4"]);
    assert_eq!(ctrl.data_source().unwrap().requested, vec![4, 2, 3]);
    assert_eq!(ctrl.visible_cards()[2].frame(), ctrl.frame_for_slot(2));
    assert!(!ctrl.visible_cards()[2].is_interactive());
}

#[test]
fn reload_rebinds_and_trims_after_data_changes() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    ctrl.swipe(SwipeDirection::Left);
    settle(&mut ctrl);

    let source = ctrl.data_source_mut().unwrap();
    source.cards.truncate(3);
    source.cards[1] = "edited".into();
    ctrl.reload();
    assert_eq!(ctrl.current_index(), 1);
    assert_eq!(contents(&ctrl), vec!["edited", "card-2"]);
}

#[test]
fn reload_at_start_rebuilds_the_window() {
    let (mut ctrl, _) = deck(3, DeckFlags::default());
    ctrl.data_source_mut().unwrap().cards[0] = "fresh".into();
    ctrl.reload();
    assert_eq!(contents(&ctrl), vec!["fresh", "card-1", "card-2"]);
}

#[test]
fn reset_to_start_rewinds() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    for _ in 0..3 {
        ctrl.swipe(SwipeDirection::Right);
        settle(&mut ctrl);
    }
    ctrl.reset_to_start();
    assert_eq!(ctrl.current_index(), 0);
    assert_eq!(contents(&ctrl), vec!["card-0", "card-1", "card-2"]);
    assert!(!ctrl.is_animating());
}

#[test]
fn appear_animation_blocks_input_until_settled() {
    let flags = DeckFlags {
        appear_animation: true,
        ..DeckFlags::default()
    };
    let (mut ctrl, _) = deck(3, flags);
    assert!(ctrl.is_animating());
    assert!(!ctrl.deck_state().interactive);
    let touch = ctrl.frame_for_slot(0).center();
    assert!(!ctrl.drag_began(touch));

    // it should hold the deck invisible through the start delay
    let mut renderer = SnapshotRenderer::default();
    ctrl.tick(0.1);
    ctrl.render(&mut renderer);
    assert_eq!(renderer.deck.opacity, 0.0);
    assert!((renderer.deck.scale - 0.1).abs() < 1e-6);

    settle(&mut ctrl);
    assert!(!ctrl.is_animating());
    assert!(ctrl.deck_state().interactive);
    assert!(ctrl.drag_began(touch));
}

#[test]
fn render_walks_back_to_front_then_departing() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    let mut renderer = SnapshotRenderer::default();
    ctrl.render(&mut renderer);
    let slots: Vec<_> = renderer.cards.iter().map(|c| c.slot).collect();
    assert_eq!(slots, vec![Some(2), Some(1), Some(0)]);
    assert!(renderer.cards.iter().all(|c| c.has_overlay));

    ctrl.swipe(SwipeDirection::Right);
    ctrl.tick(0.1);
    let mut renderer = SnapshotRenderer::default();
    ctrl.render(&mut renderer);
    let last = renderer.cards.last().unwrap();
    assert_eq!(last.index, None);
    assert_eq!(last.slot, None);
    // the flying card is between its anchor and the off-screen target
    let anchor_x = ctrl.frame_for_slot(0).center().x;
    assert!(last.center.x > anchor_x && last.center.x < 2.0 * WIDTH);
}

#[test]
fn container_resize_relayouts_slots() {
    let (mut ctrl, _) = deck(5, DeckFlags::default());
    ctrl.on_container_resized(swipe_deck_core::Size::new(600.0, 808.0));
    assert_eq!(ctrl.container_size().width, 600.0);
    for (position, card) in ctrl.visible_cards().iter().enumerate() {
        assert_eq!(card.frame(), ctrl.frame_for_slot(position));
    }
    assert_eq!(ctrl.frame_for_index(0).width(), 600.0);
}

#[test]
fn custom_capacity_and_margins_apply() {
    let cfg = DeckConfig::from_json(r#"{ "visible_capacity": 2, "background_top_margin": 10.0 }"#)
        .unwrap();
    let (ctrl, _) = deck_with(5, cfg, DeckFlags::default());
    assert_eq!(ctrl.visible_len(), 2);
    let front = ctrl.frame_for_slot(0);
    assert_eq!(front.height(), HEIGHT - 10.0);
}

struct Counting(usize);

impl Renderable<String, String> for Counting {
    fn render_card(&mut self, _card: &swipe_deck_core::CardRender<'_, String, String>) {
        self.0 += 1;
    }
}

#[test]
fn custom_renderer_sees_every_card() {
    let (ctrl, _) = deck(2, DeckFlags::default());
    let mut counting = Counting(0);
    ctrl.render(&mut counting);
    assert_eq!(counting.0, 2);
}
