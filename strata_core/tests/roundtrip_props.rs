// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Round-trip and idempotence laws over random toggle sequences.

use proptest::prelude::*;
use strata_core::controller::{Event, ToggleController};
use strata_core::graph::ForwardConfig;
use strata_core::inspect::{classify, group_passes, overlay_reach_count};
use strata_core::scene::{Group, SceneModel};
use strata_core::strategy::{LayeredConfig, Mode};

#[derive(Clone, Debug)]
enum Step {
    Event(Event),
    EntityToggle(usize, bool),
    Frame,
}

fn group() -> impl Strategy<Value = Group> {
    prop_oneof![
        Just(Group::Background),
        Just(Group::Middleground),
        Just(Group::Foreground),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<bool>().prop_map(|on| Step::Event(Event::ToggleLayeredMode(on))),
        (group(), any::<bool>())
            .prop_map(|(group, on)| Step::Event(Event::ToggleGroupVisibility { group, on })),
        any::<bool>().prop_map(|on| Step::Event(Event::ShowDebugOverlay(on))),
        (0..6_usize, any::<bool>()).prop_map(|(i, on)| Step::EntityToggle(i, on)),
        Just(Step::Frame),
    ]
}

fn controller() -> ToggleController {
    ToggleController::new(
        SceneModel::basic_shapes(),
        &ForwardConfig::default(),
        LayeredConfig::default(),
    )
    .unwrap()
}

fn apply(c: &mut ToggleController, step: &Step) {
    match step {
        Step::Event(e) => {
            c.handle(*e).unwrap();
        }
        Step::EntityToggle(i, on) => {
            let id = c.scene().entities()[*i].id();
            c.handle(Event::ToggleEntityVisibility { entity: id, on: *on })
                .unwrap();
        }
        Step::Frame => {
            let _ = c.begin_frame().unwrap();
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_step(steps in prop::collection::vec(step(), 1..40)) {
        let mut c = controller();
        for s in &steps {
            apply(&mut c, s);

            let anchors = classify(c.graph(), c.root()).unwrap();
            let passes = group_passes(c.graph(), &anchors).unwrap();
            let expected = if c.mode() == Mode::Layered { 3 } else { 0 };
            prop_assert_eq!(passes.len(), expected);
            prop_assert_eq!(overlay_reach_count(c.graph(), c.root()).unwrap(), 1);
        }

        // Every visible shape is drawn exactly once, hidden ones never.
        let frame = c.begin_frame().unwrap();
        for e in c.scene().entities().iter().filter(|e| e.is_drawable()) {
            let expected = usize::from(e.is_visible());
            prop_assert_eq!(frame.draw_count(e.id()), expected);
        }
    }

    #[test]
    fn returning_to_flat_restores_the_initial_graph(steps in prop::collection::vec(step(), 0..40)) {
        let mut c = controller();
        let initial = c.graph().subtree(c.root()).unwrap();
        for s in &steps {
            apply(&mut c, s);
        }
        c.handle(Event::ToggleLayeredMode(false)).unwrap();
        prop_assert_eq!(c.graph().subtree(c.root()).unwrap(), initial.clone());

        let _ = c.begin_frame().unwrap();
        prop_assert_eq!(c.graph().live_count(), initial.len());
    }

    #[test]
    fn repeated_toggles_match_a_single_toggle(on in any::<bool>(), repeats in 1..5_usize) {
        let mut once = controller();
        once.handle(Event::ToggleLayeredMode(on)).unwrap();

        let mut many = controller();
        for _ in 0..repeats {
            many.handle(Event::ToggleLayeredMode(on)).unwrap();
        }

        let a: Vec<_> = once
            .graph()
            .subtree(once.root())
            .unwrap()
            .into_iter()
            .map(|id| once.graph().kind(id).unwrap().clone())
            .collect();
        let b: Vec<_> = many
            .graph()
            .subtree(many.root())
            .unwrap()
            .into_iter()
            .map(|id| many.graph().kind(id).unwrap().clone())
            .collect();
        prop_assert_eq!(a, b);
    }
}
