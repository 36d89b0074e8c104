// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end toggle scenarios on the six-shape scene.

use strata_core::controller::{Event, Outcome, ToggleController};
use strata_core::graph::{BufferPlanes, ForwardConfig, KindTag, NodeKind};
use strata_core::inspect::{KindCensus, classify, group_passes, overlay_reach_count, suppressors};
use strata_core::scene::{EntityId, Group, SceneModel};
use strata_core::strategy::{LayeredConfig, Mode};

fn controller() -> ToggleController {
    ToggleController::new(
        SceneModel::basic_shapes(),
        &ForwardConfig::default(),
        LayeredConfig::default(),
    )
    .unwrap()
}

fn ids(c: &ToggleController, names: &[&str]) -> Vec<EntityId> {
    names
        .iter()
        .map(|n| c.scene().find(n).unwrap().id())
        .collect()
}

#[test]
fn flat_mode_hides_a_group_without_touching_the_graph() {
    let mut c = controller();
    let frame = c.begin_frame().unwrap();
    assert_eq!(frame.views.len(), 1);
    let view = &frame.views[0];
    assert_eq!(view.clear.unwrap().planes, BufferPlanes::COLOR_DEPTH);
    assert_eq!(view.draws.len(), 6);

    let nodes = c.graph().reachable_count(c.root()).unwrap();
    let live = c.graph().live_count();

    let outcome = c
        .handle(Event::ToggleGroupVisibility {
            group: Group::Foreground,
            on: false,
        })
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);

    let frame = c.begin_frame().unwrap();
    let view = &frame.views[0];
    assert_eq!(view.draws.len(), 4);
    for id in ids(&c, &["torus", "cone"]) {
        assert!(!view.draws_entity(id));
        assert!(frame.scene_changes.hidden.contains(&id));
    }
    assert_eq!(c.graph().reachable_count(c.root()).unwrap(), nodes);
    assert_eq!(c.graph().live_count(), live);
    assert!(frame.graph_changes.is_empty());
}

#[test]
fn layered_mode_adds_three_group_passes() {
    let mut c = controller();
    let flat_anchors = c.anchors().unwrap();
    c.handle(Event::ToggleLayeredMode(true)).unwrap();
    assert_eq!(c.mode(), Mode::Layered);

    let graph = c.graph();
    let anchors = classify(graph, c.root()).unwrap();
    assert_eq!(anchors, flat_anchors);

    let under_culling: Vec<_> = graph.children(anchors.frustum_culling).unwrap().collect();
    assert_eq!(under_culling.len(), 3);
    for clear in &under_culling {
        assert_eq!(graph.kind(*clear).unwrap().tag(), KindTag::ClearBuffers);
        let filters: Vec<_> = graph.children(*clear).unwrap().collect();
        assert_eq!(filters.len(), 1);
        assert_eq!(graph.kind(filters[0]).unwrap().tag(), KindTag::LayerFilter);
    }

    let no_draws = suppressors(graph, &anchors).unwrap();
    assert_eq!(no_draws.len(), 1);
    assert_eq!(graph.parent(no_draws[0]).unwrap(), Some(anchors.clear_buffers));

    let passes = group_passes(graph, &anchors).unwrap();
    assert_eq!(
        graph.parent(anchors.debug_overlay).unwrap(),
        Some(passes[2].filter)
    );

    let census = KindCensus::of(graph, c.root()).unwrap();
    assert_eq!(census.count(KindTag::ClearBuffers), 4);
    assert_eq!(census.count(KindTag::LayerFilter), 3);
    assert_eq!(census.count(KindTag::NoDraw), 1);
}

#[test]
fn leaving_layered_mode_restores_the_flat_topology() {
    let mut c = controller();
    let initial = c.graph().subtree(c.root()).unwrap();
    let initial_anchors = c.anchors().unwrap();
    let initial_census = KindCensus::of(c.graph(), c.root()).unwrap();

    c.handle(Event::ToggleLayeredMode(true)).unwrap();
    let _ = c.begin_frame().unwrap();
    c.handle(Event::ToggleLayeredMode(false)).unwrap();

    assert_eq!(c.graph().subtree(c.root()).unwrap(), initial);
    assert_eq!(c.anchors().unwrap(), initial_anchors);
    assert_eq!(
        KindCensus::of(c.graph(), c.root()).unwrap(),
        initial_census
    );

    let frame = c.begin_frame().unwrap();
    assert_eq!(frame.graph_changes.released.len(), 7);
    assert_eq!(c.graph().live_count(), initial.len());
    assert_eq!(frame.views.len(), 1);
    assert_eq!(frame.views[0].draws.len(), 6);
}

#[test]
fn each_visible_shape_is_drawn_by_exactly_its_own_group_pass() {
    let mut c = controller();
    c.handle(Event::ToggleLayeredMode(true)).unwrap();
    let frame = c.begin_frame().unwrap();

    let anchors = c.anchors().unwrap();
    let passes = group_passes(c.graph(), &anchors).unwrap();
    let scene = c.scene();

    for (pass, group) in passes.iter().zip(Group::BACK_TO_FRONT) {
        let NodeKind::LayerFilter(filter) = c.graph().kind(pass.filter).unwrap() else {
            panic!("expected a layer filter");
        };
        for e in scene.entities().iter().filter(|e| e.is_drawable()) {
            let layers = scene.layers_of(e);
            let own = e.group() == Some(group);
            assert_eq!(filter.admits(layers.as_slice()), own, "{}", e.name());
        }
    }

    for e in scene.entities().iter().filter(|e| e.is_drawable()) {
        assert_eq!(frame.draw_count(e.id()), 1, "{}", e.name());
    }
}

#[test]
fn debug_overlay_is_reachable_once_in_both_modes() {
    let mut c = controller();
    assert_eq!(overlay_reach_count(c.graph(), c.root()).unwrap(), 1);
    c.handle(Event::ToggleLayeredMode(true)).unwrap();
    assert_eq!(overlay_reach_count(c.graph(), c.root()).unwrap(), 1);
    c.handle(Event::ToggleLayeredMode(false)).unwrap();
    assert_eq!(overlay_reach_count(c.graph(), c.root()).unwrap(), 1);
}

#[test]
fn repeated_mode_toggles_are_redundant() {
    let mut c = controller();
    assert_eq!(
        c.handle(Event::ToggleLayeredMode(false)).unwrap(),
        Outcome::Redundant
    );
    c.handle(Event::ToggleLayeredMode(true)).unwrap();
    let once = c.graph().subtree(c.root()).unwrap();
    assert_eq!(
        c.handle(Event::ToggleLayeredMode(true)).unwrap(),
        Outcome::Redundant
    );
    assert_eq!(c.graph().subtree(c.root()).unwrap(), once);
}

#[test]
fn group_visibility_persists_across_mode_switches() {
    let mut c = controller();
    c.handle(Event::ToggleGroupVisibility {
        group: Group::Background,
        on: false,
    })
    .unwrap();
    c.handle(Event::ToggleLayeredMode(true)).unwrap();
    let frame = c.begin_frame().unwrap();

    // NoDraw, background, middleground, foreground.
    assert!(frame.views[1].draws.is_empty());
    assert_eq!(frame.views[2].draws.len(), 2);
    assert_eq!(frame.views[3].draws.len(), 2);

    c.handle(Event::ToggleGroupVisibility {
        group: Group::Background,
        on: true,
    })
    .unwrap();
    let frame = c.begin_frame().unwrap();
    assert_eq!(frame.views[1].draws.len(), 2);
    assert_eq!(frame.scene_changes.shown.len(), 2);
}

#[test]
fn single_entity_toggle_matches_the_per_shape_checkbox() {
    let mut c = controller();
    let sphere = c.scene().find("sphere").unwrap().id();
    c.handle(Event::ToggleEntityVisibility {
        entity: sphere,
        on: false,
    })
    .unwrap();
    let frame = c.begin_frame().unwrap();
    assert_eq!(frame.draw_count(sphere), 0);
    assert_eq!(frame.views[0].draws.len(), 5);
    assert!(!c.scene().is_group_visible(Group::Background));
}
