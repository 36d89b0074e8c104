// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The toggle controller.
//!
//! [`ToggleController`] is the only mutator of the rendering [`Mode`]. It
//! maps UI events to scene visibility changes and to strategy builds and
//! teardowns, and it owns the frame boundary.
//!
//! Every event is applied completely before `handle` returns, so a frame
//! extracted between two events always sees a topology with all four anchors
//! in place. Nodes a teardown removes stay reserved until the next
//! [`begin_frame`](ToggleController::begin_frame).

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Result, StrataError};
use crate::frame::{self, Frame};
use crate::graph::{ForwardConfig, FrameGraph, NodeId, NodeKind, forward_renderer};
use crate::inspect::{self, TopologyHandle};
use crate::scene::{EntityId, Group, SceneModel};
use crate::strategy::{EditSummary, LayeredConfig, LayeredStrategy, Mode, PipelineStrategy};
use crate::trace::{FrameBoundaryEvent, ModeSwitchEvent, Tracer, VisibilityEvent, VisibilityTarget};

/// An input from the UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Show or hide every entity of a group.
    ToggleGroupVisibility {
        /// The group.
        group: Group,
        /// The requested state.
        on: bool,
    },
    /// Show or hide a single entity.
    ToggleEntityVisibility {
        /// The entity.
        entity: EntityId,
        /// The requested state.
        on: bool,
    },
    /// Switch between the layered and the flat mode.
    ToggleLayeredMode(bool),
    /// Enable or disable the debug overlay.
    ShowDebugOverlay(bool),
}

/// What an event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The scene or the graph changed.
    Applied,
    /// The controller was already in the requested state; nothing changed.
    Redundant,
}

/// Owns the scene, the frame graph, and the mode.
#[derive(Debug)]
pub struct ToggleController {
    scene: SceneModel,
    graph: FrameGraph,
    root: NodeId,
    mode: Mode,
    strategies: Vec<Box<dyn PipelineStrategy + Send>>,
    frame_index: u64,
}

impl ToggleController {
    /// Builds a forward pipeline for `scene`'s camera and a controller in
    /// flat mode with the layered strategy registered.
    pub fn new(scene: SceneModel, forward: &ForwardConfig, layered: LayeredConfig) -> Result<Self> {
        let strategy = LayeredStrategy::new(layered)?;
        let (camera, _) = scene.camera().ok_or(StrataError::MalformedTopology {
            missing: inspect::AnchorRole::CameraSelector,
        })?;
        let mut graph = FrameGraph::new();
        let root = forward_renderer(&mut graph, camera, forward)?;
        let mut controller = Self::with_graph(scene, graph, root)?;
        controller.strategies = vec![Box::new(strategy)];
        Ok(controller)
    }

    /// Wraps an existing flat topology.
    ///
    /// Fails if the topology under `root` does not classify, and with
    /// [`StrataError::NonFlatTopology`] if it already carries group passes or
    /// draw suppressors.
    pub fn with_graph(scene: SceneModel, graph: FrameGraph, root: NodeId) -> Result<Self> {
        let anchors = inspect::classify(&graph, root)?;
        let group_passes = inspect::group_passes(&graph, &anchors)?.len();
        let suppressors = inspect::suppressors(&graph, &anchors)?.len();
        if group_passes > 0 || suppressors > 0 {
            log::warn!("refusing non-flat topology under {root:?}");
            return Err(StrataError::NonFlatTopology {
                group_passes,
                suppressors,
            });
        }
        log::debug!("controller anchors: {anchors:?}");
        Ok(Self {
            scene,
            graph,
            root,
            mode: Mode::Flat,
            strategies: vec![Box::new(LayeredStrategy::default())],
            frame_index: 0,
        })
    }

    /// Registers a strategy, replacing any strategy for the same mode.
    ///
    /// The replacement takes effect on the next switch into or out of that
    /// mode.
    pub fn register(&mut self, strategy: Box<dyn PipelineStrategy + Send>) {
        let mode = strategy.mode();
        if let Some(slot) = self.strategies.iter_mut().find(|s| s.mode() == mode) {
            *slot = strategy;
        } else {
            self.strategies.push(strategy);
        }
    }

    /// The current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    /// The frame graph.
    #[must_use]
    pub fn graph(&self) -> &FrameGraph {
        &self.graph
    }

    /// The root of the frame graph. Always alive.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Index of the last frame produced by [`begin_frame`](Self::begin_frame).
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Classifies the current topology.
    pub fn anchors(&self) -> Result<TopologyHandle> {
        inspect::classify(&self.graph, self.root)
    }

    /// Applies one event.
    pub fn handle(&mut self, event: Event) -> Result<Outcome> {
        self.handle_with(event, &mut Tracer::none())
    }

    /// Like [`handle`](Self::handle), reporting to `tracer`.
    pub fn handle_with(&mut self, event: Event, tracer: &mut Tracer<'_>) -> Result<Outcome> {
        no_dangling(self.apply(event, tracer))
    }

    fn apply(&mut self, event: Event, tracer: &mut Tracer<'_>) -> Result<Outcome> {
        match event {
            Event::ToggleGroupVisibility { group, on } => {
                let flipped = self.scene.set_visible(group, on);
                tracer.visibility(&VisibilityEvent {
                    target: VisibilityTarget::Group(group),
                    on,
                    flipped,
                });
                Ok(Self::outcome(flipped > 0, "group visibility"))
            }
            Event::ToggleEntityVisibility { entity, on } => {
                let flipped = self.scene.set_entity_visible(entity, on)?;
                tracer.visibility(&VisibilityEvent {
                    target: VisibilityTarget::Entity(entity),
                    on,
                    flipped: usize::from(flipped),
                });
                Ok(Self::outcome(flipped, "entity visibility"))
            }
            Event::ToggleLayeredMode(on) => {
                let target = if on { Mode::Layered } else { Mode::Flat };
                self.switch_mode(target, tracer)
            }
            Event::ShowDebugOverlay(on) => {
                let overlay = self.anchors()?.debug_overlay;
                let changed = !matches!(
                    self.graph.kind(overlay)?,
                    NodeKind::DebugOverlay { enabled } if *enabled == on
                );
                if changed {
                    self.graph
                        .set_kind(overlay, NodeKind::DebugOverlay { enabled: on })?;
                }
                tracer.visibility(&VisibilityEvent {
                    target: VisibilityTarget::DebugOverlay,
                    on,
                    flipped: usize::from(changed),
                });
                Ok(Self::outcome(changed, "debug overlay"))
            }
        }
    }

    /// Switches to `target`, tearing down the current strategy and building
    /// the new one.
    pub fn set_mode(&mut self, target: Mode) -> Result<Outcome> {
        self.set_mode_with(target, &mut Tracer::none())
    }

    /// Like [`set_mode`](Self::set_mode), reporting to `tracer`.
    pub fn set_mode_with(&mut self, target: Mode, tracer: &mut Tracer<'_>) -> Result<Outcome> {
        no_dangling(self.switch_mode(target, tracer))
    }

    fn switch_mode(&mut self, target: Mode, tracer: &mut Tracer<'_>) -> Result<Outcome> {
        let from = self.mode;
        if target == from {
            log::debug!("already in {target} mode");
            return Ok(Outcome::Redundant);
        }

        // Resolve both strategies before the first edit.
        let teardown = self.strategy_for(from)?;
        let build = self.strategy_for(target)?;
        let mut edits = EditSummary::default();

        if let Some(i) = teardown {
            let anchors = self.anchors()?;
            edits += self.strategies[i].teardown(&mut self.graph, &anchors)?;
            self.mode = Mode::Flat;
        }
        if let Some(i) = build {
            let anchors = self.anchors()?;
            edits += self.strategies[i].build(&mut self.graph, &anchors, &self.scene)?;
        }
        self.mode = target;

        log::info!(
            "switched from {from} to {target} mode ({} added, {} moved, {} retired)",
            edits.added,
            edits.moved,
            edits.retired
        );
        tracer.mode_switch(&ModeSwitchEvent {
            from,
            to: target,
            edits,
        });
        Ok(Outcome::Applied)
    }

    /// Crosses the frame boundary and extracts the next frame.
    ///
    /// Releases every subtree removed since the previous frame, in submission
    /// order, then drains visibility changes and extracts the render views.
    pub fn begin_frame(&mut self) -> Result<Frame> {
        self.begin_frame_with(&mut Tracer::none())
    }

    /// Like [`begin_frame`](Self::begin_frame), reporting to `tracer`.
    pub fn begin_frame_with(&mut self, tracer: &mut Tracer<'_>) -> Result<Frame> {
        no_dangling(self.next_frame(tracer))
    }

    fn next_frame(&mut self, tracer: &mut Tracer<'_>) -> Result<Frame> {
        self.frame_index += 1;
        let graph_changes = self.graph.evaluate();
        if !graph_changes.released.is_empty() {
            log::debug!(
                "frame {}: released {} nodes",
                self.frame_index,
                graph_changes.released.len()
            );
        }
        let scene_changes = self.scene.evaluate();
        let views = frame::extract(&self.graph, self.root, &self.scene)?;

        tracer.frame_boundary(&FrameBoundaryEvent {
            frame_index: self.frame_index,
            released: graph_changes.released.len(),
            restructured: graph_changes.restructured.len(),
            views: views.len(),
            shown: scene_changes.shown.len(),
            hidden: scene_changes.hidden.len(),
        });

        Ok(Frame {
            index: self.frame_index,
            views,
            graph_changes,
            scene_changes,
        })
    }

    /// Index of the strategy realizing `mode`, or `None` for flat mode.
    fn strategy_for(&self, mode: Mode) -> Result<Option<usize>> {
        if mode == Mode::Flat {
            return Ok(None);
        }
        self.strategies
            .iter()
            .position(|s| s.mode() == mode)
            .map(Some)
            .ok_or(StrataError::NoStrategy(mode))
    }

    fn outcome(changed: bool, what: &str) -> Outcome {
        if changed {
            Outcome::Applied
        } else {
            log::debug!("redundant {what} toggle");
            Outcome::Redundant
        }
    }
}

/// The controller classifies afresh before every edit and never keeps a
/// handle across a frame boundary, so a dangling reference reaching it is a
/// bug. Debug builds stop there; release builds return the error.
fn no_dangling<T>(result: Result<T>) -> Result<T> {
    debug_assert!(
        !matches!(result, Err(StrataError::DanglingReference(_))),
        "dangling frame graph reference reached the controller"
    );
    result
}
