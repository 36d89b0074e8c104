// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layered strategy: one depth-cleared, filtered sub-pass per group.
//!
//! Starting from the forward chain, [`LayeredStrategy::build`] produces:
//!
//! ```text
//! CameraSelector
//! ├─ ClearBuffers (colour + depth)
//! │  └─ NoDraw
//! └─ FrustumCulling
//!    ├─ ClearBuffers (depth + stencil)
//!    │  └─ LayerFilter (discard middleground, foreground)
//!    ├─ ClearBuffers (depth + stencil)
//!    │  └─ LayerFilter (discard background, foreground)
//!    └─ ClearBuffers (depth + stencil)
//!       └─ LayerFilter (discard background, middleground)
//!          └─ DebugOverlay
//! ```
//!
//! The main clear keeps running through its `NoDraw` leaf, so the colour
//! plane is reset once per frame, before any group is drawn. Frustum culling
//! sits beside it under the camera selector rather than beneath it, because
//! every leaf under a clear re-runs that clear.

use alloc::vec::Vec;

use super::{EditSummary, Mode, PipelineStrategy};
use crate::error::{Result, StrataError};
use crate::graph::{
    BufferPlanes, ClearBuffers, ClearColor, FilterMode, FrameGraph, LayerFilter, NodeKind,
};
use crate::inspect::{TopologyHandle, group_passes, suppressors};
use crate::scene::{Group, SceneModel};

/// Configuration for [`LayeredStrategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayeredConfig {
    /// Sub-pass order, first drawn first.
    pub order: [Group; 3],
    /// Planes cleared at the start of every sub-pass.
    pub sub_pass_planes: BufferPlanes,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            order: Group::BACK_TO_FRONT,
            sub_pass_planes: BufferPlanes::DEPTH_STENCIL,
        }
    }
}

impl LayeredConfig {
    /// Checks that every group gets exactly one sub-pass and that no sub-pass
    /// clears colour.
    pub fn validate(&self) -> Result<()> {
        if self.sub_pass_planes.color {
            return Err(StrataError::ColorClearInSubPass);
        }
        for (i, group) in self.order.iter().enumerate() {
            if self.order[..i].contains(group) {
                return Err(StrataError::RepeatedGroupPass(*group));
            }
        }
        Ok(())
    }
}

/// Splits drawing into one sub-pass per group.
#[derive(Clone, Debug, Default)]
pub struct LayeredStrategy {
    config: LayeredConfig,
}

impl LayeredStrategy {
    /// Creates the strategy, rejecting invalid configurations.
    pub fn new(config: LayeredConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The strategy's configuration.
    #[must_use]
    pub const fn config(&self) -> &LayeredConfig {
        &self.config
    }

    /// The filter for `group`'s sub-pass: discard anything tagged with one of
    /// the other two groups' layers, so untagged entities pass in every
    /// sub-pass.
    fn filter_for(group: Group, scene: &SceneModel) -> LayerFilter {
        let layers: Vec<_> = group
            .others()
            .iter()
            .map(|g| scene.layer_for(*g).id())
            .collect();
        LayerFilter::new(layers, FilterMode::DiscardAnyMatchingLayers)
    }
}

impl PipelineStrategy for LayeredStrategy {
    fn mode(&self) -> Mode {
        Mode::Layered
    }

    fn build(
        &self,
        graph: &mut FrameGraph,
        anchors: &TopologyHandle,
        scene: &SceneModel,
    ) -> Result<EditSummary> {
        anchors.validate(graph)?;
        if !group_passes(graph, anchors)?.is_empty() || !suppressors(graph, anchors)?.is_empty() {
            log::debug!("layered stages already present");
            return Ok(EditSummary::default());
        }

        // Both moves are checked up front so a rejected build leaves the
        // graph untouched.
        let TopologyHandle {
            camera_selector,
            clear_buffers,
            frustum_culling,
            debug_overlay,
        } = *anchors;
        if graph.is_in_subtree(camera_selector, frustum_culling)? {
            return Err(StrataError::WouldCycle {
                node: frustum_culling,
                new_parent: camera_selector,
            });
        }
        if graph.is_in_subtree(frustum_culling, debug_overlay)? {
            return Err(StrataError::WouldCycle {
                node: debug_overlay,
                new_parent: frustum_culling,
            });
        }

        let mut summary = EditSummary::default();

        let no_draw = graph.create_node(NodeKind::NoDraw);
        graph.append_child(clear_buffers, no_draw)?;
        summary.added += 1;

        graph.reparent(frustum_culling, camera_selector)?;
        summary.moved += 1;

        let mut last_filter = None;
        for group in self.config.order {
            let clear = graph.create_node(NodeKind::ClearBuffers(ClearBuffers {
                planes: self.config.sub_pass_planes,
                color: ClearColor::default(),
            }));
            graph.append_child(frustum_culling, clear)?;
            let filter = graph.create_node(NodeKind::LayerFilter(Self::filter_for(group, scene)));
            graph.append_child(clear, filter)?;
            summary.added += 2;
            last_filter = Some(filter);
        }

        // The overlay draws once, after the last group.
        if let Some(filter) = last_filter {
            graph.reparent(debug_overlay, filter)?;
            summary.moved += 1;
        }

        Ok(summary)
    }

    fn teardown(&self, graph: &mut FrameGraph, anchors: &TopologyHandle) -> Result<EditSummary> {
        anchors.validate(graph)?;
        let TopologyHandle {
            clear_buffers,
            frustum_culling,
            debug_overlay,
            ..
        } = *anchors;
        if graph.is_in_subtree(clear_buffers, frustum_culling)? {
            return Err(StrataError::WouldCycle {
                node: frustum_culling,
                new_parent: clear_buffers,
            });
        }
        if graph.is_in_subtree(frustum_culling, debug_overlay)? {
            return Err(StrataError::WouldCycle {
                node: debug_overlay,
                new_parent: frustum_culling,
            });
        }

        let passes = group_passes(graph, anchors)?;
        let no_draws = suppressors(graph, anchors)?;
        let mut summary = EditSummary::default();

        if graph.parent(frustum_culling)? != Some(clear_buffers) {
            graph.reparent(frustum_culling, clear_buffers)?;
            summary.moved += 1;
        }
        if graph.parent(debug_overlay)? != Some(frustum_culling) {
            graph.reparent(debug_overlay, frustum_culling)?;
            summary.moved += 1;
        }

        for id in no_draws {
            summary.retired += graph.reachable_count(id)?;
            graph.remove_subtree(id)?;
        }
        for pass in passes {
            summary.retired += graph.reachable_count(pass.clear)?;
            graph.remove_subtree(pass.clear)?;
        }

        Ok(summary)
    }
}
