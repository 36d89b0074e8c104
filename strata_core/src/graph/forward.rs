// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The default single-pass forward pipeline.

use kurbo::Rect;

use super::id::NodeId;
use super::node::{BufferPlanes, ClearBuffers, ClearColor, NodeKind};
use super::store::FrameGraph;
use crate::error::Result;
use crate::scene::EntityId;

/// Parameters of the forward pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForwardConfig {
    /// Background colour written by the main clear.
    pub clear_color: ClearColor,
    /// Planes cleared once per frame before anything is drawn.
    pub clear_planes: BufferPlanes,
    /// Normalized viewport rectangle.
    pub viewport: Rect,
    /// Initial state of the debug overlay.
    pub show_debug_overlay: bool,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            clear_color: ClearColor::from_rgb(0x4d_4d_4f),
            clear_planes: BufferPlanes::COLOR_DEPTH,
            viewport: Rect::new(0.0, 0.0, 1.0, 1.0),
            show_debug_overlay: false,
        }
    }
}

/// Builds the forward pipeline and returns its root.
///
/// The result is a single chain, so it has exactly one leaf:
///
/// ```text
/// Root
/// └─ RenderSurfaceSelector
///    └─ Viewport
///       └─ CameraSelector
///          └─ ClearBuffers
///             └─ FrustumCulling
///                └─ DebugOverlay
/// ```
pub fn forward_renderer(
    graph: &mut FrameGraph,
    camera: EntityId,
    config: &ForwardConfig,
) -> Result<NodeId> {
    let root = graph.create_node(NodeKind::Root);
    let chain = [
        NodeKind::RenderSurfaceSelector,
        NodeKind::Viewport(config.viewport),
        NodeKind::CameraSelector(camera),
        NodeKind::ClearBuffers(ClearBuffers {
            planes: config.clear_planes,
            color: config.clear_color,
        }),
        NodeKind::FrustumCulling,
        NodeKind::DebugOverlay {
            enabled: config.show_debug_overlay,
        },
    ];

    let mut tail = root;
    for kind in chain {
        let node = graph.create_node(kind);
        graph.append_child(tail, node)?;
        tail = node;
    }
    log::debug!("built forward pipeline at {root:?}");
    Ok(root)
}
