// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame extraction: the backend's view of the graph.
//!
//! A backend never walks the [`FrameGraph`] itself. Once per frame the
//! controller crosses the frame boundary and calls [`extract`], which turns
//! every leaf into a [`RenderView`] carrying the accumulated state of its
//! ancestors and the entities it draws. The resulting [`Frame`] is owned data,
//! so it can be handed to a render thread and outlive later graph edits.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(controller: &mut ToggleController, consumer: &mut impl FrameConsumer) {
//!     // Releases retired subtrees, drains visibility changes, extracts views.
//!     let frame = controller.begin_frame()?;
//!     consumer.consume(&frame);
//! }
//! ```

use alloc::vec::Vec;

use kurbo::Rect;

use crate::error::Result;
use crate::graph::{ClearBuffers, FrameGraph, GraphChanges, LayerFilter, NodeId, NodeKind};
use crate::scene::{EntityId, EntityKind, SceneChanges, SceneModel};

/// Everything a backend needs to render one leaf of the frame graph.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderView {
    /// The leaf this view was extracted from.
    pub leaf: NodeId,
    /// Camera selected on the path, if any.
    pub camera: Option<EntityId>,
    /// Normalized viewport, composed from every viewport on the path.
    pub viewport: Rect,
    /// The nearest clear on the path.
    pub clear: Option<ClearBuffers>,
    /// Whether frustum culling applies.
    pub frustum_culling: bool,
    /// Layer filters on the path, outermost first.
    pub filters: Vec<LayerFilter>,
    /// Whether drawing is suppressed. A suppressed view still clears.
    pub no_draw: bool,
    /// Whether an enabled debug overlay is rendered after this view.
    pub debug_overlay: bool,
    /// Visible drawable entities that pass every filter.
    pub draws: Vec<EntityId>,
    /// Visible lights that pass every filter.
    pub lights: Vec<EntityId>,
}

impl RenderView {
    fn new(leaf: NodeId) -> Self {
        Self {
            leaf,
            camera: None,
            viewport: Rect::new(0.0, 0.0, 1.0, 1.0),
            clear: None,
            frustum_culling: false,
            filters: Vec::new(),
            no_draw: false,
            debug_overlay: false,
            draws: Vec::new(),
            lights: Vec::new(),
        }
    }

    fn apply(&mut self, kind: &NodeKind) {
        match kind {
            NodeKind::Root | NodeKind::RenderSurfaceSelector => {}
            NodeKind::Viewport(r) => self.viewport = compose_viewport(self.viewport, *r),
            NodeKind::CameraSelector(c) => self.camera = Some(*c),
            NodeKind::ClearBuffers(c) => self.clear = Some(*c),
            NodeKind::FrustumCulling => self.frustum_culling = true,
            NodeKind::LayerFilter(f) => self.filters.push(f.clone()),
            NodeKind::NoDraw => self.no_draw = true,
            NodeKind::DebugOverlay { enabled } => self.debug_overlay |= *enabled,
        }
    }

    /// Returns `true` if this view draws `entity`.
    #[must_use]
    pub fn draws_entity(&self, entity: EntityId) -> bool {
        self.draws.contains(&entity)
    }
}

/// Places the normalized rectangle `inner` inside the normalized rectangle
/// `outer`.
fn compose_viewport(outer: Rect, inner: Rect) -> Rect {
    let w = outer.width();
    let h = outer.height();
    Rect::new(
        outer.x0 + inner.x0 * w,
        outer.y0 + inner.y0 * h,
        outer.x0 + inner.x1 * w,
        outer.y0 + inner.y1 * h,
    )
}

/// Builds one [`RenderView`] per leaf under `root`, in pre-order.
pub fn extract(graph: &FrameGraph, root: NodeId, scene: &SceneModel) -> Result<Vec<RenderView>> {
    let mut views = Vec::new();
    for leaf in graph.leaves(root)? {
        let mut view = RenderView::new(leaf);
        for id in graph.path_to(leaf)? {
            view.apply(graph.kind(id)?);
        }
        if !view.no_draw {
            for e in scene.entities().iter().filter(|e| e.is_visible()) {
                let layers = scene.layers_of(e);
                if !view.filters.iter().all(|f| f.admits(layers.as_slice())) {
                    continue;
                }
                match e.kind() {
                    EntityKind::Shape(_) => view.draws.push(e.id()),
                    EntityKind::Light => view.lights.push(e.id()),
                    EntityKind::Camera(_) => {}
                }
            }
        }
        views.push(view);
    }
    Ok(views)
}

/// One extracted frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Monotonic frame counter, starting at 1.
    pub index: u64,
    /// Render views in traversal order.
    pub views: Vec<RenderView>,
    /// Graph changes since the previous frame.
    pub graph_changes: GraphChanges,
    /// Visibility changes since the previous frame.
    pub scene_changes: SceneChanges,
}

impl Frame {
    /// Number of views that draw `entity`.
    #[must_use]
    pub fn draw_count(&self, entity: EntityId) -> usize {
        self.views.iter().filter(|v| v.draws_entity(entity)).count()
    }

    /// Every entity drawn by at least one view, in first-drawn order.
    #[must_use]
    pub fn drawn_entities(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        for id in self.views.iter().flat_map(|v| v.draws.iter().copied()) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    /// Number of views that render the debug overlay.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.views.iter().filter(|v| v.debug_overlay).count()
    }
}

/// Consumes extracted frames.
///
/// Rendering backends implement this trait, as do test doubles.
pub trait FrameConsumer {
    /// Renders, records, or otherwise handles one frame.
    fn consume(&mut self, frame: &Frame);
}
