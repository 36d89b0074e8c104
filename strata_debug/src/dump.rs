// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented text dumps of a frame graph.
//!
//! ```text
//! Root #0
//! └─ RenderSurfaceSelector #1
//!    └─ Viewport (0, 0)-(1, 1) #2
//!       └─ CameraSelector camera #3
//!          └─ ClearBuffers colour+depth #4d4d4f #4
//!             └─ FrustumCulling #5
//!                └─ DebugOverlay off #6
//! ```

use std::fmt::Write;

use strata_core::Result;
use strata_core::graph::{BufferPlanes, FilterMode, FrameGraph, NodeId, NodeKind};
use strata_core::scene::{LayerId, SceneModel};

/// Renders the tree under `root`, one node per line.
pub fn dump_tree(graph: &FrameGraph, root: NodeId, scene: &SceneModel) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "{} #{}", describe(graph.kind(root)?, scene), root.index());
    dump_children(graph, root, scene, "", &mut out)?;
    Ok(out)
}

fn dump_children(
    graph: &FrameGraph,
    node: NodeId,
    scene: &SceneModel,
    indent: &str,
    out: &mut String,
) -> Result<()> {
    let children: Vec<_> = graph.children(node)?.collect();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, next) = if last { ("└─ ", "   ") } else { ("├─ ", "│  ") };
        let _ = writeln!(
            out,
            "{indent}{branch}{} #{}",
            describe(graph.kind(*child)?, scene),
            child.index()
        );
        dump_children(graph, *child, scene, &format!("{indent}{next}"), out)?;
    }
    Ok(())
}

/// One-line description of a stage and its payload.
pub(crate) fn describe(kind: &NodeKind, scene: &SceneModel) -> String {
    let name = kind.tag().name();
    match kind {
        NodeKind::Root
        | NodeKind::RenderSurfaceSelector
        | NodeKind::FrustumCulling
        | NodeKind::NoDraw => name.to_owned(),
        NodeKind::Viewport(r) => format!("{name} ({}, {})-({}, {})", r.x0, r.y0, r.x1, r.y1),
        NodeKind::CameraSelector(id) => {
            let camera = scene.entity(*id).map_or("?", |e| e.name());
            format!("{name} {camera}")
        }
        NodeKind::ClearBuffers(c) => {
            let planes = plane_names(c.planes);
            if c.planes.color {
                format!("{name} {planes} #{:06x}", c.color.to_rgb())
            } else {
                format!("{name} {planes}")
            }
        }
        NodeKind::LayerFilter(f) => {
            let layers: Vec<_> = f.layers.iter().map(|l| layer_name(*l, scene)).collect();
            format!("{name} {} [{}]", mode_name(f.mode), layers.join(", "))
        }
        NodeKind::DebugOverlay { enabled } => {
            format!("{name} {}", if *enabled { "on" } else { "off" })
        }
    }
}

pub(crate) fn plane_names(planes: BufferPlanes) -> String {
    let names: Vec<_> = [
        (planes.color, "colour"),
        (planes.depth, "depth"),
        (planes.stencil, "stencil"),
    ]
    .into_iter()
    .filter_map(|(set, n)| set.then_some(n))
    .collect();
    if names.is_empty() {
        "none".to_owned()
    } else {
        names.join("+")
    }
}

pub(crate) fn mode_name(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::AcceptAnyMatchingLayers => "accept-any",
        FilterMode::AcceptAllMatchingLayers => "accept-all",
        FilterMode::DiscardAnyMatchingLayers => "discard-any",
        FilterMode::DiscardAllMatchingLayers => "discard-all",
    }
}

pub(crate) fn layer_name(id: LayerId, scene: &SceneModel) -> String {
    scene
        .layers()
        .iter()
        .find(|l| l.id() == id)
        .map_or_else(|| format!("layer {}", id.index()), |l| l.group().name().to_owned())
}
