// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a controller's scene and frame graph.

use serde_json::{Value, json};

use strata_core::Result;
use strata_core::controller::ToggleController;
use strata_core::graph::{FrameGraph, NodeId, NodeKind};
use strata_core::scene::{EntityKind, SceneModel};

use crate::dump::{layer_name, mode_name, plane_names};

/// Captures the mode, the scene, and the frame graph as one JSON value.
pub fn snapshot_json(controller: &ToggleController) -> Result<Value> {
    let scene = controller.scene();
    let entities: Vec<Value> = scene
        .entities()
        .iter()
        .map(|e| {
            let kind = match e.kind() {
                EntityKind::Shape(s) => format!("{s:?}").to_lowercase(),
                EntityKind::Light => "light".to_owned(),
                EntityKind::Camera(_) => "camera".to_owned(),
            };
            json!({
                "id": e.id().index(),
                "name": e.name(),
                "kind": kind,
                "group": e.group().map(|g| g.name()),
                "visible": e.is_visible(),
            })
        })
        .collect();

    Ok(json!({
        "frame": controller.frame_index(),
        "mode": controller.mode().name(),
        "entities": entities,
        "graph": graph_json(controller.graph(), controller.root(), scene)?,
    }))
}

/// Captures the tree under `root` as nested JSON objects.
pub fn graph_json(graph: &FrameGraph, root: NodeId, scene: &SceneModel) -> Result<Value> {
    let kind = graph.kind(root)?;
    let mut node = json!({
        "id": root.index(),
        "generation": root.generation(),
        "kind": kind.tag().name(),
    });
    match kind {
        NodeKind::Viewport(r) => node["rect"] = json!([r.x0, r.y0, r.x1, r.y1]),
        NodeKind::CameraSelector(id) => node["camera"] = json!(id.index()),
        NodeKind::ClearBuffers(c) => {
            node["planes"] = json!(plane_names(c.planes));
            node["color"] = json!(format!("#{:06x}", c.color.to_rgb()));
        }
        NodeKind::LayerFilter(f) => {
            node["mode"] = json!(mode_name(f.mode));
            node["layers"] = f
                .layers
                .iter()
                .map(|l| Value::from(layer_name(*l, scene)))
                .collect();
        }
        NodeKind::DebugOverlay { enabled } => node["enabled"] = json!(enabled),
        NodeKind::Root
        | NodeKind::RenderSurfaceSelector
        | NodeKind::FrustumCulling
        | NodeKind::NoDraw => {}
    }

    let children = graph
        .children(root)?
        .map(|c| graph_json(graph, c, scene))
        .collect::<Result<Vec<_>>>()?;
    if !children.is_empty() {
        node["children"] = Value::Array(children);
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::controller::Event;
    use strata_core::graph::ForwardConfig;
    use strata_core::scene::Group;
    use strata_core::strategy::LayeredConfig;

    #[test]
    fn snapshot_reflects_mode_and_visibility() {
        let mut c = ToggleController::new(
            SceneModel::basic_shapes(),
            &ForwardConfig::default(),
            LayeredConfig::default(),
        )
        .unwrap();
        c.handle(Event::ToggleGroupVisibility {
            group: Group::Foreground,
            on: false,
        })
        .unwrap();
        c.handle(Event::ToggleLayeredMode(true)).unwrap();

        let snap = snapshot_json(&c).unwrap();
        assert_eq!(snap["mode"], "layered");

        let torus = snap["entities"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["name"] == "torus")
            .unwrap();
        assert_eq!(torus["group"], "foreground");
        assert_eq!(torus["visible"], false);
        assert_eq!(torus["kind"], "torus");

        let camera_selector = &snap["graph"]["children"][0]["children"][0]["children"][0];
        assert_eq!(camera_selector["kind"], "CameraSelector");
        let under_camera = camera_selector["children"].as_array().unwrap();
        assert_eq!(under_camera.len(), 2);
        assert_eq!(under_camera[0]["kind"], "ClearBuffers");
        assert_eq!(under_camera[0]["color"], "#4d4d4f");
        assert_eq!(under_camera[1]["kind"], "FrustumCulling");
        assert_eq!(under_camera[1]["children"].as_array().unwrap().len(), 3);
    }
}
