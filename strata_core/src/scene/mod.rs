// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene data model.
//!
//! A scene is a flat set of [`Entity`] values created once by a
//! [`SceneBuilder`]. Each drawable entity belongs to exactly one [`Group`];
//! each group owns exactly one recursive [`Layer`], which is what the frame
//! graph's layer filters match against. Lights and the camera are ungrouped
//! and therefore pass every filter that discards by layer.
//!
//! Visibility is the only mutable entity state. Flips are recorded on the
//! [`VISIBILITY`](crate::dirty::VISIBILITY) channel and reported once per
//! frame by [`SceneModel::evaluate`].

mod camera;
mod id;
mod model;

pub use camera::{Camera, PerspectiveLens};
pub use id::{EntityId, LayerId};
pub use model::{
    Entity, EntityKind, Group, Layer, SceneBuilder, SceneChanges, SceneModel, ShapeKind,
};
