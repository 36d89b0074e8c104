// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage kinds and their payloads.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::scene::{EntityId, LayerId};

/// Which planes of the render target a [`ClearBuffers`] stage resets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferPlanes {
    /// Clear the colour plane.
    pub color: bool,
    /// Clear the depth plane.
    pub depth: bool,
    /// Clear the stencil plane.
    pub stencil: bool,
}

impl BufferPlanes {
    /// Clear nothing.
    pub const NONE: Self = Self {
        color: false,
        depth: false,
        stencil: false,
    };

    /// Colour and depth, the forward renderer's frame clear.
    pub const COLOR_DEPTH: Self = Self {
        color: true,
        depth: true,
        stencil: false,
    };

    /// Depth and stencil only, used between group sub-passes.
    pub const DEPTH_STENCIL: Self = Self {
        color: false,
        depth: true,
        stencil: true,
    };

    /// Every plane.
    pub const ALL: Self = Self {
        color: true,
        depth: true,
        stencil: true,
    };
}

/// An opaque RGB clear colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClearColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl ClearColor {
    /// Builds a colour from a `0xRRGGBB` value.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each channel is masked to 8 bits first"
    )]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Returns the colour as `0xRRGGBB`.
    #[must_use]
    pub const fn to_rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Payload of a clear stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClearBuffers {
    /// Planes to reset.
    pub planes: BufferPlanes,
    /// Colour written when `planes.color` is set.
    pub color: ClearColor,
}

/// How a [`LayerFilter`] matches an entity's layers against its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Keep entities tagged with at least one of the filter's layers.
    #[default]
    AcceptAnyMatchingLayers,
    /// Keep entities tagged with every one of the filter's layers.
    AcceptAllMatchingLayers,
    /// Drop entities tagged with at least one of the filter's layers.
    DiscardAnyMatchingLayers,
    /// Drop entities tagged with every one of the filter's layers.
    DiscardAllMatchingLayers,
}

/// Payload of a layer filter stage.
///
/// The filter refers to layers by id; the layers stay owned by the scene.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFilter {
    /// Layers matched against.
    pub layers: Vec<LayerId>,
    /// Match rule.
    pub mode: FilterMode,
}

impl LayerFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(layers: Vec<LayerId>, mode: FilterMode) -> Self {
        Self { layers, mode }
    }

    /// Returns `true` if an entity tagged with `entity_layers` passes.
    ///
    /// A filter with no layers is inert and passes everything.
    #[must_use]
    pub fn admits(&self, entity_layers: &[LayerId]) -> bool {
        if self.layers.is_empty() {
            return true;
        }
        let tagged = |l: &LayerId| entity_layers.contains(l);
        match self.mode {
            FilterMode::AcceptAnyMatchingLayers => self.layers.iter().any(tagged),
            FilterMode::AcceptAllMatchingLayers => self.layers.iter().all(tagged),
            FilterMode::DiscardAnyMatchingLayers => !self.layers.iter().any(tagged),
            FilterMode::DiscardAllMatchingLayers => !self.layers.iter().all(tagged),
        }
    }
}

/// A pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The top of the graph.
    Root,
    /// Selects the surface the frame is presented to.
    RenderSurfaceSelector,
    /// Normalised sub-rectangle of the surface.
    Viewport(Rect),
    /// Selects the camera for everything below.
    CameraSelector(EntityId),
    /// Resets render-target planes.
    ClearBuffers(ClearBuffers),
    /// Discards geometry outside the camera frustum.
    FrustumCulling,
    /// Includes or excludes geometry by layer.
    LayerFilter(LayerFilter),
    /// Suppresses drawing for the branch while keeping its other state
    /// (a clear above a `NoDraw` leaf still runs).
    NoDraw,
    /// Renders the debug overlay after the branch's geometry.
    DebugOverlay {
        /// Whether the overlay is shown.
        enabled: bool,
    },
}

impl NodeKind {
    /// The payload-free tag of this kind.
    #[must_use]
    pub const fn tag(&self) -> KindTag {
        match self {
            Self::Root => KindTag::Root,
            Self::RenderSurfaceSelector => KindTag::RenderSurfaceSelector,
            Self::Viewport(_) => KindTag::Viewport,
            Self::CameraSelector(_) => KindTag::CameraSelector,
            Self::ClearBuffers(_) => KindTag::ClearBuffers,
            Self::FrustumCulling => KindTag::FrustumCulling,
            Self::LayerFilter(_) => KindTag::LayerFilter,
            Self::NoDraw => KindTag::NoDraw,
            Self::DebugOverlay { .. } => KindTag::DebugOverlay,
        }
    }
}

/// Payload-free discriminant of [`NodeKind`], for counting and matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KindTag {
    /// [`NodeKind::Root`].
    Root,
    /// [`NodeKind::RenderSurfaceSelector`].
    RenderSurfaceSelector,
    /// [`NodeKind::Viewport`].
    Viewport,
    /// [`NodeKind::CameraSelector`].
    CameraSelector,
    /// [`NodeKind::ClearBuffers`].
    ClearBuffers,
    /// [`NodeKind::FrustumCulling`].
    FrustumCulling,
    /// [`NodeKind::LayerFilter`].
    LayerFilter,
    /// [`NodeKind::NoDraw`].
    NoDraw,
    /// [`NodeKind::DebugOverlay`].
    DebugOverlay,
}

impl KindTag {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Root,
        Self::RenderSurfaceSelector,
        Self::Viewport,
        Self::CameraSelector,
        Self::ClearBuffers,
        Self::FrustumCulling,
        Self::LayerFilter,
        Self::NoDraw,
        Self::DebugOverlay,
    ];

    /// Stage name as shown in dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::RenderSurfaceSelector => "RenderSurfaceSelector",
            Self::Viewport => "Viewport",
            Self::CameraSelector => "CameraSelector",
            Self::ClearBuffers => "ClearBuffers",
            Self::FrustumCulling => "FrustumCulling",
            Self::LayerFilter => "LayerFilter",
            Self::NoDraw => "NoDraw",
            Self::DebugOverlay => "DebugOverlay",
        }
    }
}
