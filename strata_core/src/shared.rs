// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-thread handoff between a UI thread and a render loop.
//!
//! [`SharedController::split`] yields a cloneable [`ToggleSender`] for event
//! producers and a single [`FrameSource`] for the render loop. Events are
//! applied under a lock as they arrive: moves take effect at once, and
//! removals are only queued. The render loop's
//! [`next_frame`](FrameSource::next_frame) is the one place releases happen,
//! so they are drained exactly once per frame, in submission order.
//!
//! The render thread receives owned [`Frame`] snapshots and never holds a
//! reference into the graph between frames.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::controller::{Event, Outcome, ToggleController};
use crate::error::{Result, StrataError};
use crate::frame::Frame;
use crate::strategy::Mode;
use crate::trace::Tracer;

/// A [`ToggleController`] shared between threads.
#[derive(Debug)]
pub struct SharedController {
    inner: Arc<Mutex<ToggleController>>,
}

impl SharedController {
    /// Wraps a controller.
    #[must_use]
    pub fn new(controller: ToggleController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Splits into the UI half and the render half.
    #[must_use]
    pub fn split(self) -> (ToggleSender, FrameSource) {
        (
            ToggleSender {
                inner: Arc::clone(&self.inner),
            },
            FrameSource { inner: self.inner },
        )
    }
}

fn lock(inner: &Mutex<ToggleController>) -> Result<MutexGuard<'_, ToggleController>> {
    inner.lock().map_err(|_| {
        log::error!("controller lock poisoned");
        StrataError::Poisoned
    })
}

/// The event-producing half. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ToggleSender {
    inner: Arc<Mutex<ToggleController>>,
}

impl ToggleSender {
    /// Applies an event.
    pub fn send(&self, event: Event) -> Result<Outcome> {
        lock(&self.inner)?.handle(event)
    }

    /// The controller's current mode.
    pub fn mode(&self) -> Result<Mode> {
        Ok(lock(&self.inner)?.mode())
    }

    /// Runs `f` against the controller under the lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&ToggleController) -> R) -> Result<R> {
        let guard = lock(&self.inner)?;
        Ok(f(&*guard))
    }
}

/// The render-loop half. Not cloneable: there is exactly one frame boundary.
#[derive(Debug)]
pub struct FrameSource {
    inner: Arc<Mutex<ToggleController>>,
}

impl FrameSource {
    /// Crosses the frame boundary and returns the extracted frame.
    pub fn next_frame(&mut self) -> Result<Frame> {
        self.next_frame_with(&mut Tracer::none())
    }

    /// Like [`next_frame`](Self::next_frame), reporting to `tracer`.
    pub fn next_frame_with(&mut self, tracer: &mut Tracer<'_>) -> Result<Frame> {
        lock(&self.inner)?.begin_frame_with(tracer)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::graph::ForwardConfig;
    use crate::scene::{Group, SceneModel};
    use crate::strategy::LayeredConfig;

    fn shared() -> SharedController {
        SharedController::new(
            ToggleController::new(
                SceneModel::basic_shapes(),
                &ForwardConfig::default(),
                LayeredConfig::default(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn sender_and_source_share_state() {
        let (tx, mut frames) = shared().split();
        tx.send(Event::ToggleLayeredMode(true)).unwrap();
        assert_eq!(tx.mode().unwrap(), Mode::Layered);

        let frame = frames.next_frame().unwrap();
        assert_eq!(frame.views.len(), 4);
        assert_eq!(tx.inspect(|c| c.frame_index()).unwrap(), 1);
    }

    #[test]
    fn sender_works_from_another_thread() {
        let (tx, mut frames) = shared().split();
        let ui = {
            let tx = tx.clone();
            thread::spawn(move || {
                tx.send(Event::ToggleGroupVisibility {
                    group: Group::Background,
                    on: false,
                })
            })
        };
        assert_eq!(ui.join().unwrap().unwrap(), Outcome::Applied);

        let frame = frames.next_frame().unwrap();
        assert_eq!(frame.scene_changes.hidden.len(), 2);
        assert_eq!(frame.views[0].draws.len(), 4);
    }
}
