// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted session over the six-shape scene.
//!
//! Replays the toggles a user would click (group visibility, layered mode,
//! debug overlay), printing the frame graph after each one. Every event goes
//! to both a [`PrettyPrintSink`] and a [`RecorderSink`]; the recording is
//! exported as a Chrome trace at the end. A second phase hands the
//! controller to a render thread and keeps toggling from the main thread.
//!
//! Set `RUST_LOG=debug` to see graph edits as they happen.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::thread;

use strata_core::controller::{Event, ToggleController};
use strata_core::frame::{Frame, FrameConsumer};
use strata_core::graph::ForwardConfig;
use strata_core::scene::{Group, SceneModel};
use strata_core::shared::SharedController;
use strata_core::strategy::LayeredConfig;
use strata_core::trace::{FrameBoundaryEvent, ModeSwitchEvent, TraceSink, Tracer, VisibilityEvent};

use strata_debug::dump::dump_tree;
use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;

/// 60 Hz, in microseconds.
const FRAME_US: f64 = 16_666.7;
const RENDER_FRAMES: u64 = 120;

/// Forwards every event to both sinks.
#[derive(Debug)]
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_mode_switch(&mut self, e: &ModeSwitchEvent) {
        self.pretty.on_mode_switch(e);
        self.recorder.on_mode_switch(e);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.pretty.on_visibility(e);
        self.recorder.on_visibility(e);
    }

    fn on_frame_boundary(&mut self, e: &FrameBoundaryEvent) {
        self.pretty.on_frame_boundary(e);
        self.recorder.on_frame_boundary(e);
    }
}

/// Stands in for a GPU backend: counts what it would have drawn.
#[derive(Debug, Default)]
struct Tally {
    frames: u64,
    views: usize,
    draws: usize,
    overlays: usize,
}

impl FrameConsumer for Tally {
    fn consume(&mut self, frame: &Frame) {
        self.frames += 1;
        self.views += frame.views.len();
        self.draws += frame.views.iter().map(|v| v.draws.len()).sum::<usize>();
        self.overlays += frame.overlay_count();
    }
}

fn script() -> Vec<Event> {
    vec![
        Event::ToggleLayeredMode(true),
        Event::ToggleGroupVisibility {
            group: Group::Foreground,
            on: false,
        },
        Event::ShowDebugOverlay(true),
        // Already on: reported as redundant.
        Event::ToggleLayeredMode(true),
        Event::ToggleLayeredMode(false),
        Event::ToggleGroupVisibility {
            group: Group::Foreground,
            on: true,
        },
        Event::ToggleGroupVisibility {
            group: Group::Background,
            on: false,
        },
        Event::ToggleLayeredMode(true),
    ]
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut controller = ToggleController::new(
        SceneModel::basic_shapes(),
        &ForwardConfig::default(),
        LayeredConfig::default(),
    )?;
    let mut sink = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    println!("{}", dump_tree(controller.graph(), controller.root(), controller.scene())?);

    // -- scripted toggles --------------------------------------------------
    for event in script() {
        println!("\n>> {event:?}");
        let outcome = {
            let mut tracer = Tracer::new(&mut sink);
            let outcome = controller.handle_with(event, &mut tracer)?;
            let frame = controller.begin_frame_with(&mut tracer)?;
            log::info!(
                "frame {}: {} views, {} entities drawn",
                frame.index,
                frame.views.len(),
                frame.drawn_entities().len()
            );
            outcome
        };
        println!("   {outcome:?}, mode {}", controller.mode());
        println!("{}", dump_tree(controller.graph(), controller.root(), controller.scene())?);
    }

    // -- render thread -----------------------------------------------------
    let (tx, mut frames) = SharedController::new(controller).split();
    let render = thread::spawn(move || -> strata_core::Result<Tally> {
        let mut tally = Tally::default();
        for _ in 0..RENDER_FRAMES {
            let frame = frames.next_frame()?;
            tally.consume(&frame);
            thread::yield_now();
        }
        Ok(tally)
    });

    for i in 0..RENDER_FRAMES {
        let event = match i % 3 {
            0 => Event::ToggleLayeredMode(i % 2 == 0),
            1 => Event::ToggleGroupVisibility {
                group: Group::Middleground,
                on: i % 2 == 1,
            },
            _ => Event::ShowDebugOverlay(i % 2 == 0),
        };
        tx.send(event)?;
    }

    let tally = render.join().map_err(|_| "render thread panicked")??;
    log::info!(
        "render thread: {} frames, {} views, {} draws, {} overlay passes",
        tally.frames,
        tally.views,
        tally.draws,
        tally.overlays
    );
    println!("\nfinal mode: {}", tx.mode()?);

    // -- export Chrome trace -----------------------------------------------
    let path = "strata-trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    strata_debug::chrome::export(sink.recorder.as_bytes(), FRAME_US, &mut writer)?;
    println!("Wrote {path}");

    Ok(())
}
