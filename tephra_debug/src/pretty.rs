// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! Timestamps are converted to milliseconds using a [`Timebase`], which
//! puts them in the same unit as the fade windows.

use std::io::Write;

use tephra_core::time::{HostTime, Timebase};
use tephra_core::trace::{
    FadeEvent, PlanBeginEvent, PlanEndEvent, TileSkippedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        t.to_nanos(self.timebase) as f64 / 1_000_000.0
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_plan_begin(&mut self, e: &PlanBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[plan] now={:.1}ms ideal_zoom={:.2} visible={}",
            self.host_ms(e.now),
            e.ideal_zoom,
            e.visible,
        );
    }

    fn on_tile_skipped(&mut self, e: &TileSkippedEvent) {
        let _ = writeln!(self.writer, "[skip] {:?} texture not ready", e.id);
    }

    fn on_fade(&mut self, e: &FadeEvent) {
        match e.ancestor {
            Some(ancestor) => {
                let _ = writeln!(
                    self.writer,
                    "[fade] {:?} over {:?} opacity={:.2} mix={:.2}",
                    e.id, ancestor, e.opacity, e.mix,
                );
            }
            None => {
                let _ = writeln!(
                    self.writer,
                    "[fade] {:?} no-ancestor opacity={:.2}",
                    e.id, e.opacity,
                );
            }
        }
    }

    fn on_plan_end(&mut self, e: &PlanEndEvent) {
        let _ = writeln!(
            self.writer,
            "[done] items={} updates={}",
            e.items, e.updates,
        );
    }
}
