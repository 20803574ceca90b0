// Copyright 2026 the Tephra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug and trace utilities for tephra.
//!
//! [`PrettyPrintSink`] implements
//! [`TraceSink`](tephra_core::trace::TraceSink) and writes one line per
//! planning event, which is usually all that is needed to see why a tile is
//! (or is not) crossfading during host integration.

mod pretty;

pub use pretty::PrettyPrintSink;
