//! Line-oriented trace buffer shared by both phases.
//!
//! Every observable event in either engine (card recognition, interrupt
//! handling, command echo, statistics dump, ...) is appended here as a line
//! of text. The buffer is the actual return value of `run_phase1` /
//! `run_phase2`; nothing is ever read back out of it by the engines
//! themselves, so it is a plain accumulator rather than the indexed,
//! queryable log `tracer::Module` keeps for hardware state.

use std::fmt;

/// Accumulates trace output in program order.
#[derive(Default)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn new() -> Trace {
        Trace { lines: Vec::new() }
    }

    /// Append a line, not yet newline-terminated.
    pub fn line<S: Into<String>>(&mut self, text: S) {
        self.lines.push(text.into());
    }

    /// Append a blank line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Render the accumulated trace as a single string, one line per entry,
    /// terminated with a trailing newline.
    pub fn into_string(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Write for Trace {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.line(s);
        Ok(())
    }
}
