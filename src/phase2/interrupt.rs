//! Interrupt handler trace formatting (spec.md §4.7).

use crate::trace::Trace;

pub enum Interrupt {
    PageFault { pid: u32, page: usize },
    InvalidAccess { pid: u32 },
    SegmentationFault { pid: u32, addr: u32 },
    Timer,
}

impl Interrupt {
    fn kind(&self) -> &'static str {
        match self {
            Interrupt::PageFault { .. } => "PAGE FAULT",
            Interrupt::InvalidAccess { .. } => "INVALID ACCESS",
            Interrupt::SegmentationFault { .. } => "SEGMENTATION FAULT",
            Interrupt::Timer => "TIMER INTERRUPT",
        }
    }
}

/// Emit the boxed `=== INTERRUPT HANDLER ===` block for `interrupt`.
pub fn emit(interrupt: &Interrupt, out: &mut Trace) {
    out.line("=== INTERRUPT HANDLER ===");
    out.line(format!("Type: {}", interrupt.kind()));

    match interrupt {
        Interrupt::PageFault { pid, page } => {
            out.line(format!("Process {pid}, Page {page}"));
        }
        Interrupt::InvalidAccess { pid } => {
            out.line(format!("Process {pid} does not exist"));
        }
        Interrupt::SegmentationFault { pid, addr } => {
            out.line(format!("Invalid address {addr} for process {pid}"));
            out.line(format!("Process {pid} marked TERMINATED"));
        }
        Interrupt::Timer => {
            out.line("Context switch triggered");
        }
    }

    out.line("=========================");
}
