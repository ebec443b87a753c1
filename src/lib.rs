//! A pedagogical two-phase operating-system simulator.
//!
//! Phase 1 is a card-oriented batch virtual machine; Phase 2 is a paged
//! virtual-memory manager. Each phase is exposed as a single pure function
//! that turns input text into trace text — see `phase1::run_phase1` and
//! `phase2::run_phase2`.

pub mod phase1;
pub mod phase2;
mod trace;

pub use phase1::run_phase1;
pub use phase2::run_phase2;
