//! The MMU engine: address translation, page-fault handling, and process
//! lifecycle (spec.md §4.4-§4.5).

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};

use super::frames::FramePool;
use super::interrupt::{self, Interrupt};
use super::pcb::{Pcb, ProcessState};
use super::tlb::Tlb;
use super::{PAGE_SIZE, VIRTUAL_PAGES};
use crate::trace::Trace;

pub struct Mmu {
    frames: FramePool,
    tlb: Tlb,
    fifo_victims: VecDeque<(u32, usize)>,
    processes: BTreeMap<u32, Pcb>,
    tlb_hits: u64,
    tlb_misses: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MmuStats {
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub free_frames: usize,
    pub total_page_faults: u64,
    pub active_processes: usize,
}

impl Mmu {
    pub fn new() -> Mmu {
        Mmu {
            frames: FramePool::new(),
            tlb: Tlb::new(),
            fifo_victims: VecDeque::new(),
            processes: BTreeMap::new(),
            tlb_hits: 0,
            tlb_misses: 0,
        }
    }

    pub fn create(&mut self, pid: u32, pages: usize, out: &mut Trace) {
        if self.processes.contains_key(&pid) {
            out.line(format!("Error: Process {pid} already exists"));
            return;
        }
        let allocated = pages.min(VIRTUAL_PAGES);
        self.processes.insert(pid, Pcb::new(pid, allocated));
        debug!("created process {pid} with {allocated} allocated pages");
    }

    pub fn terminate(&mut self, pid: u32, out: &mut Trace) {
        let Some(pcb) = self.processes.remove(&pid) else {
            out.line(format!("Error: Process {pid} not found"));
            return;
        };

        for pte in pcb.page_table.iter() {
            if pte.valid {
                if let Some(frame) = pte.frame {
                    self.frames.free_frame(frame);
                }
            }
        }
        self.tlb.invalidate_process(pid);
        // fifo_victims may still hold entries for this pid; replace_page's
        // staleness check (pcb no longer present) skips them when their
        // turn comes up rather than us purging the queue here (spec.md §9).
    }

    /// Read access (spec.md §4.6 `ACCESS`).
    pub fn access(&mut self, pid: u32, vaddr: u32, out: &mut Trace) -> Option<u32> {
        self.translate(pid, vaddr, false, out)
    }

    /// Write access (spec.md §4.6 `WRITE`).
    pub fn write_access(&mut self, pid: u32, vaddr: u32, out: &mut Trace) -> Option<u32> {
        self.translate(pid, vaddr, true, out)
    }

    fn translate(&mut self, pid: u32, vaddr: u32, is_write: bool, out: &mut Trace) -> Option<u32> {
        let page = (vaddr / PAGE_SIZE) as usize;
        let offset = vaddr % PAGE_SIZE;

        if let Some(frame) = self.tlb.lookup(pid, page) {
            self.tlb_hits += 1;
            out.line(format!("TLB hit: process {pid}, page {page} -> frame {frame}"));
            if is_write {
                if let Some(pcb) = self.processes.get_mut(&pid) {
                    pcb.page_table[page].dirty = true;
                }
            }
            return Some(frame as u32 * PAGE_SIZE + offset);
        }

        self.tlb_misses += 1;
        out.line(format!("TLB miss: process {pid}, page {page}"));

        if !self.processes.contains_key(&pid) {
            interrupt::emit(&Interrupt::InvalidAccess { pid }, out);
            return None;
        }

        if !self.processes[&pid].in_bounds(page) {
            interrupt::emit(&Interrupt::SegmentationFault { pid, addr: vaddr }, out);
            self.processes.get_mut(&pid).unwrap().state = ProcessState::Terminated;
            return None;
        }

        if !self.processes[&pid].page_table[page].valid {
            self.page_fault(pid, page, out)?;
        }

        let frame = {
            let pcb = self.processes.get_mut(&pid).unwrap();
            let pte = &mut pcb.page_table[page];
            pte.referenced = true;
            if is_write {
                pte.dirty = true;
            }
            pte.frame.expect("page fault handler must install a frame")
        };

        self.tlb.insert(pid, page, frame);
        trace!("translate: process {pid} page {page} -> frame {frame}");

        Some(frame as u32 * PAGE_SIZE + offset)
    }

    /// Page-fault handler (spec.md §4.5). Installs `page` into a frame and
    /// returns `Some(())`, or emits the allocation-failure trace line and
    /// returns `None` if no frame could be freed.
    fn page_fault(&mut self, pid: u32, page: usize, out: &mut Trace) -> Option<()> {
        out.line(format!("PAGE FAULT: Process {pid}, Page {page}"));

        if let Some(pcb) = self.processes.get_mut(&pid) {
            pcb.page_faults += 1;
        }

        let frame = match self.frames.allocate() {
            Some(frame) => frame,
            None => match self.replace_page(out) {
                Some(frame) => frame,
                None => match self.frames.allocate() {
                    Some(frame) => frame,
                    None => {
                        out.line(format!(
                            "Error: Cannot allocate frame for process {pid}, page {page}"
                        ));
                        return None;
                    }
                },
            },
        };

        let pcb = self.processes.get_mut(&pid).unwrap();
        let pte = &mut pcb.page_table[page];
        pte.frame = Some(frame);
        pte.valid = true;
        pte.referenced = true;
        pte.dirty = false;
        self.fifo_victims.push_back((pid, page));

        out.line(format!("Allocated frame {frame} to page {page} of process {pid}"));

        Some(())
    }

    /// Evict the oldest resident page to free a frame (spec.md §4.5 step
    /// 2). A single dequeue-and-check: if the queue head refers to a page
    /// that is no longer resident (its process terminated, or it was
    /// already evicted), that stale entry is simply dropped and the caller
    /// falls back to `allocate_frame`, which will retry the next stale
    /// entry on a subsequent fault.
    fn replace_page(&mut self, out: &mut Trace) -> Option<usize> {
        let (victim_pid, victim_page) = self.fifo_victims.pop_front()?;

        let pcb = self.processes.get_mut(&victim_pid)?;
        let pte = &mut pcb.page_table[victim_page];
        if !pte.valid {
            return None;
        }

        let frame = pte.frame.take().unwrap();
        pte.valid = false;

        if pte.dirty {
            out.line(format!(
                "Replacing page {victim_page} of process {victim_pid} (dirty - writing back to disk)"
            ));
        } else {
            out.line(format!(
                "Replacing page {victim_page} of process {victim_pid}"
            ));
        }

        self.tlb.invalidate_page(victim_pid, victim_page);

        Some(frame)
    }

    pub fn stats(&self) -> MmuStats {
        MmuStats {
            tlb_hits: self.tlb_hits,
            tlb_misses: self.tlb_misses,
            free_frames: self.frames.free_count(),
            total_page_faults: self.processes.values().map(|p| p.page_faults).sum(),
            active_processes: self.processes.len(),
        }
    }

    pub fn emit_stats(&self, out: &mut Trace) {
        let stats = self.stats();
        out.line("=== STATISTICS ===");
        out.line(format!("TLB hits: {}", stats.tlb_hits));
        out.line(format!("TLB misses: {}", stats.tlb_misses));
        out.line(format!("Free frames: {}", stats.free_frames));
        out.line(format!("Total page faults: {}", stats.total_page_faults));
        out.line(format!("Active processes: {}", stats.active_processes));
        out.line("===================");
    }

    pub fn emit_memmap(&self, out: &mut Trace) {
        out.line("=== MEMORY MAP ===");
        for (pid, pcb) in self.processes.iter() {
            let resident = pcb.page_table.iter().filter(|pte| pte.valid).count();
            out.line(format!(
                "Process {pid} ({}): {resident} resident page(s), {} allocated",
                pcb.state.as_str(),
                pcb.allocated_pages
            ));
            for (page, pte) in pcb.page_table.iter().enumerate() {
                if pte.valid {
                    out.line(format!(
                        "  page {page} -> frame {} (dirty={} referenced={})",
                        pte.frame.unwrap(),
                        pte.dirty,
                        pte.referenced
                    ));
                }
            }
        }
        out.line("===================");
    }
}

impl Default for Mmu {
    fn default() -> Mmu {
        Mmu::new()
    }
}
