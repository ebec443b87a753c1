//! Process control block and per-process page table (spec.md §3).

use super::VIRTUAL_PAGES;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

impl ProcessState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Terminated => "TERMINATED",
        }
    }
}

/// One virtual page's mapping state.
#[derive(Clone, Copy, Default)]
pub struct PageTableEntry {
    pub frame: Option<usize>,
    pub valid: bool,
    pub dirty: bool,
    pub referenced: bool,
}

impl PageTableEntry {
    pub fn invalidate(&mut self) {
        self.frame = None;
        self.valid = false;
    }
}

pub struct Pcb {
    pub pid: u32,
    pub state: ProcessState,
    pub program_counter: u32,
    pub priority: u32,
    pub allocated_pages: usize,
    pub page_faults: u64,
    pub page_table: Box<[PageTableEntry; VIRTUAL_PAGES]>,
}

impl Pcb {
    pub fn new(pid: u32, allocated_pages: usize) -> Pcb {
        Pcb {
            pid,
            state: ProcessState::Ready,
            program_counter: 0,
            priority: 0,
            allocated_pages,
            page_faults: 0,
            page_table: Box::new([PageTableEntry::default(); VIRTUAL_PAGES]),
        }
    }

    pub fn in_bounds(&self, page: usize) -> bool {
        page < self.allocated_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pcb_has_no_resident_pages() {
        let pcb = Pcb::new(1, 4);
        assert!(pcb.page_table.iter().all(|pte| !pte.valid));
    }

    #[test]
    fn bounds_check_respects_allocated_pages() {
        let pcb = Pcb::new(1, 4);
        assert!(pcb.in_bounds(3));
        assert!(!pcb.in_bounds(4));
    }
}
