//! Fully-associative 4-entry TLB with FIFO replacement (spec.md §3, §4.4).
//!
//! The insertion cursor is instance state, not a process-wide global: the
//! original this system was modeled on kept it as shared mutable state
//! across every MMU in the process, which meant two unrelated simulator
//! runs could stomp on each other's TLB. spec.md §9 flags this as a bug;
//! here `tlb_next` lives on `Tlb` and is reset whenever a new `Mmu` (and
//! therefore a new `Tlb`) is constructed.

use super::TLB_SIZE;

#[derive(Clone, Copy, Default)]
struct TlbEntry {
    pid: u32,
    page: usize,
    frame: usize,
    valid: bool,
}

pub struct Tlb {
    entries: [TlbEntry; TLB_SIZE],
    next: usize,
}

impl Tlb {
    pub fn new() -> Tlb {
        Tlb {
            entries: [TlbEntry::default(); TLB_SIZE],
            next: 0,
        }
    }

    /// Linear scan for a valid entry matching `(pid, page)`.
    pub fn lookup(&self, pid: u32, page: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.valid && e.pid == pid && e.page == page)
            .map(|e| e.frame)
    }

    /// Install a translation, unconditionally overwriting the slot under
    /// the FIFO cursor and advancing it (spec.md §4.4 step 5).
    pub fn insert(&mut self, pid: u32, page: usize, frame: usize) {
        self.entries[self.next] = TlbEntry {
            pid,
            page,
            frame,
            valid: true,
        };
        self.next = (self.next + 1) % TLB_SIZE;
    }

    /// Invalidate every entry for `(pid, page)` — used on eviction.
    pub fn invalidate_page(&mut self, pid: u32, page: usize) {
        for e in self.entries.iter_mut() {
            if e.valid && e.pid == pid && e.page == page {
                e.valid = false;
            }
        }
    }

    /// Invalidate every entry belonging to `pid` — used on termination
    /// (spec.md invariant 5).
    pub fn invalidate_process(&mut self, pid: u32) {
        for e in self.entries.iter_mut() {
            if e.valid && e.pid == pid {
                e.valid = false;
            }
        }
    }
}

impl Default for Tlb {
    fn default() -> Tlb {
        Tlb::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let mut tlb = Tlb::new();
        assert_eq!(tlb.lookup(1, 0), None);
        tlb.insert(1, 0, 7);
        assert_eq!(tlb.lookup(1, 0), Some(7));
    }

    #[test]
    fn fifo_overwrite_after_capacity() {
        let mut tlb = Tlb::new();
        for page in 0..TLB_SIZE {
            tlb.insert(1, page, page);
        }
        // One more insert evicts the oldest entry (page 0).
        tlb.insert(1, TLB_SIZE, 99);
        assert_eq!(tlb.lookup(1, 0), None);
        assert_eq!(tlb.lookup(1, TLB_SIZE), Some(99));
    }

    #[test]
    fn termination_invalidates_only_matching_pid() {
        let mut tlb = Tlb::new();
        tlb.insert(1, 0, 0);
        tlb.insert(2, 0, 1);
        tlb.invalidate_process(1);
        assert_eq!(tlb.lookup(1, 0), None);
        assert_eq!(tlb.lookup(2, 0), Some(1));
    }

    #[test]
    fn fresh_instance_cursor_does_not_carry_over() {
        let mut first = Tlb::new();
        for page in 0..TLB_SIZE {
            first.insert(9, page, page);
        }
        // A brand new instance must start its cursor at 0 again, not
        // continue where the previous instance's cursor left off.
        let mut second = Tlb::new();
        second.insert(9, 100, 100);
        assert_eq!(second.lookup(9, 100), Some(100));
        second.insert(9, 101, 101);
        second.insert(9, 102, 102);
        second.insert(9, 103, 103);
        second.insert(9, 104, 104);
        assert_eq!(second.lookup(9, 100), None);
    }
}
