//! Line-oriented command dispatcher (spec.md §4.6).

use log::warn;

use super::mmu::Mmu;
use crate::trace::Trace;

pub fn run(script_text: &str) -> String {
    let mut mmu = Mmu::new();
    let mut out = Trace::new();
    let mut line_no: u32 = 0;

    for raw_line in script_text.lines() {
        // Blanks and comments still bump the line counter even though
        // they are never echoed or dispatched (spec.md §9).
        line_no += 1;

        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        out.line(format!("Command [{line_no}]: {raw_line}"));
        dispatch(line, &mut mmu, &mut out);
    }

    out.line("=== FINAL STATISTICS ===");
    mmu.emit_stats(&mut out);
    mmu.emit_memmap(&mut out);

    out.into_string()
}

fn dispatch(line: &str, mmu: &mut Mmu, out: &mut Trace) {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next().unwrap_or("");

    match verb {
        "CREATE" => match (parse_u32(tokens.next()), parse_usize(tokens.next())) {
            (Some(pid), Some(pages)) => mmu.create(pid, pages, out),
            _ => unknown(line, out),
        },
        "ACCESS" => match (parse_u32(tokens.next()), parse_u32(tokens.next())) {
            (Some(pid), Some(addr)) => {
                out.line(format!("Accessing virtual address {addr} of process {pid}"));
                if let Some(phys) = mmu.access(pid, addr, out) {
                    out.line(format!("Physical address: {phys}"));
                }
            }
            _ => unknown(line, out),
        },
        "WRITE" => match (parse_u32(tokens.next()), parse_u32(tokens.next())) {
            (Some(pid), Some(addr)) => {
                out.line(format!("Writing to virtual address {addr} of process {pid}"));
                if let Some(phys) = mmu.write_access(pid, addr, out) {
                    out.line(format!("Physical address: {phys}"));
                }
            }
            _ => unknown(line, out),
        },
        "TERMINATE" => match parse_u32(tokens.next()) {
            Some(pid) => mmu.terminate(pid, out),
            None => unknown(line, out),
        },
        "STATS" => mmu.emit_stats(out),
        "MEMMAP" => mmu.emit_memmap(out),
        _ => unknown(line, out),
    }
}

fn unknown(line: &str, out: &mut Trace) {
    warn!("unrecognized command: {line:?}");
    out.line(format!("Unknown command: {line}"));
}

fn parse_u32(token: Option<&str>) -> Option<u32> {
    token.and_then(|t| t.parse().ok())
}

fn parse_usize(token: Option<&str>) -> Option<usize> {
    token.and_then(|t| t.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_still_advance_the_counter() {
        let script = "CREATE 1 4\n\n# a comment\nACCESS 1 0\n";
        let trace = run(script);
        assert!(trace.contains("Command [1]: CREATE 1 4"));
        assert!(trace.contains("Command [4]: ACCESS 1 0"));
    }

    #[test]
    fn unknown_command_is_reported_not_fatal() {
        let trace = run("FROBNICATE 1 2\n");
        assert!(trace.contains("Unknown command: FROBNICATE 1 2"));
    }

    #[test]
    fn final_statistics_always_trail_the_trace() {
        let trace = run("CREATE 1 4\n");
        assert!(trace.contains("=== FINAL STATISTICS ==="));
        assert!(trace.contains("=== STATISTICS ==="));
        assert!(trace.contains("=== MEMORY MAP ==="));
    }

    #[test]
    fn tlb_hit_scenario_c() {
        let script = "CREATE 1 4\nACCESS 1 0\nACCESS 1 0\nSTATS\n";
        let trace = run(script);
        assert!(trace.contains("TLB hits: 1"));
        assert!(trace.contains("TLB misses: 1"));
        assert!(trace.contains("Free frames: 63"));
    }

    #[test]
    fn segfault_scenario_e() {
        let trace = run("CREATE 1 4\nACCESS 1 8192\n");
        assert!(trace.contains("=== INTERRUPT HANDLER ==="));
        assert!(trace.contains("Type: SEGMENTATION FAULT"));
    }

    #[test]
    fn invalid_pid_scenario_f() {
        let trace = run("ACCESS 7 0\n");
        assert!(trace.contains("Type: INVALID ACCESS"));
    }
}
