//! Master-mode operating system routine (spec.md §4.3): the trap
//! dispatcher invoked whenever the executor raises a service interrupt.

use log::debug;

use super::input::InputCursor;
use super::memory::WORD_LEN;
use super::vm::{ServiceInterrupt, Vm};
use crate::trace::Trace;

/// Words moved by a single READ/WRITE.
const IO_WORDS: usize = 10;
/// Width of the READ scratch buffer.
const BUFFER_LEN: usize = 40;

/// Service a pending `SI`, then clear it.
pub fn handle(vm: &mut Vm, cursor: &mut InputCursor, out: &mut Trace) {
    match vm.si {
        ServiceInterrupt::Read => read(vm, cursor, out),
        ServiceInterrupt::Write => write(vm, out),
        ServiceInterrupt::Terminate => terminate(out),
        ServiceInterrupt::None => {}
    }
    vm.si = ServiceInterrupt::None;
}

fn read(vm: &mut Vm, cursor: &mut InputCursor, out: &mut Trace) {
    out.line("Read function called");

    let line = cursor.next_line().unwrap_or("");
    debug!("READ consumed input line: {:?}", line);

    vm.buffer = [0; BUFFER_LEN];
    for (i, b) in line.as_bytes().iter().take(BUFFER_LEN).enumerate() {
        vm.buffer[i] = *b;
    }

    let base = vm.read_write_base();
    for word in 0..IO_WORDS {
        let mut cell = [0u8; WORD_LEN];
        cell.copy_from_slice(&vm.buffer[word * WORD_LEN..(word + 1) * WORD_LEN]);
        vm.memory.set(base + word, cell);
    }
}

fn write(vm: &mut Vm, out: &mut Trace) {
    out.line("Write function called");

    let base = vm.read_write_base();
    let mut line = String::new();
    for word in 0..IO_WORDS {
        let cell = vm.memory.get(base + word);
        line.push_str(&super::memory::Memory::cell_to_text(cell));
    }
    out.line(line);
}

fn terminate(out: &mut Trace) {
    out.line("Terminate called");
    out.blank();
    out.blank();
}
