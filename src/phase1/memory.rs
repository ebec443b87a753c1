//! The Phase 1 main store: 100 words of 4 characters each.
//!
//! Instructions and data share this store, exactly as a real card-era batch
//! machine shares core memory between the loaded program and the rows it
//! reads/writes. A cell holds raw bytes rather than `char`s since program
//! cards are packed ASCII and data cards are arbitrary punched text.

/// Number of addressable words.
pub const WORDS: usize = 100;
/// Width of a word in characters.
pub const WORD_LEN: usize = 4;

pub type Cell = [u8; WORD_LEN];

const NUL_CELL: Cell = [0u8; WORD_LEN];

/// The 100x4-character main store.
pub struct Memory {
    cells: [Cell; WORDS],
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            cells: [NUL_CELL; WORDS],
        }
    }

    pub fn get(&self, addr: usize) -> Cell {
        self.cells[addr]
    }

    pub fn set(&mut self, addr: usize, cell: Cell) {
        self.cells[addr] = cell;
    }

    /// Pack a whitespace-delimited token into a cell: truncate past 4
    /// characters, null-pad if shorter.
    pub fn token_to_cell(token: &str) -> Cell {
        let mut cell = NUL_CELL;
        for (i, b) in token.as_bytes().iter().take(WORD_LEN).enumerate() {
            cell[i] = *b;
        }
        cell
    }

    /// Render a cell as text for a WRITE, skipping the null padding.
    pub fn cell_to_text(cell: Cell) -> String {
        cell.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_truncates_long_tokens() {
        let cell = Memory::token_to_cell("HELLOWORLD");
        assert_eq!(cell, *b"HELL");
    }

    #[test]
    fn token_pads_short_tokens() {
        let cell = Memory::token_to_cell("H");
        assert_eq!(cell, [b'H', 0, 0, 0]);
    }

    #[test]
    fn cell_to_text_skips_nul_padding() {
        let cell = Memory::token_to_cell("HI");
        assert_eq!(Memory::cell_to_text(cell), "HI");
    }

    #[test]
    fn fresh_memory_is_all_nul() {
        let mem = Memory::new();
        for addr in 0..WORDS {
            assert_eq!(mem.get(addr), NUL_CELL);
        }
    }
}
