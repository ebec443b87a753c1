// ossim - a pedagogical two-phase operating-system simulator
// Copyright (C) 2015 Lionel Flandrin
//
// This program is free software; you can redistribute it and/or
// modify it under the terms of the GNU General Public License
// as published by the Free Software Foundation; either version 2
// of the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program; if not, write to the Free Software
// Foundation, Inc., 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301, USA.

use std::fs;
use std::process::ExitCode;

use ossim::{run_phase1, run_phase2};

fn main() -> ExitCode {
    env_logger::init();

    let argv: Vec<_> = std::env::args().collect();

    if argv.len() != 4 {
        eprintln!("Usage: {} <1|2> <input_file> <output_file>", argv[0]);
        return ExitCode::FAILURE;
    }

    let phase = &argv[1];
    let input_path = &argv[2];
    let output_path = &argv[3];

    let input = match fs::read_to_string(input_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Cannot read {input_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let trace = match phase.as_str() {
        "1" => run_phase1(&input),
        "2" => run_phase2(&input),
        other => {
            eprintln!("Unknown phase {other:?}, expected 1 or 2");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(output_path, trace) {
        eprintln!("Cannot write {output_path}: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
