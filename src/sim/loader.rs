//! Program loader.
//!
//! Reads an assembled text file — one instruction per line in disassembly
//! syntax, e.g. `MOVC,R1,#5` — into code memory. A missing or malformed
//! file fails initialization; the driver refuses to run.

use std::fs;

use crate::common::error::SimError;
use crate::isa::Program;

pub fn load_program(path: &str) -> Result<Program, SimError> {
    let src = fs::read_to_string(path).map_err(|source| SimError::ProgramRead {
        path: path.to_string(),
        source,
    })?;
    Program::parse(&src)
}

/// Prints the loaded code memory, one row per instruction.
pub fn print_listing(program: &Program) {
    eprintln!("apex-sim: loaded {} instructions", program.len());
    println!(
        "{:<9} {:<9} {:<9} {:<9} {:<9}",
        "opcode", "rd", "rs1", "rs2", "imm"
    );
    for inst in program.iter() {
        println!(
            "{:<9} {:<9} {:<9} {:<9} {:<9}",
            inst.opcode.as_str(),
            inst.rd,
            inst.rs1,
            inst.rs2,
            inst.imm
        );
    }
}
