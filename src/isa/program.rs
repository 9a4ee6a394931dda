//! Code memory: an ordered sequence of decoded instructions.

use crate::common::constants::{INSTRUCTION_BYTES, PC_BASE};
use crate::common::error::SimError;
use crate::isa::instruction::Instruction;

/// Converts a PC-space address into a code memory index.
///
/// Returns `None` for addresses below the code base; addresses past the end
/// of the program are handled by [`Program::fetch`] returning `None`.
pub fn code_index(pc: i64) -> Option<usize> {
    if pc < PC_BASE {
        return None;
    }
    Some(((pc - PC_BASE) / INSTRUCTION_BYTES) as usize)
}

/// An assembled program, indexed by `(pc - 4000) / 4`.
#[derive(Clone, Debug, Default)]
pub struct Program {
    insts: Vec<Instruction>,
}

impl Program {
    pub fn new(insts: Vec<Instruction>) -> Self {
        Self { insts }
    }

    /// Parses assembled text: one instruction per line, blank lines skipped.
    pub fn parse(src: &str) -> Result<Self, SimError> {
        let mut insts = Vec::new();
        for (idx, line) in src.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let inst = line
                .parse()
                .map_err(|source| SimError::ProgramParse { line: idx + 1, source })?;
            insts.push(inst);
        }
        Ok(Self { insts })
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.insts.get(index).copied()
    }

    /// Looks up the instruction at a PC-space address, if any.
    pub fn fetch(&self, pc: i64) -> Option<Instruction> {
        code_index(pc).and_then(|idx| self.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.insts.iter()
    }
}
