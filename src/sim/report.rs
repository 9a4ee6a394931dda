//! Final architectural state report.

use serde::Serialize;

use crate::common::constants::{ARCH_REG_COUNT, MEM_DUMP_WORDS};
use crate::core::Cpu;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegisterReport {
    pub index: usize,
    pub value: i64,
    pub valid: bool,
}

/// Snapshot of the architecturally exposed state at end of simulation:
/// registers R0..R15 with their scoreboard status, and the first data
/// memory words.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FinalState {
    pub registers: Vec<RegisterReport>,
    pub memory: Vec<i64>,
    pub cycles: u64,
    pub instructions: u64,
}

impl FinalState {
    pub fn capture(cpu: &Cpu) -> Self {
        let registers = (0..ARCH_REG_COUNT)
            .map(|index| RegisterReport {
                index,
                value: cpu.regs.read(index),
                valid: cpu.regs.is_valid(index),
            })
            .collect();
        let memory = (0..MEM_DUMP_WORDS)
            .map(|i| cpu.data_memory.read(i as i64))
            .collect();
        Self {
            registers,
            memory,
            cycles: cpu.stats.cycles,
            instructions: cpu.stats.instructions_committed,
        }
    }

    pub fn print(&self) {
        println!("=============== STATE OF ARCHITECTURAL REGISTER FILE ===============");
        for reg in &self.registers {
            println!(
                "REGS[{:<2}] | Value = {:<12} | Status = {}",
                reg.index,
                reg.value,
                if reg.valid { "VALID" } else { "INVALID" }
            );
        }
        println!("==================== STATE OF DATA MEMORY ====================");
        for (addr, word) in self.memory.iter().enumerate() {
            println!("MEM[{:<2}] | Value = {}", addr, word);
        }
    }
}
