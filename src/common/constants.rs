//! Machine parameters shared across the simulator.

/// First instruction address in PC space.
pub const PC_BASE: i64 = 4000;

/// Width of one instruction in PC space.
pub const INSTRUCTION_BYTES: i64 = 4;

/// Number of general-purpose registers.
pub const REG_COUNT: usize = 32;

/// Registers exposed in the final architectural report (R0..R15; the upper
/// half is scratch by convention).
pub const ARCH_REG_COUNT: usize = 16;

/// Number of data memory words.
pub const DATA_MEMORY_WORDS: usize = 4000;

/// Data memory words included in the final report.
pub const MEM_DUMP_WORDS: usize = 99;

/// HALT terminates the run once it has passed through this many stages.
pub const HALT_DRAIN_STAGES: u8 = 4;
