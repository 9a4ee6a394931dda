//! Pipeline latch contents and per-stage occupancy state.

use crate::isa::Instruction;

/// In-flight state of one instruction between stages.
#[derive(Clone, Copy, Debug, Default)]
pub struct StageLatch {
    pub inst: Instruction,
    pub pc: i64,
    /// First source value, read or bypassed in decode.
    pub rs1_value: i64,
    /// Second source value, read or bypassed in decode.
    pub rs2_value: i64,
    /// ALU or MOVC result, or the loaded value after the memory stage.
    pub result: i64,
    /// Effective address computed in execute for LOAD/LDR/STORE.
    pub mem_address: i64,
    /// Set when a branch or jump resolved taken in execute.
    pub taken: bool,
}

impl StageLatch {
    pub fn new(inst: Instruction, pc: i64) -> Self {
        Self {
            inst,
            pc,
            ..Self::default()
        }
    }
}

/// Why a stage is holding its latch for another cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallReason {
    /// A source register has an in-flight writer and no bypass matched.
    OperandPending(usize),
    /// A flag-setting instruction downstream has not committed yet.
    FlagsPending,
    /// The execute stage did not free its slot this cycle.
    ExecuteBusy,
    /// MUL occupies execute for a second cycle.
    MulLatency,
}

/// Occupancy of one latch slot. An empty slot behaves as a NOP.
#[derive(Clone, Copy, Debug, Default)]
pub enum StageState {
    #[default]
    Empty,
    Busy(StageLatch),
    Stalled {
        latch: StageLatch,
        reason: StallReason,
    },
}

impl StageState {
    pub fn is_empty(&self) -> bool {
        matches!(self, StageState::Empty)
    }

    pub fn latch(&self) -> Option<&StageLatch> {
        match self {
            StageState::Empty => None,
            StageState::Busy(latch) | StageState::Stalled { latch, .. } => Some(latch),
        }
    }

    /// Whether the slot holds an instruction that will update Z/NZ.
    pub fn holds_flag_setter(&self) -> bool {
        self.latch().is_some_and(|l| l.inst.opcode.sets_flags())
    }

    /// Whether the slot holds a branch or jump that resolved taken.
    pub fn holds_taken_branch(&self) -> bool {
        self.latch().is_some_and(|l| l.taken)
    }

    /// Whether the slot holds a LOAD/LDR destined for `reg`.
    pub fn holds_load_to(&self, reg: usize) -> bool {
        self.latch()
            .is_some_and(|l| l.inst.opcode.is_memory_read() && l.inst.rd == reg)
    }
}
