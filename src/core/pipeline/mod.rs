//! Pipeline structure: per-stage latch slots, bypass buses, hazard logic.

pub mod bypass;
pub mod hazards;
pub mod latches;

pub use bypass::{BypassBus, BypassEntry};
pub use latches::{StageLatch, StageState, StallReason};

/// The five latch slots connecting the pipeline stages.
///
/// Each cycle the stage functions run writeback-first, so a slot holds the
/// instruction its stage will process on the *next* evaluation; a write
/// deposited this cycle is consumed one cycle later.
pub struct Pipeline {
    pub fetch: StageState,
    pub decode: StageState,
    pub execute: StageState,
    pub memory: StageState,
    pub writeback: StageState,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            fetch: StageState::Empty,
            decode: StageState::Empty,
            execute: StageState::Empty,
            memory: StageState::Empty,
            writeback: StageState::Empty,
        }
    }

    /// Squashes the front of the pipe after a taken branch: whatever sits
    /// in fetch and decode is replaced by an empty (NOP) latch.
    pub fn squash_front(&mut self) {
        self.fetch = StageState::Empty;
        self.decode = StageState::Empty;
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
