//! Instruction fetch stage.

use crate::common::constants::INSTRUCTION_BYTES;
use crate::core::pipeline::{StageLatch, StageState};
use crate::core::Cpu;
use crate::sim::trace::PipeStage;

/// Fetches at most one instruction per cycle.
///
/// A latch held from an earlier cycle (decode was occupied) is handed over
/// as soon as decode frees, and nothing new is fetched in the hand-off
/// cycle. Fetch emits a NOP when a HALT has been decoded, when a taken
/// branch still sits in the memory slot, or when the PC runs past code
/// memory.
pub fn fetch_stage(cpu: &mut Cpu) {
    if let StageState::Busy(held) = cpu.pipeline.fetch {
        cpu.record(PipeStage::Fetch, Some(held));
        if cpu.pipeline.decode.is_empty() {
            cpu.pipeline.decode = StageState::Busy(held);
            cpu.pipeline.fetch = StageState::Empty;
        }
        return;
    }

    if cpu.halting > 0 || cpu.pipeline.memory.holds_taken_branch() {
        cpu.record(PipeStage::Fetch, None);
        return;
    }

    let Some(inst) = cpu.program.fetch(cpu.pc) else {
        // Past the end of code memory: a NOP stream until the driver
        // terminates on HALT or the cycle budget.
        cpu.record(PipeStage::Fetch, None);
        return;
    };

    let latch = StageLatch::new(inst, cpu.pc);
    cpu.pc += INSTRUCTION_BYTES;
    cpu.record(PipeStage::Fetch, Some(latch));

    if cpu.pipeline.decode.is_empty() {
        cpu.pipeline.decode = StageState::Busy(latch);
    } else {
        cpu.pipeline.fetch = StageState::Busy(latch);
    }
}
