//! Decode / register-read stage.

use crate::core::pipeline::{hazards, StageState, StallReason};
use crate::core::Cpu;
use crate::isa::Opcode;
use crate::sim::trace::PipeStage;

/// Resolves source operands, claims the destination register, and forwards
/// the latch to execute — or holds it and backs the fetch stage up.
///
/// Stall checks in priority order: the execute slot must be free, a
/// conditional branch must wait for flag-setting instructions ahead of it
/// to drain past writeback, and every required operand must resolve.
pub fn decode_stage(cpu: &mut Cpu) {
    let state = std::mem::take(&mut cpu.pipeline.decode);
    let mut latch = match state {
        StageState::Empty => {
            cpu.record(PipeStage::Decode, None);
            return;
        }
        StageState::Busy(latch) | StageState::Stalled { latch, .. } => latch,
    };
    cpu.record(PipeStage::Decode, Some(latch));

    // Once a HALT has been decoded nothing younger may leave decode; a
    // taken branch clears the halt counter and revives the slot.
    if cpu.halting > 0 {
        cpu.pipeline.decode = StageState::Busy(latch);
        return;
    }

    if !cpu.pipeline.execute.is_empty() {
        match cpu.pipeline.execute {
            StageState::Stalled {
                reason: StallReason::FlagsPending,
                ..
            } => cpu.stats.stalls_control += 1,
            _ => cpu.stats.stalls_structural += 1,
        }
        cpu.pipeline.decode = StageState::Stalled {
            latch,
            reason: StallReason::ExecuteBusy,
        };
        return;
    }

    let op = latch.inst.opcode;
    if op.is_conditional_branch()
        && hazards::flag_hazard(&cpu.pipeline.memory, &cpu.pipeline.writeback)
    {
        cpu.stats.stalls_control += 1;
        cpu.pipeline.decode = StageState::Stalled {
            latch,
            reason: StallReason::FlagsPending,
        };
        return;
    }

    let resolver = hazards::OperandResolver {
        forwarding: cpu.forwarding,
        ex_bypass: &cpu.ex_bypass,
        mem_bypass: &cpu.mem_bypass,
        memory: &cpu.pipeline.memory,
        regs: &cpu.regs,
    };
    let mut blocked = None;
    let mut rs1_value = latch.rs1_value;
    let mut rs2_value = latch.rs2_value;
    if op.reads_rs1() {
        match resolver.resolve(latch.inst.rs1) {
            Some(value) => rs1_value = value,
            None => blocked = Some(latch.inst.rs1),
        }
    }
    if blocked.is_none() && op.reads_rs2() {
        match resolver.resolve(latch.inst.rs2) {
            Some(value) => rs2_value = value,
            None => blocked = Some(latch.inst.rs2),
        }
    }
    if let Some(reg) = blocked {
        cpu.stats.stalls_data += 1;
        cpu.pipeline.decode = StageState::Stalled {
            latch,
            reason: StallReason::OperandPending(reg),
        };
        return;
    }

    latch.rs1_value = rs1_value;
    latch.rs2_value = rs2_value;
    if op.writes_rd() {
        cpu.regs.claim(latch.inst.rd, latch.pc);
    }
    if op == Opcode::Halt {
        cpu.halting = 1;
    }
    cpu.pipeline.execute = StageState::Busy(latch);
}
