//! Execute stage: ALU operations, address generation, branch resolution,
//! and the two-cycle multiply.

use crate::core::pipeline::{StageLatch, StageState, StallReason};
use crate::core::Cpu;
use crate::isa::Opcode;
use crate::sim::trace::PipeStage;

pub fn execute_stage(cpu: &mut Cpu) {
    let state = std::mem::take(&mut cpu.pipeline.execute);
    match state {
        StageState::Empty => cpu.record(PipeStage::Execute, None),
        StageState::Stalled {
            latch,
            reason: StallReason::MulLatency,
        } => finish_mul(cpu, latch),
        StageState::Busy(latch) | StageState::Stalled { latch, .. } => run_op(cpu, latch),
    }
}

/// Second MUL cycle: the product becomes available and the pipe unblocks.
fn finish_mul(cpu: &mut Cpu, mut latch: StageLatch) {
    latch.result = latch.rs1_value.wrapping_mul(latch.rs2_value);
    if cpu.forwarding {
        cpu.ex_bypass.publish(latch.inst.rd, latch.result, latch.pc);
    }
    cpu.record(PipeStage::Execute, Some(latch));
    cpu.pipeline.memory = StageState::Busy(latch);
}

fn run_op(cpu: &mut Cpu, mut latch: StageLatch) {
    let op = latch.inst.opcode;
    match op {
        Opcode::Movc => latch.result = latch.inst.imm,
        Opcode::Add => latch.result = latch.rs1_value.wrapping_add(latch.rs2_value),
        Opcode::Sub => latch.result = latch.rs1_value.wrapping_sub(latch.rs2_value),
        Opcode::And => latch.result = latch.rs1_value & latch.rs2_value,
        Opcode::Or => latch.result = latch.rs1_value | latch.rs2_value,
        Opcode::Xor => latch.result = latch.rs1_value ^ latch.rs2_value,
        Opcode::Mul => {
            // First of two EX cycles; decode and fetch back up behind it.
            cpu.record(PipeStage::Execute, Some(latch));
            cpu.pipeline.execute = StageState::Stalled {
                latch,
                reason: StallReason::MulLatency,
            };
            return;
        }
        Opcode::Load => latch.mem_address = latch.rs1_value.wrapping_add(latch.inst.imm),
        Opcode::Ldr => latch.mem_address = latch.rs1_value.wrapping_add(latch.rs2_value),
        // STORE addresses off rs2; rs1 carries the value to write.
        Opcode::Store => latch.mem_address = latch.rs2_value.wrapping_add(latch.inst.imm),
        Opcode::Jump => {
            let target = latch.rs1_value.wrapping_add(latch.inst.imm);
            cpu.take_branch(&mut latch, target);
        }
        Opcode::Bz | Opcode::Bnz => {
            // Flags land at writeback; a flag-setter that just finished
            // the memory stage commits next cycle, so wait it out.
            if cpu.pipeline.writeback.holds_flag_setter() {
                cpu.stats.stalls_control += 1;
                cpu.record(PipeStage::Execute, Some(latch));
                cpu.pipeline.execute = StageState::Stalled {
                    latch,
                    reason: StallReason::FlagsPending,
                };
                return;
            }
            let taken = if op == Opcode::Bz {
                cpu.flags.zero
            } else {
                !cpu.flags.zero
            };
            if taken {
                let target = latch.pc.wrapping_add(latch.inst.imm);
                cpu.take_branch(&mut latch, target);
            }
        }
        Opcode::Halt => cpu.halting = cpu.halting.saturating_add(1),
        Opcode::Nop => {}
    }

    // LOAD/LDR results do not exist yet; everything else that writes a
    // register is visible on the EX bypass from this cycle on.
    if cpu.forwarding && op.writes_rd() && !op.is_memory_read() {
        cpu.ex_bypass.publish(latch.inst.rd, latch.result, latch.pc);
    }

    cpu.record(PipeStage::Execute, Some(latch));
    cpu.pipeline.memory = StageState::Busy(latch);
}
