//! Writeback stage: the only writer of the architectural register file.

use crate::core::Cpu;
use crate::isa::{code_index, Opcode};
use crate::sim::trace::PipeStage;

pub fn wb_stage(cpu: &mut Cpu) {
    let state = std::mem::take(&mut cpu.pipeline.writeback);
    let Some(latch) = state.latch().copied() else {
        cpu.record(PipeStage::Writeback, None);
        return;
    };

    let op = latch.inst.opcode;
    if op.writes_rd() {
        cpu.regs.commit(latch.inst.rd, latch.result, latch.pc);
        if op.sets_flags() {
            cpu.flags.update(latch.result);
        }
        // The value is canonical now; drop the bypass entry.
        if cpu.forwarding {
            cpu.mem_bypass.clear(latch.inst.rd);
        }
    }
    if op == Opcode::Halt {
        cpu.halting = cpu.halting.saturating_add(1);
    }
    if op.advances_commit() {
        if let Some(idx) = code_index(latch.pc) {
            cpu.ins_completed = cpu.ins_completed.max(idx + 1);
        }
    }

    cpu.stats.note_commit(op);
    cpu.record(PipeStage::Writeback, Some(latch));
}
