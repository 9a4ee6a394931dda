//! Memory stage: data memory access and MEM-bypass publication.

use crate::core::pipeline::StageState;
use crate::core::Cpu;
use crate::isa::Opcode;
use crate::sim::trace::PipeStage;

pub fn mem_stage(cpu: &mut Cpu) {
    // The MEM bypass is a pipeline register behind the EX bypass: refresh
    // it once per cycle, before this stage publishes any loaded value.
    if cpu.forwarding {
        cpu.mem_bypass.refresh_from(&mut cpu.ex_bypass);
    }

    let state = std::mem::take(&mut cpu.pipeline.memory);
    let mut latch = match state {
        StageState::Empty => {
            cpu.record(PipeStage::Memory, None);
            return;
        }
        StageState::Busy(latch) | StageState::Stalled { latch, .. } => latch,
    };

    match latch.inst.opcode {
        Opcode::Store => cpu.data_memory.write(latch.mem_address, latch.rs1_value),
        Opcode::Load | Opcode::Ldr => {
            latch.result = cpu.data_memory.read(latch.mem_address);
            if cpu.forwarding {
                cpu.mem_bypass.publish(latch.inst.rd, latch.result, latch.pc);
            }
        }
        Opcode::Halt => cpu.halting = cpu.halting.saturating_add(1),
        _ => {}
    }

    cpu.record(PipeStage::Memory, Some(latch));
    cpu.pipeline.writeback = StageState::Busy(latch);
}
