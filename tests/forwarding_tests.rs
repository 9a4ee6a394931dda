//! Unit tests for decode-stage operand resolution against the bypass
//! network, the scoreboard, and the register file.

use apex_sim::core::arch::RegisterFile;
use apex_sim::core::pipeline::hazards::OperandResolver;
use apex_sim::core::pipeline::{BypassBus, StageLatch, StageState};
use apex_sim::isa::Instruction;

/// Creates a memory-stage slot holding a LOAD destined for `rd`.
fn load_in_memory(rd: usize) -> StageState {
    let inst: Instruction = format!("LOAD,R{rd},R0,#0").parse().expect("load parses");
    StageState::Busy(StageLatch::new(inst, 4008))
}

/// Creates a memory-stage slot holding an ALU op destined for `rd`.
fn add_in_memory(rd: usize) -> StageState {
    let inst: Instruction = format!("ADD,R{rd},R0,R0").parse().expect("add parses");
    StageState::Busy(StageLatch::new(inst, 4008))
}

struct Fixture {
    ex_bypass: BypassBus,
    mem_bypass: BypassBus,
    memory: StageState,
    regs: RegisterFile,
}

impl Fixture {
    fn new() -> Self {
        Self {
            ex_bypass: BypassBus::new(),
            mem_bypass: BypassBus::new(),
            memory: StageState::Empty,
            regs: RegisterFile::new(),
        }
    }

    fn resolve(&self, forwarding: bool, reg: usize) -> Option<i64> {
        OperandResolver {
            forwarding,
            ex_bypass: &self.ex_bypass,
            mem_bypass: &self.mem_bypass,
            memory: &self.memory,
            regs: &self.regs,
        }
        .resolve(reg)
    }
}

#[test]
fn ex_bypass_has_priority_over_mem_bypass() {
    let mut f = Fixture::new();
    f.ex_bypass.publish(1, 0x1000, 4004);
    f.mem_bypass.publish(1, 0x2000, 4000);
    f.memory = add_in_memory(1);
    // The EX producer (pc 4004) is the youngest in-flight writer.
    f.regs.claim(1, 4004);
    assert_eq!(f.resolve(true, 1), Some(0x1000));
}

#[test]
fn mem_bypass_used_when_ex_misses() {
    let mut f = Fixture::new();
    f.mem_bypass.publish(2, 0x2000, 4000);
    f.regs.claim(2, 4000);
    assert_eq!(f.resolve(true, 2), Some(0x2000));
}

#[test]
fn load_in_memory_blocks_ex_bypass_of_its_destination() {
    let mut f = Fixture::new();
    f.ex_bypass.publish(3, 0xDEAD, 4008);
    f.memory = load_in_memory(3);
    f.regs.claim(3, 4008);
    assert_eq!(f.resolve(true, 3), None, "load result must wait for MEM");
}

#[test]
fn load_in_memory_does_not_block_other_registers() {
    let mut f = Fixture::new();
    f.ex_bypass.publish(4, 0x4000, 4008);
    f.memory = load_in_memory(3);
    f.regs.claim(4, 4008);
    assert_eq!(f.resolve(true, 4), Some(0x4000));
}

#[test]
fn stale_entry_from_an_older_writer_is_refused() {
    let mut f = Fixture::new();
    // An older ALU op left its result on the MEM bus, but a younger LOAD
    // (pc 4008) has re-claimed the register and has not produced yet.
    f.mem_bypass.publish(1, 6, 4000);
    f.regs.claim(1, 4008);
    assert_eq!(f.resolve(true, 1), None, "must wait for the younger writer");
}

#[test]
fn register_file_is_the_fallback() {
    let mut f = Fixture::new();
    f.regs.commit(5, 77, 4000);
    assert_eq!(f.resolve(true, 5), Some(77));
}

#[test]
fn pending_writer_without_bypass_stalls() {
    let mut f = Fixture::new();
    f.regs.claim(6, 4004);
    assert_eq!(f.resolve(true, 6), None);
}

#[test]
fn interlock_mode_ignores_the_buses() {
    let mut f = Fixture::new();
    f.ex_bypass.publish(7, 0x7000, 4004);
    f.mem_bypass.publish(7, 0x7000, 4000);
    f.regs.claim(7, 4008);
    assert_eq!(f.resolve(false, 7), None, "no bypass without forwarding");

    let mut g = Fixture::new();
    g.regs.commit(7, 9, 4000);
    assert_eq!(g.resolve(false, 7), Some(9));
}
