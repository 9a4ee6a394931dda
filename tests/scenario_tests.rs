//! End-to-end pipeline scenarios: final architectural state and exact cycle
//! counts in both hazard modes.

mod common;

use apex_sim::core::ExitReason;
use common::run_program;

const MOVC_ADD: &str = "\
MOVC,R1,#5
MOVC,R2,#7
ADD,R3,R1,R2
HALT
";

#[test]
fn movc_add_final_state_and_flags() {
    for forwarding in [false, true] {
        let (cpu, reason) = run_program(MOVC_ADD, forwarding);
        assert_eq!(reason, ExitReason::HaltDrained);
        assert_eq!(cpu.regs.read(1), 5);
        assert_eq!(cpu.regs.read(2), 7);
        assert_eq!(cpu.regs.read(3), 12);
        assert!(!cpu.flags.zero);
        assert!(cpu.flags.non_zero);
        for reg in 0..16 {
            assert!(cpu.regs.is_valid(reg), "R{reg} should be VALID at exit");
        }
    }
}

#[test]
fn movc_add_cycle_counts() {
    let (fwd, _) = run_program(MOVC_ADD, true);
    let (slow, _) = run_program(MOVC_ADD, false);
    assert_eq!(fwd.stats.cycles, 8);
    assert_eq!(slow.stats.cycles, 10);
}

const LOAD_USE: &str = "\
MOVC,R1,#0
MOVC,R2,#42
STORE,R2,R1,#0
LOAD,R3,R1,#0
ADD,R4,R3,R3
HALT
";

#[test]
fn store_then_load_use_hazard() {
    for forwarding in [false, true] {
        let (cpu, _) = run_program(LOAD_USE, forwarding);
        assert_eq!(cpu.data_memory.read(0), 42);
        assert_eq!(cpu.regs.read(3), 42);
        assert_eq!(cpu.regs.read(4), 84);
    }
    let (fwd, _) = run_program(LOAD_USE, true);
    let (slow, _) = run_program(LOAD_USE, false);
    assert_eq!(fwd.stats.cycles, 11);
    assert_eq!(slow.stats.cycles, 14);
}

const BRANCH_TAKEN: &str = "\
MOVC,R1,#0
ADD,R2,R1,R1
BZ,#8
MOVC,R3,#99
MOVC,R4,#7
HALT
";

#[test]
fn taken_branch_squashes_fall_through() {
    for forwarding in [false, true] {
        let (cpu, _) = run_program(BRANCH_TAKEN, forwarding);
        assert_eq!(cpu.regs.read(2), 0);
        assert_eq!(cpu.regs.read(3), 0, "squashed MOVC must not commit");
        assert!(cpu.regs.is_valid(3), "squashed MOVC must not claim R3");
        assert_eq!(cpu.regs.read(4), 7);
        assert!(cpu.flags.zero);
    }
    let (fwd, _) = run_program(BRANCH_TAKEN, true);
    let (slow, _) = run_program(BRANCH_TAKEN, false);
    assert_eq!(fwd.stats.cycles, 13);
    assert_eq!(slow.stats.cycles, 15);
}

const MUL_STALL: &str = "\
MOVC,R1,#3
MOVC,R2,#4
MUL,R3,R1,R2
ADD,R4,R3,R3
HALT
";

#[test]
fn mul_produces_after_two_execute_cycles() {
    for forwarding in [false, true] {
        let (cpu, _) = run_program(MUL_STALL, forwarding);
        assert_eq!(cpu.regs.read(3), 12);
        assert_eq!(cpu.regs.read(4), 24);
    }
    let (fwd, _) = run_program(MUL_STALL, true);
    let (slow, _) = run_program(MUL_STALL, false);
    assert_eq!(fwd.stats.cycles, 10);
    assert_eq!(slow.stats.cycles, 14);
}

const FORWARD_CHAIN: &str = "\
MOVC,R1,#1
ADD,R2,R1,R1
ADD,R3,R2,R2
ADD,R4,R3,R3
HALT
";

#[test]
fn dependent_chain_runs_stall_free_with_forwarding() {
    let (fwd, _) = run_program(FORWARD_CHAIN, true);
    assert_eq!(fwd.regs.read(2), 2);
    assert_eq!(fwd.regs.read(3), 4);
    assert_eq!(fwd.regs.read(4), 8);
    assert_eq!(fwd.stats.cycles, 9);
    assert_eq!(fwd.stats.stalls_data, 0);

    let (slow, _) = run_program(FORWARD_CHAIN, false);
    assert_eq!(slow.regs.read(4), 8);
    assert_eq!(slow.stats.cycles, 15);
    // Two stall cycles between each adjacent dependent pair.
    assert_eq!(slow.stats.stalls_data, 6);
}

const JUMP_SKIP: &str = "\
MOVC,R1,#12
JUMP,R1,#4000
MOVC,R2,#1
MOVC,R3,#9
HALT
";

#[test]
fn jump_redirects_past_fall_through() {
    for forwarding in [false, true] {
        let (cpu, _) = run_program(JUMP_SKIP, forwarding);
        assert_eq!(cpu.regs.read(1), 12);
        assert_eq!(cpu.regs.read(2), 0, "jumped-over MOVC must not commit");
        assert_eq!(cpu.regs.read(3), 9);
    }
    let (fwd, _) = run_program(JUMP_SKIP, true);
    let (slow, _) = run_program(JUMP_SKIP, false);
    assert_eq!(fwd.stats.cycles, 10);
    assert_eq!(slow.stats.cycles, 12);
}

#[test]
fn program_without_halt_completes_on_last_commit() {
    let (cpu, reason) = run_program("MOVC,R1,#1\n", false);
    assert_eq!(reason, ExitReason::ProgramComplete);
    assert_eq!(cpu.regs.read(1), 1);
    assert_eq!(cpu.stats.cycles, 5);
}

#[test]
fn cycle_budget_bounds_runaway_programs() {
    // Backward branch loops forever; Z stays clear so BNZ is always taken.
    let src = "\
MOVC,R1,#1
ADD,R2,R1,R1
BNZ,#-4
HALT
";
    let program = apex_sim::isa::Program::parse(src).expect("program should parse");
    let mut config = common::test_config(false);
    config.pipeline.cycle_limit = 60;
    let mut cpu = apex_sim::core::Cpu::new(program, &config);
    let reason = cpu.run();
    assert_eq!(reason, ExitReason::CycleLimit);
    assert_eq!(cpu.stats.cycles, 60);
}
