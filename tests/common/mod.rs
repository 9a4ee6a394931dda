#![allow(dead_code)]

use apex_sim::config::{Config, GeneralConfig, PipelineConfig, SimMode};
use apex_sim::core::{Cpu, ExitReason};
use apex_sim::isa::Program;

/// Creates a minimal configuration for testing.
pub fn test_config(forwarding: bool) -> Config {
    Config {
        general: GeneralConfig {
            mode: SimMode::Silent,
        },
        pipeline: PipelineConfig {
            forwarding,
            cycle_limit: 500,
        },
    }
}

/// Parses and runs a program to completion in the given hazard mode.
pub fn run_program(src: &str, forwarding: bool) -> (Cpu, ExitReason) {
    let program = Program::parse(src).expect("program should parse");
    let mut cpu = Cpu::new(program, &test_config(forwarding));
    let reason = cpu.run();
    (cpu, reason)
}
