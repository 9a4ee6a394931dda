use std::fmt;

use crate::common::constants::{HALT_DRAIN_STAGES, PC_BASE};
use crate::config::{Config, SimMode};
use crate::core::arch::{Flags, RegisterFile};
use crate::core::mem::DataMemory;
use crate::core::pipeline::{BypassBus, Pipeline, StageLatch};
use crate::core::stages;
use crate::isa::{code_index, Instruction, Program};
use crate::sim::trace::{ConsoleTrace, PipeStage, SilentTrace, TraceSink};
use crate::stats::SimStats;

/// Why the simulation loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// Every program instruction has committed.
    ProgramComplete,
    /// The configured cycle budget ran out.
    CycleLimit,
    /// A HALT drained through four pipeline stages.
    HaltDrained,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExitReason::ProgramComplete => "all instructions committed",
            ExitReason::CycleLimit => "cycle budget reached",
            ExitReason::HaltDrained => "halt drained",
        };
        f.write_str(text)
    }
}

pub struct Cpu {
    pub regs: RegisterFile,
    pub flags: Flags,
    pub pc: i64,
    pub data_memory: DataMemory,
    pub program: Program,
    pub pipeline: Pipeline,
    pub ex_bypass: BypassBus,
    pub mem_bypass: BypassBus,
    pub forwarding: bool,
    /// HALT drain counter: 1 once decoded, bumped again by each later stage.
    pub halting: u8,
    /// Index one past the most recently committed instruction; a taken
    /// branch snaps it to the branch target's index.
    pub ins_completed: usize,
    pub cycle_limit: u64,
    pub stats: SimStats,
    sink: Box<dyn TraceSink>,
}

impl Cpu {
    pub fn new(program: Program, config: &Config) -> Self {
        let display =
            matches!(config.general.mode, SimMode::Display) || cfg!(feature = "always-trace");
        let sink: Box<dyn TraceSink> = if display {
            Box::new(ConsoleTrace::new())
        } else {
            Box::new(SilentTrace)
        };
        Self::with_sink(program, config, sink)
    }

    pub fn with_sink(program: Program, config: &Config, sink: Box<dyn TraceSink>) -> Self {
        Self {
            regs: RegisterFile::new(),
            flags: Flags::default(),
            pc: PC_BASE,
            data_memory: DataMemory::new(),
            program,
            pipeline: Pipeline::new(),
            ex_bypass: BypassBus::new(),
            mem_bypass: BypassBus::new(),
            forwarding: config.pipeline.forwarding,
            halting: 0,
            ins_completed: 0,
            cycle_limit: config.pipeline.cycle_limit,
            stats: SimStats::default(),
            sink,
        }
    }

    /// Advances the machine by one clock cycle.
    ///
    /// Stages run writeback-first so that a result committed this cycle is
    /// readable through the register file by decode this same cycle, while
    /// latch contents themselves move exactly one stage per cycle.
    pub fn tick(&mut self) {
        self.sink.begin_cycle(self.stats.cycles + 1);
        stages::write_back::wb_stage(self);
        stages::memory_access::mem_stage(self);
        stages::execute::execute_stage(self);
        stages::decode::decode_stage(self);
        stages::fetch::fetch_stage(self);
        self.sink.end_cycle();
        self.stats.cycles += 1;
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        if self.ins_completed >= self.program.len() {
            Some(ExitReason::ProgramComplete)
        } else if self.stats.cycles >= self.cycle_limit {
            Some(ExitReason::CycleLimit)
        } else if self.halting >= HALT_DRAIN_STAGES {
            Some(ExitReason::HaltDrained)
        } else {
            None
        }
    }

    /// Runs until a termination condition fires.
    pub fn run(&mut self) -> ExitReason {
        loop {
            if let Some(reason) = self.exit_reason() {
                return reason;
            }
            self.tick();
        }
    }

    /// Redirects the PC and squashes the two front latches. Called from
    /// execute when a branch resolves taken or a JUMP executes.
    pub(crate) fn take_branch(&mut self, latch: &mut StageLatch, target: i64) {
        let mut squashed: u64 = 0;
        if !self.pipeline.fetch.is_empty() {
            squashed += 1;
        }
        if !self.pipeline.decode.is_empty() {
            squashed += 1;
        }
        self.stats.squashed_slots += squashed;
        self.stats.branches_taken += 1;

        self.pipeline.squash_front();
        self.pc = target;
        latch.taken = true;
        // A HALT sitting in the squashed slots must not stop the refilled
        // pipe; one already past execute keeps draining regardless.
        self.halting = 0;
        self.ins_completed = code_index(target).unwrap_or(0);
    }

    pub(crate) fn record(&mut self, stage: PipeStage, latch: Option<StageLatch>) {
        match latch {
            Some(l) => self.sink.stage(stage, l.pc, l.inst.to_string()),
            None => self.sink.stage(stage, 0, Instruction::NOP.to_string()),
        }
    }
}
