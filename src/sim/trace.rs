//! Pluggable per-cycle trace sink.
//!
//! Stage functions report the latch they processed as they run (writeback
//! first); the console sink buffers one line per stage and prints the block
//! in front-to-back order at the end of the cycle.

/// Display identity of a pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeStage {
    Fetch,
    Decode,
    Execute,
    Memory,
    Writeback,
}

impl PipeStage {
    pub fn label(self) -> &'static str {
        match self {
            PipeStage::Fetch => "Fetch",
            PipeStage::Decode => "Decode/RF",
            PipeStage::Execute => "Execute",
            PipeStage::Memory => "Memory",
            PipeStage::Writeback => "Writeback",
        }
    }

    fn slot(self) -> usize {
        match self {
            PipeStage::Fetch => 0,
            PipeStage::Decode => 1,
            PipeStage::Execute => 2,
            PipeStage::Memory => 3,
            PipeStage::Writeback => 4,
        }
    }
}

const STAGE_ORDER: [PipeStage; 5] = [
    PipeStage::Fetch,
    PipeStage::Decode,
    PipeStage::Execute,
    PipeStage::Memory,
    PipeStage::Writeback,
];

pub trait TraceSink {
    fn begin_cycle(&mut self, cycle: u64);
    fn stage(&mut self, stage: PipeStage, pc: i64, disasm: String);
    fn end_cycle(&mut self);
}

/// Drops every event; used in silent mode and by tests.
pub struct SilentTrace;

impl TraceSink for SilentTrace {
    fn begin_cycle(&mut self, _cycle: u64) {}
    fn stage(&mut self, _stage: PipeStage, _pc: i64, _disasm: String) {}
    fn end_cycle(&mut self) {}
}

/// Renders the classic per-cycle stage dump to stdout.
pub struct ConsoleTrace {
    lines: [Option<(i64, String)>; 5],
}

impl ConsoleTrace {
    pub fn new() -> Self {
        Self {
            lines: Default::default(),
        }
    }
}

impl Default for ConsoleTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSink for ConsoleTrace {
    fn begin_cycle(&mut self, cycle: u64) {
        println!("--------------------------------");
        println!("Clock Cycle #: {}", cycle);
        println!("--------------------------------");
    }

    fn stage(&mut self, stage: PipeStage, pc: i64, disasm: String) {
        self.lines[stage.slot()] = Some((pc, disasm));
    }

    fn end_cycle(&mut self) {
        for stage in STAGE_ORDER {
            let (pc, text) = self.lines[stage.slot()]
                .take()
                .unwrap_or((0, String::from("NOP")));
            println!("{:<15}: pc({}) {}", stage.label(), pc, text);
        }
    }
}
