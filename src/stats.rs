//! Simulation statistics collection and reporting.
//!
//! Tracks cycle counts, committed-instruction mix, stall breakdown, and
//! control-flow events for performance analysis of the two hazard modes.

use std::time::Instant;

use crate::isa::Opcode;

/// Simulation statistics structure tracking all performance metrics.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_committed: u64,

    pub inst_alu: u64,
    pub inst_move: u64,
    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,
    pub inst_halt: u64,

    pub stalls_data: u64,
    pub stalls_control: u64,
    pub stalls_structural: u64,

    pub branches_taken: u64,
    pub squashed_slots: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_committed: 0,
            inst_alu: 0,
            inst_move: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_halt: 0,
            stalls_data: 0,
            stalls_control: 0,
            stalls_structural: 0,
            branches_taken: 0,
            squashed_slots: 0,
        }
    }
}

impl SimStats {
    /// Records one committed instruction at writeback.
    pub fn note_commit(&mut self, op: Opcode) {
        if op == Opcode::Nop {
            return;
        }
        self.instructions_committed += 1;
        match op {
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::And | Opcode::Or | Opcode::Xor => {
                self.inst_alu += 1;
            }
            Opcode::Movc => self.inst_move += 1,
            Opcode::Load | Opcode::Ldr => self.inst_load += 1,
            Opcode::Store => self.inst_store += 1,
            Opcode::Bz | Opcode::Bnz | Opcode::Jump => self.inst_branch += 1,
            Opcode::Halt => self.inst_halt += 1,
            Opcode::Nop => {}
        }
    }

    /// Prints a formatted summary of all simulation statistics.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let instr = if self.instructions_committed == 0 {
            1
        } else {
            self.instructions_committed
        };

        let ipc = self.instructions_committed as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;

        let pct = |n: u64, d: u64| (n as f64 / d as f64) * 100.0;

        println!("\n==========================================================");
        println!("APEX PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_committed);
        println!("sim_ipc                  {:.4}", ipc);
        println!("sim_cpi                  {:.4}", cpi);
        println!("----------------------------------------------------------");
        println!("STALL BREAKDOWN");
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            pct(self.stalls_data, cyc)
        );
        println!(
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            pct(self.stalls_control, cyc)
        );
        println!(
            "  stalls.structural      {} ({:.2}%)",
            self.stalls_structural,
            pct(self.stalls_structural, cyc)
        );
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            pct(self.inst_alu, instr)
        );
        println!(
            "  op.movc                {} ({:.2}%)",
            self.inst_move,
            pct(self.inst_move, instr)
        );
        println!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            pct(self.inst_load, instr)
        );
        println!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            pct(self.inst_store, instr)
        );
        println!(
            "  op.branch              {} ({:.2}%)",
            self.inst_branch,
            pct(self.inst_branch, instr)
        );
        println!(
            "  op.halt                {} ({:.2}%)",
            self.inst_halt,
            pct(self.inst_halt, instr)
        );
        println!("----------------------------------------------------------");
        println!("CONTROL FLOW");
        println!("  branches.taken         {}", self.branches_taken);
        println!("  squashed.slots         {}", self.squashed_slots);
        println!("==========================================================");
    }
}
