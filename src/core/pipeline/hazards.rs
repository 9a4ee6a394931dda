//! Hazard detection and operand resolution for the decode stage.

use crate::core::arch::RegisterFile;
use crate::core::pipeline::bypass::{BypassBus, BypassEntry};
use crate::core::pipeline::latches::StageState;

/// A conditional branch may not leave decode while a flag-setting
/// instruction occupies the memory or writeback slot: Z/NZ are produced at
/// writeback and must be stable by the time execute evaluates the branch.
pub fn flag_hazard(memory: &StageState, writeback: &StageState) -> bool {
    memory.holds_flag_setter() || writeback.holds_flag_setter()
}

/// Resolves source operands for decode against the bypass network, the
/// scoreboard, and the register file.
pub struct OperandResolver<'a> {
    pub forwarding: bool,
    pub ex_bypass: &'a BypassBus,
    pub mem_bypass: &'a BypassBus,
    /// The memory-stage slot, consulted to refuse EX bypass of a load
    /// result: a LOAD/LDR value does not exist until the memory stage, so
    /// a dependent must take the MEM bypass one cycle later.
    pub memory: &'a StageState,
    pub regs: &'a RegisterFile,
}

impl OperandResolver<'_> {
    /// Returns the operand value, or `None` when decode must stall.
    ///
    /// Forwarding mode priority: EX bypass (unless the memory slot holds a
    /// LOAD/LDR destined for this register), then MEM bypass, then the
    /// register file when the scoreboard shows no pending writer.
    /// Without forwarding only the register file path exists.
    ///
    /// A bus entry is honored only when its producer is the register's
    /// *youngest* in-flight writer; otherwise a lingering entry from an
    /// older writer would be read while a newer LOAD or ALU op is still
    /// on its way to the same register.
    pub fn resolve(&self, reg: usize) -> Option<i64> {
        if self.forwarding {
            if let Some(entry) = self.ex_bypass.lookup(reg) {
                if self.entry_is_current(reg, entry) && !self.memory.holds_load_to(reg) {
                    return Some(entry.value);
                }
            }
            if let Some(entry) = self.mem_bypass.lookup(reg) {
                if self.entry_is_current(reg, entry) {
                    return Some(entry.value);
                }
            }
        }
        if self.regs.is_valid(reg) {
            return Some(self.regs.read(reg));
        }
        None
    }

    fn entry_is_current(&self, reg: usize, entry: BypassEntry) -> bool {
        self.regs.pending_writer(reg) == Some(entry.producer_pc)
    }
}
