//! Stage functions, one per pipeline stage.
//!
//! `Cpu::tick` calls these in reverse pipeline order (writeback first), so
//! within one cycle each stage consumes the latch its upstream neighbour
//! deposited on the previous cycle.

pub mod decode;
pub mod execute;
pub mod fetch;
pub mod memory_access;
pub mod write_back;
