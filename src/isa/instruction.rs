//! Instruction representation, disassembly, and text parsing.
//!
//! The opcode is a closed enum; operand shape (which of rd/rs1/rs2/imm an
//! opcode actually uses) is a pure function of the tag, and so is the
//! disassembly. `Display` and `FromStr` are inverses: parsing a rendered
//! instruction yields the original fields for every opcode.

use std::fmt;
use std::str::FromStr;

use crate::common::constants::REG_COUNT;
use crate::common::error::InstrParseError;

/// APEX opcode tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Opcode {
    Movc,
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    Load,
    Ldr,
    Store,
    Bz,
    Bnz,
    Jump,
    Halt,
    #[default]
    Nop,
}

impl Opcode {
    pub fn as_str(self) -> &'static str {
        match self {
            Opcode::Movc => "MOVC",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Load => "LOAD",
            Opcode::Ldr => "LDR",
            Opcode::Store => "STORE",
            Opcode::Bz => "BZ",
            Opcode::Bnz => "BNZ",
            Opcode::Jump => "JUMP",
            Opcode::Halt => "HALT",
            Opcode::Nop => "NOP",
        }
    }

    /// Whether this opcode reads a first source register in decode.
    pub fn reads_rs1(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Load
                | Opcode::Ldr
                | Opcode::Store
                | Opcode::Jump
        )
    }

    /// Whether this opcode reads a second source register in decode.
    pub fn reads_rs2(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Ldr
                | Opcode::Store
        )
    }

    /// Whether this opcode commits a destination register in writeback.
    pub fn writes_rd(self) -> bool {
        matches!(
            self,
            Opcode::Movc
                | Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Load
                | Opcode::Ldr
        )
    }

    /// Only ADD/SUB/MUL update the Z/NZ flags at writeback.
    pub fn sets_flags(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul)
    }

    /// LOAD/LDR produce their value in the memory stage, one cycle after
    /// execute; their result is never available on the EX bypass.
    pub fn is_memory_read(self) -> bool {
        matches!(self, Opcode::Load | Opcode::Ldr)
    }

    pub fn is_conditional_branch(self) -> bool {
        matches!(self, Opcode::Bz | Opcode::Bnz)
    }

    /// Whether committing this opcode advances the completed-instruction
    /// index (branches, HALT, and NOP do not).
    pub fn advances_commit(self) -> bool {
        self.writes_rd() || self == Opcode::Store
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Opcode {
    type Err = InstrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MOVC" => Ok(Opcode::Movc),
            "ADD" => Ok(Opcode::Add),
            "SUB" => Ok(Opcode::Sub),
            "MUL" => Ok(Opcode::Mul),
            "AND" => Ok(Opcode::And),
            "OR" => Ok(Opcode::Or),
            "XOR" => Ok(Opcode::Xor),
            "LOAD" => Ok(Opcode::Load),
            "LDR" => Ok(Opcode::Ldr),
            "STORE" => Ok(Opcode::Store),
            "BZ" => Ok(Opcode::Bz),
            "BNZ" => Ok(Opcode::Bnz),
            "JUMP" => Ok(Opcode::Jump),
            "HALT" => Ok(Opcode::Halt),
            "NOP" => Ok(Opcode::Nop),
            other => Err(InstrParseError::UnknownMnemonic(other.to_string())),
        }
    }
}

/// One decoded instruction. Fields unused by the opcode are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Instruction {
    pub opcode: Opcode,
    pub rd: usize,
    pub rs1: usize,
    pub rs2: usize,
    pub imm: i64,
}

impl Instruction {
    pub const NOP: Instruction = Instruction {
        opcode: Opcode::Nop,
        rd: 0,
        rs1: 0,
        rs2: 0,
        imm: 0,
    };
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode;
        match op {
            Opcode::Movc => write!(f, "{},R{},#{}", op, self.rd, self.imm),
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::And | Opcode::Or | Opcode::Xor => {
                write!(f, "{},R{},R{},R{}", op, self.rd, self.rs1, self.rs2)
            }
            Opcode::Load => write!(f, "{},R{},R{},#{}", op, self.rd, self.rs1, self.imm),
            Opcode::Ldr => write!(f, "{},R{},R{},R{}", op, self.rd, self.rs1, self.rs2),
            Opcode::Store => write!(f, "{},R{},R{},#{}", op, self.rs1, self.rs2, self.imm),
            Opcode::Bz | Opcode::Bnz => write!(f, "{},#{}", op, self.imm),
            Opcode::Jump => write!(f, "{},R{},#{}", op, self.rs1, self.imm),
            Opcode::Halt | Opcode::Nop => write!(f, "{}", op),
        }
    }
}

fn parse_reg(token: &str) -> Result<usize, InstrParseError> {
    let bad = || InstrParseError::BadRegister(token.to_string());
    let digits = token
        .strip_prefix('R')
        .or_else(|| token.strip_prefix('r'))
        .ok_or_else(bad)?;
    let idx: usize = digits.parse().map_err(|_| bad())?;
    if idx >= REG_COUNT {
        return Err(bad());
    }
    Ok(idx)
}

fn parse_imm(token: &str) -> Result<i64, InstrParseError> {
    let bad = || InstrParseError::BadImmediate(token.to_string());
    let digits = token.strip_prefix('#').ok_or_else(bad)?;
    digits.parse().map_err(|_| bad())
}

impl FromStr for Instruction {
    type Err = InstrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let mnemonic = parts.next().unwrap_or("");
        let opcode: Opcode = mnemonic.parse()?;
        let operands: Vec<&str> = parts.collect();

        let expect = |n: usize| -> Result<(), InstrParseError> {
            if operands.len() == n {
                Ok(())
            } else {
                Err(InstrParseError::OperandCount {
                    mnemonic: opcode.as_str(),
                    expected: n,
                    found: operands.len(),
                })
            }
        };

        let mut inst = Instruction {
            opcode,
            ..Instruction::NOP
        };
        match opcode {
            Opcode::Movc => {
                expect(2)?;
                inst.rd = parse_reg(operands[0])?;
                inst.imm = parse_imm(operands[1])?;
            }
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::And | Opcode::Or | Opcode::Xor => {
                expect(3)?;
                inst.rd = parse_reg(operands[0])?;
                inst.rs1 = parse_reg(operands[1])?;
                inst.rs2 = parse_reg(operands[2])?;
            }
            Opcode::Load => {
                expect(3)?;
                inst.rd = parse_reg(operands[0])?;
                inst.rs1 = parse_reg(operands[1])?;
                inst.imm = parse_imm(operands[2])?;
            }
            Opcode::Ldr => {
                expect(3)?;
                inst.rd = parse_reg(operands[0])?;
                inst.rs1 = parse_reg(operands[1])?;
                inst.rs2 = parse_reg(operands[2])?;
            }
            Opcode::Store => {
                expect(3)?;
                inst.rs1 = parse_reg(operands[0])?;
                inst.rs2 = parse_reg(operands[1])?;
                inst.imm = parse_imm(operands[2])?;
            }
            Opcode::Bz | Opcode::Bnz => {
                expect(1)?;
                inst.imm = parse_imm(operands[0])?;
            }
            Opcode::Jump => {
                expect(2)?;
                inst.rs1 = parse_reg(operands[0])?;
                inst.imm = parse_imm(operands[1])?;
            }
            Opcode::Halt | Opcode::Nop => expect(0)?,
        }
        Ok(inst)
    }
}
