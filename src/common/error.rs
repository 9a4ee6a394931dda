//! Error types for simulator initialization and program parsing.
//!
//! There are no recoverable runtime errors inside the pipeline itself:
//! stalls are scheduling, not failures. Everything here is reported before
//! the first simulated cycle.

use std::io;

use thiserror::Error;

/// Top-level simulator error.
#[derive(Debug, Error)]
pub enum SimError {
    /// The program file could not be read.
    #[error("failed to read program '{path}': {source}")]
    ProgramRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A line of the program file did not parse as an instruction.
    #[error("program line {line}: {source}")]
    ProgramParse {
        line: usize,
        #[source]
        source: InstrParseError,
    },

    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The configuration file did not parse as TOML.
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// The final state could not be serialized for `--json` output.
    #[error("failed to serialize final state: {0}")]
    Report(#[from] serde_json::Error),
}

/// A single instruction failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstrParseError {
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),

    #[error("'{mnemonic}' expects {expected} operand(s), found {found}")]
    OperandCount {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("bad register operand '{0}'")]
    BadRegister(String),

    #[error("bad immediate operand '{0}'")]
    BadImmediate(String),
}
