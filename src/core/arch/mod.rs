pub mod flags;
pub mod regfile;

pub use flags::Flags;
pub use regfile::RegisterFile;
