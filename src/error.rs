use std::io;

use thiserror::Error;

use crate::memory::TypeAddr;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a ROM from loading or a cycle from completing.
#[derive(Debug, Error)]
pub enum Error {
    /// the ROM source could not be read
    #[error("unable to read rom: {0}")]
    Io(#[from] io::Error),

    #[error("rom is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("stack overflow: call at {pc:#05X} with every stack slot in use")]
    StackOverflow { pc: TypeAddr },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: TypeAddr },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    /// a `Config` whose font or program region breaks the memory map
    #[error("invalid memory layout: {0}")]
    InvalidLayout(String),
}
