use std::{fs, io::Read, path::Path};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; GLYPH_SIZE * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const STACK_DEPTH: usize = 16;
/// bytes per hex digit glyph
pub const GLYPH_SIZE: usize = 5;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Font {
    data: FontBytes,
    base: TypeAddr,
}

impl Font {
    fn at(base: TypeAddr) -> Self {
        Self {
            data: DEFAULT_FONT,
            base,
        }
    }

    /// Address of the glyph for a hex digit; only the low nibble counts.
    pub fn glyph_addr(&self, digit: u8) -> TypeAddr {
        self.base + (GLYPH_SIZE as TypeAddr) * (digit & 0xF) as TypeAddr
    }
}

pub struct Memory {
    // 4k bytes
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub font: Font,
    pub stack: Stack,
    load_address: TypeAddr,
}

impl Memory {
    /// Fresh memory with the font copied in and the pc at the load address.
    ///
    /// Font bytes that would land past the end of memory are dropped; callers
    /// validate the layout with [`Config::validate`] first.
    pub fn new(config: &Config) -> Self {
        let font = Font::at(config.font_address);
        let mut bytes = [0; MEMORY_SIZE];
        let start = config.font_address as usize;
        for (slot, glyph_byte) in bytes.iter_mut().skip(start).zip(font.data.iter()) {
            *slot = *glyph_byte;
        }

        Self {
            bytes,
            pc: ProgramCounter(config.load_address),
            index: IndexRegister(0x0),
            stack: Stack::new(),
            font,
            load_address: config.load_address,
        }
    }

    pub fn set(&mut self, addr: usize, val: u8) -> Result<()> {
        let slot = self
            .bytes
            .get_mut(addr)
            .ok_or(Error::MemoryOutOfBounds { address: addr })?;
        *slot = val;
        Ok(())
    }

    pub fn get(&self, addr: usize) -> Result<u8> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Error::MemoryOutOfBounds { address: addr })
    }

    /// `len` bytes starting at `addr`. A span running off the end reports
    /// `addr` if it is already outside memory, else the end of memory.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        check_span(addr, len)?;
        Ok(&self.bytes[addr..addr + len])
    }

    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        check_span(addr, len)?;
        Ok(&mut self.bytes[addr..addr + len])
    }

    /// skip the next instruction
    pub fn increment_pc(&mut self) {
        self.pc.increment();
    }

    pub fn decrement_pc(&mut self) {
        self.pc.decrement();
    }

    /// Reads the big-endian word at the pc and moves the pc past it.
    pub fn next_instruction(&mut self) -> Result<u16> {
        let at = self.pc.0 as usize;
        let (l, r) = (self.get(at)?, self.get(at + 1)?);
        self.increment_pc();
        Ok(((l as u16) << 8) | r as u16)
    }

    pub fn set_pc(&mut self, addr: TypeAddr) {
        self.pc.set_addr(addr);
    }

    pub fn set_index(&mut self, addr: TypeAddr) {
        self.index.set_addr(addr);
    }

    pub fn max_rom_size(&self) -> usize {
        MEMORY_SIZE.saturating_sub(self.load_address as usize)
    }

    /// Copies program bytes in at the load address. Nothing is written if
    /// the program does not fit.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        let max_size = self.max_rom_size();
        if bytes.len() > max_size {
            return Err(Error::RomTooLarge {
                size: bytes.len(),
                max_size,
            });
        }
        let start_index = self.load_address as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        log::debug!(
            "loaded {} byte rom at {:#05X}",
            bytes.len(),
            self.load_address
        );
        Ok(())
    }

    pub fn load_rom_from_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_rom(&program)
    }

    pub fn load_rom_by_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let program = fs::read(path)?;
        self.load_rom(&program)
    }
}

fn check_span(addr: usize, len: usize) -> Result<()> {
    let end = addr.saturating_add(len);
    if end > MEMORY_SIZE {
        let address = addr.max(MEMORY_SIZE);
        return Err(Error::MemoryOutOfBounds { address });
    }
    Ok(())
}

/// Return addresses for nested subroutine calls.
///
/// `sp` counts the frames in use: a push stores at `addresses[sp]` then
/// increments, a pop decrements then loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: u8,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// `None` when all 16 slots are taken.
    pub fn push(&mut self, addr: TypeAddr) -> Option<()> {
        let slot = self.addresses.get_mut(self.sp as usize)?;
        *slot = addr;
        self.sp += 1;
        Some(())
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.sp = self.sp.checked_sub(1)?;
        Some(self.addresses[self.sp as usize])
    }

    pub fn depth(&self) -> usize {
        self.sp as usize
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
