use crate::error::{Error, Result};
use crate::memory::{TypeAddr, GLYPH_SIZE, MEMORY_SIZE};

/// Where the program is loaded; everything below is reserved.
pub const DEFAULT_LOAD_ADDRESS: TypeAddr = 0x200;
/// Font data stored from 050 -> 09F (000 -> 04F is empty by convention)
pub const DEFAULT_FONT_ADDRESS: TypeAddr = 0x50;

/// Who decrements the delay and sound timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// once at the end of every `cycle()`
    #[default]
    PerCycle,
    /// only when the host calls `tick_timers()`, e.g. at 60Hz
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub load_address: TypeAddr,
    pub font_address: TypeAddr,
    pub timer_mode: TimerMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_address: DEFAULT_LOAD_ADDRESS,
            font_address: DEFAULT_FONT_ADDRESS,
            timer_mode: TimerMode::default(),
        }
    }
}

impl Config {
    /// Checks that the font sits inside the reserved region below the
    /// program and that the program starts at or after 0x200.
    pub fn validate(&self) -> Result<()> {
        let font_start = self.font_address as usize;
        let font_end = font_start + GLYPH_SIZE * 16;
        let load_address = self.load_address as usize;
        if font_end > MEMORY_SIZE {
            return Err(Error::MemoryOutOfBounds { address: font_end });
        }
        if load_address >= MEMORY_SIZE {
            return Err(Error::MemoryOutOfBounds {
                address: load_address,
            });
        }
        if load_address < DEFAULT_LOAD_ADDRESS as usize {
            return Err(Error::InvalidLayout(format!(
                "load address {load_address:#05X} is inside the reserved region"
            )));
        }
        if font_end > load_address {
            return Err(Error::InvalidLayout(format!(
                "font at {font_start:#05X}..{font_end:#05X} overlaps the program at {load_address:#05X}"
            )));
        }
        Ok(())
    }
}
