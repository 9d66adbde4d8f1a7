// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Stack of 16 return addresses
//
// Delay timer & Sound timer: count down once per cycle until 0
// (or on the host's clock, see `TimerMode`)
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::{Config, TimerMode};
pub use decode::{OpCodes, RawInstruction};
pub use display::{FrameBuffer, HEIGHT, PIXEL_OFF, PIXEL_ON, WIDTH};
pub use emulator::{CpuState, Emulator};
pub use error::{Error, Result};
pub use memory::TypeAddr;
