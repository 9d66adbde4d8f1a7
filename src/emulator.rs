use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::{Config, TimerMode},
    decode::OpCodes,
    display::FrameBuffer,
    error::{Error, Result},
    keyboard::{Keyboard, KEY_COUNT},
    memory::{Memory, TypeAddr},
    registers::Registers,
    timer::Timer,
};

/// Whether the next cycle fetches, or keeps polling the keypad for Fx0A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    /// Fx0A found no key held; the pc sits on the Fx0A word and the key
    /// goes into Vx once one is pressed.
    AwaitingKey(u8),
}

/// A complete interpreter: memory, registers, stack, timers, screen, keypad
/// and the random source, all owned by one instance and driven one
/// `cycle()` at a time by the host.
pub struct Emulator {
    fb: FrameBuffer,
    pub regs: Registers,
    pub mem: Memory,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    pub keyboard: Keyboard,
    rng: StdRng,
    state: CpuState,
    timer_mode: TimerMode,
    redraw: bool,
}

impl Emulator {
    /// Default memory layout, RNG seeded from the system clock.
    pub fn new() -> Self {
        Self::init(Config::default(), time_seed())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::init(config, time_seed()))
    }

    /// Like [`Emulator::with_config`] but with a fixed RNG seed, so `CXNN`
    /// produces the same bytes on every run.
    pub fn with_seed(config: Config, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::init(config, seed))
    }

    fn init(config: Config, seed: u64) -> Self {
        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(&config),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            keyboard: Keyboard::new(),
            rng: StdRng::seed_from_u64(seed),
            state: CpuState::Running,
            timer_mode: config.timer_mode,
            redraw: false,
        }
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<()> {
        self.mem.load_rom(bytes)
    }

    pub fn load_rom_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        self.mem.load_rom_from_reader(reader)
    }

    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.mem.load_rom_by_file(path)
    }

    /// Runs one instruction (or one key poll while waiting on Fx0A), then
    /// decrements both timers unless the host drives them itself.
    ///
    /// A fault stops the cycle before the faulting instruction changes any
    /// state, and the timers are left alone.
    pub fn cycle(&mut self) -> Result<()> {
        self.tick()?;
        if self.timer_mode == TimerMode::PerCycle {
            self.tick_timers();
        }
        Ok(())
    }

    /// One instruction, or one key poll while waiting on Fx0A, without
    /// touching the timers.
    pub fn tick(&mut self) -> Result<()> {
        match self.state {
            CpuState::Running => {
                let operation = self.fetch_decode()?;
                self.execute_ins(operation)
            }
            CpuState::AwaitingKey(vx) => {
                self.poll_key(vx);
                Ok(())
            }
        }
    }

    fn fetch_decode(&mut self) -> Result<OpCodes> {
        let at = self.mem.pc.0;
        let ins = self.mem.next_instruction()?;
        let operation = OpCodes::decode_raw(ins);
        log::trace!("{at:#05X}: {ins:04X} {operation:?}");
        Ok(operation)
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    fn poll_key(&mut self, vx: u8) {
        if let Some(key) = self.keyboard.first_pressed() {
            log::debug!("key {key:X} pressed, resuming");
            self.regs.set_register(vx, key);
            self.mem.increment_pc();
            self.state = CpuState::Running;
        }
    }

    /// Executes an already fetched instruction; the pc points past it.
    fn execute_ins(&mut self, ins: OpCodes) -> Result<()> {
        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
                self.redraw = true;
            }
            OpCodes::PopSubroutine => {
                let addr = self.mem.stack.pop().ok_or(Error::StackUnderflow {
                    pc: self.current_addr(),
                })?;
                self.mem.set_pc(addr);
            }
            OpCodes::Jump(addr) => {
                self.mem.set_pc(addr);
            }
            OpCodes::PushSubroutine(addr) => {
                // the pc already points at the instruction to return to
                let pc = self.mem.pc.0;
                self.mem.stack.push(pc).ok_or(Error::StackOverflow {
                    pc: self.current_addr(),
                })?;
                self.mem.set_pc(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // Flag-producing ops read both operands up front, write VF, then
            // write Vx. With x = F the result is what remains in VF.
            OpCodes::Add(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                let (sum, carry) = x.overflowing_add(y);
                self.regs.set_flag(carry);
                self.regs.set_register(vx, sum);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                // strictly greater: equal operands give VF = 0
                self.regs.set_flag(x > y);
                self.regs.set_register(vx, x.wrapping_sub(y));
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_flag(y > x);
                self.regs.set_register(vx, y.wrapping_sub(x));
            }
            OpCodes::RightShift(vx) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_flag(vx_value & 1 == 1);
                self.regs.set_register(vx, vx_value >> 1);
            }
            OpCodes::LeftShift(vx) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_flag((vx_value >> 7) & 1 == 1);
                self.regs.set_register(vx, vx_value << 1);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.set_index(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.mem
                    .set_pc(addr.wrapping_add(self.regs.get(0) as TypeAddr));
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // one byte per row, 8 pixels wide, from I to I + N
                let sprite = self.mem.slice(self.mem.index.0 as usize, height as usize)?;
                let vf = self.fb.paint(x, y, sprite);
                self.regs.set_flag(vf);
                self.redraw = true;
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keyboard.get_key_status_from_num(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keyboard.get_key_status_from_num(self.regs.get(vx)) {
                    self.mem.increment_pc();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.count),
            OpCodes::GetKey(vx) => match self.keyboard.first_pressed() {
                Some(key) => self.regs.set_register(vx, key),
                None => {
                    log::debug!("waiting for a key for V{vx:X}");
                    self.mem.decrement_pc();
                    self.state = CpuState::AwaitingKey(vx);
                }
            },
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => {
                self.mem.index.add(self.regs.get(vx));
            }
            OpCodes::PointChar(vx) => {
                let addr = self.mem.font.glyph_addr(self.regs.get(vx));
                self.mem.set_index(addr);
            }
            OpCodes::ToDecimal(vx) => {
                let mut in_decimal = self.regs.get(vx);
                let digits = self.mem.slice_mut(self.mem.index.0 as usize, 3)?;
                // units land last, hundreds first
                for digit in digits.iter_mut().rev() {
                    *digit = in_decimal % 10;
                    in_decimal /= 10;
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let count = (vx & 0xF) as usize + 1;
                let dest = self.mem.slice_mut(self.mem.index.0 as usize, count)?;
                dest.copy_from_slice(self.regs.range(vx));
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let count = (vx & 0xF) as usize + 1;
                let src = self.mem.slice(self.mem.index.0 as usize, count)?;
                self.regs.range_mut(vx).copy_from_slice(src);
            }
            OpCodes::Unimplemented(code) => {
                log::warn!("ignoring unassigned opcode {code:04X}");
            }
        }
        Ok(())
    }

    /// Address of the instruction being executed.
    fn current_addr(&self) -> TypeAddr {
        self.mem.pc.0.wrapping_sub(2)
    }

    pub fn press_key(&mut self, key: u8) {
        self.keyboard.update_key(key, true);
    }

    pub fn release_key(&mut self, key: u8) {
        self.keyboard.update_key(key, false);
    }

    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keyboard.set_all(keys);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    /// True once after each clear or draw; the host re-renders on true.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.count
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.state, CpuState::AwaitingKey(_))
    }

    pub fn registers(&self) -> &[u8; 16] {
        self.regs.as_array()
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.0
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.0
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
