use crate::memory::TypeAddr;

/// VF doubles as carry, not-borrow, shifted-out bit and sprite collision.
pub const FLAG_REGISTER: u8 = 0xF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    /// Vx += value, dropping the carry. VF is left alone.
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let reg = &mut self.registers[(reg_num & 0xF) as usize];
        *reg = reg.wrapping_add(value);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.registers[FLAG_REGISTER as usize] = set as u8;
    }

    pub fn flag(&self) -> u8 {
        self.registers[FLAG_REGISTER as usize]
    }

    /// V0..=Vlast, the window used by the register dump/load instructions.
    pub fn range(&self, last: u8) -> &[u8] {
        &self.registers[..=(last & 0xF) as usize]
    }

    pub fn range_mut(&mut self, last: u8) -> &mut [u8] {
        &mut self.registers[..=(last & 0xF) as usize]
    }

    pub fn as_array(&self) -> &[u8; 16] {
        &self.registers
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2);
    }

    /// Steps back onto the instruction that was just fetched.
    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2);
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRegister(pub TypeAddr);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr;
    }

    pub fn add(&mut self, offset: u8) {
        self.0 = self.0.wrapping_add(offset as TypeAddr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_to_register_wraps_without_touching_flag() {
        let mut regs = Registers::new();
        regs.set_register(0x3, 0xFF);
        regs.add_to_register(0x3, 0x02);
        assert_eq!(regs.get(0x3), 0x01);
        assert_eq!(regs.flag(), 0);
    }

    #[test]
    fn range_is_inclusive() {
        let mut regs = Registers::new();
        regs.range_mut(0x2).copy_from_slice(&[1, 2, 3]);
        assert_eq!(regs.range(0x2), &[1, 2, 3]);
        assert_eq!(regs.get(0x3), 0);
    }

    #[test]
    fn program_counter_steps_by_instruction_width() {
        let mut pc = ProgramCounter(0x200);
        pc.increment();
        assert_eq!(pc.0, 0x202);
        pc.decrement();
        assert_eq!(pc.0, 0x200);
    }
}
