use crate::memory::TypeAddr;

/// The latched 16-bit instruction word and its operand fields.
///
/// ```text
/// 0xD123
///   D    family        (bits 15-12)
///    1   x register    (bits 11-8)
///     2  y register    (bits 7-4)
///      3 n nibble      (bits 3-0)
///     23 kk byte       (bits 7-0)
///    123 nnn address   (bits 11-0)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit, m is length
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        //
        // 4 - (m) - (n - 1), n = 2
        let shift_places = (4 - m - (n - 1)) * 4;
        let mut mask = 0;
        for _ in 0..m {
            mask = (mask << 4) | 0b1111;
        }
        (self.code & (mask << shift_places)) >> shift_places
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn address(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, no carry
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),

    /// an unassigned slot in a sub-table; executes as a no-op
    Unimplemented(u16),
}

impl OpCodes {
    /// Primary table: the family nibble picks an operation, or one of the
    /// four sub-tables for families that share a leading nibble.
    pub fn decode_raw(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        match raw.family() {
            0x0 => Self::table_0(raw),
            0x1 => Self::Jump(raw.address()),
            0x2 => Self::PushSubroutine(raw.address()),
            0x3 => Self::SkipEqualConstant(x, raw.kk()),
            0x4 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.kk()),
            0x7 => Self::AddToRegister(x, raw.kk()),
            0x8 => Self::table_8(raw),
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.address()),
            0xB => Self::JumpWithOffset(raw.address()),
            0xC => Self::Random(x, raw.kk()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => Self::table_e(raw),
            _ => Self::table_f(raw),
        }
    }

    // keyed on the low nibble alone, so 0x0120 clears the screen too
    fn table_0(raw: RawInstruction) -> Self {
        match raw.n() {
            0x0 => Self::ClearScreen,
            0xE => Self::PopSubroutine,
            _ => Self::Unimplemented(raw.code()),
        }
    }

    fn table_8(raw: RawInstruction) -> Self {
        let (x, y) = (raw.x(), raw.y());
        match raw.n() {
            0x0 => Self::CopyRegister(x, y),
            0x1 => Self::Or(x, y),
            0x2 => Self::And(x, y),
            0x3 => Self::XOr(x, y),
            0x4 => Self::Add(x, y),
            0x5 => Self::SubtractForward(x, y),
            0x6 => Self::RightShift(x),
            0x7 => Self::SubtractBackward(x, y),
            0xE => Self::LeftShift(x),
            _ => Self::Unimplemented(raw.code()),
        }
    }

    // low nibble as well: E is 9E, 1 is A1
    fn table_e(raw: RawInstruction) -> Self {
        match raw.n() {
            0xE => Self::SkipIfPressed(raw.x()),
            0x1 => Self::SkipIfNotPressed(raw.x()),
            _ => Self::Unimplemented(raw.code()),
        }
    }

    fn table_f(raw: RawInstruction) -> Self {
        let x = raw.x();
        match raw.kk() {
            0x07 => Self::CopyDelayToRegister(x),
            0x0A => Self::GetKey(x),
            0x15 => Self::CopyRegisterToDelay(x),
            0x18 => Self::CopyRegisterToSound(x),
            0x1E => Self::AddToIndex(x),
            0x29 => Self::PointChar(x),
            0x33 => Self::ToDecimal(x),
            0x55 => Self::StoreRegisterToMemory(x),
            0x65 => Self::LoadRegisterFromMemory(x),
            _ => Self::Unimplemented(raw.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_manip() {
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
        assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
    }

    #[test]
    fn fields() {
        let raw = RawInstruction::new(0xABCD);
        assert_eq!(raw.family(), 0xA);
        assert_eq!(raw.x(), 0xB);
        assert_eq!(raw.y(), 0xC);
        assert_eq!(raw.n(), 0xD);
        assert_eq!(raw.kk(), 0xCD);
        assert_eq!(raw.address(), 0xBCD);
        assert!(raw == 0xABCD);
    }

    #[test]
    fn every_base_operation_decodes() {
        let cases = [
            (0x00E0, OpCodes::ClearScreen),
            (0x00EE, OpCodes::PopSubroutine),
            (0x1ABC, OpCodes::Jump(0xABC)),
            (0x2ABC, OpCodes::PushSubroutine(0xABC)),
            (0x3122, OpCodes::SkipEqualConstant(0x1, 0x22)),
            (0x4122, OpCodes::SkipNotEqualConstant(0x1, 0x22)),
            (0x5120, OpCodes::SkipEqualRegister(0x1, 0x2)),
            (0x6122, OpCodes::SetRegister(0x1, 0x22)),
            (0x7122, OpCodes::AddToRegister(0x1, 0x22)),
            (0x8120, OpCodes::CopyRegister(0x1, 0x2)),
            (0x8121, OpCodes::Or(0x1, 0x2)),
            (0x8122, OpCodes::And(0x1, 0x2)),
            (0x8123, OpCodes::XOr(0x1, 0x2)),
            (0x8124, OpCodes::Add(0x1, 0x2)),
            (0x8125, OpCodes::SubtractForward(0x1, 0x2)),
            (0x8126, OpCodes::RightShift(0x1)),
            (0x8127, OpCodes::SubtractBackward(0x1, 0x2)),
            (0x812E, OpCodes::LeftShift(0x1)),
            (0x9120, OpCodes::SkipNotEqualRegister(0x1, 0x2)),
            (0xAABC, OpCodes::SetIndexRegister(0xABC)),
            (0xBABC, OpCodes::JumpWithOffset(0xABC)),
            (0xC1F0, OpCodes::Random(0x1, 0xF0)),
            (0xD125, OpCodes::Display(0x1, 0x2, 0x5)),
            (0xE19E, OpCodes::SkipIfPressed(0x1)),
            (0xE1A1, OpCodes::SkipIfNotPressed(0x1)),
            (0xF107, OpCodes::CopyDelayToRegister(0x1)),
            (0xF10A, OpCodes::GetKey(0x1)),
            (0xF115, OpCodes::CopyRegisterToDelay(0x1)),
            (0xF118, OpCodes::CopyRegisterToSound(0x1)),
            (0xF11E, OpCodes::AddToIndex(0x1)),
            (0xF129, OpCodes::PointChar(0x1)),
            (0xF133, OpCodes::ToDecimal(0x1)),
            (0xF155, OpCodes::StoreRegisterToMemory(0x1)),
            (0xF165, OpCodes::LoadRegisterFromMemory(0x1)),
        ];
        for (word, expected) in cases {
            assert_eq!(OpCodes::decode_raw(word), expected, "{word:#06X}");
        }
    }

    #[test]
    fn unassigned_sub_table_slots_are_noops() {
        for word in [0x0123, 0x812F, 0x8128, 0xE1A2, 0xF1FF, 0xF166] {
            assert_eq!(OpCodes::decode_raw(word), OpCodes::Unimplemented(word));
        }
    }

    #[test]
    fn sub_tables_ignore_the_middle_nibbles() {
        assert_eq!(OpCodes::decode_raw(0x0120), OpCodes::ClearScreen);
        assert_eq!(OpCodes::decode_raw(0x0FFE), OpCodes::PopSubroutine);
        assert_eq!(OpCodes::decode_raw(0xE30E), OpCodes::SkipIfPressed(0x3));
        assert_eq!(OpCodes::decode_raw(0xE3F1), OpCodes::SkipIfNotPressed(0x3));
        assert_eq!(OpCodes::decode_raw(0x512F), OpCodes::SkipEqualRegister(0x1, 0x2));
    }
}
