pub const KEY_COUNT: usize = 16;

/// The 16-key hex pad, indexed by key value 0x0..=0xF.
///
/// Written by the host between cycles; the interpreter only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Keys past 0xF are ignored.
    pub fn update_key(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(key as usize) {
            *slot = pressed;
        }
    }

    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// Only the low nibble of `n` selects the key.
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    /// Lowest-numbered key currently held, scanning 0 through F.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}
