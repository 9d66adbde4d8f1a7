use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use chip8vm::{FrameBuffer, HEIGHT, WIDTH};

/// The host window: shows the frame buffer and reads the keypad.
pub struct Screen {
    pub window: Window,
}

impl Screen {
    pub fn new(scale: Scale) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "chip8vm - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        window.set_position(500, 300);
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self { window })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::Yes)
    }

    /// Cells are already 0 / 0xFFFFFFFF, which minifb shows as black / white.
    pub fn draw(&mut self, frame: &FrameBuffer) -> Result<(), minifb::Error> {
        self.window.update_with_buffer(frame.pixels(), WIDTH, HEIGHT)
    }

    /// Pumps window events without touching the picture.
    pub fn update(&mut self) {
        self.window.update();
    }

    pub fn held_keys(&self) -> [bool; 16] {
        let mut keys = [false; 16];
        for key in self.window.get_keys() {
            if let Some(n) = key_to_num(key) {
                keys[n as usize] = true;
            }
        }
        keys
    }
}

pub fn scale_from(factor: u32) -> Option<Scale> {
    match factor {
        1 => Some(Scale::X1),
        2 => Some(Scale::X2),
        4 => Some(Scale::X4),
        8 => Some(Scale::X8),
        16 => Some(Scale::X16),
        32 => Some(Scale::X32),
        _ => None,
    }
}

/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
