pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Cell value for a lit pixel; unlit cells are 0. Renders as white 0RGB.
pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
pub const PIXEL_OFF: u32 = 0;

/// 64x32 monochrome screen, row-major, ready to hand to a renderer as is.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixel_buffer: Vec<u32>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixel_buffer: vec![PIXEL_OFF; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.pixel_buffer.fill(PIXEL_OFF);
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixel_buffer
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < WIDTH && y < HEIGHT {
            Some(self.pixel_buffer[y * WIDTH + x])
        } else {
            None
        }
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(PIXEL_ON)
    }

    /// XORs `sprite` onto the screen with its top-left corner at (x, y).
    ///
    /// The origin wraps around the screen; rows and columns running off the
    /// right or bottom edge are clipped. Returns true if any lit pixel was
    /// switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (ox, oy) = (x as usize % WIDTH, y as usize % HEIGHT);
        log::trace!("painting sprite at ({ox}, {oy}): {sprite:02X?}");

        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = oy + i;
            if ny >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let nx = ox + j;
                if nx >= WIDTH {
                    break;
                }
                if (row >> (7 - j)) & 1 == 0 {
                    continue;
                }
                let cell = &mut self.pixel_buffer[ny * WIDTH + nx];
                if *cell == PIXEL_ON {
                    vf = true;
                }
                *cell ^= PIXEL_ON;
            }
        }
        vf
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixel_buffer.chunks(WIDTH) {
            let line: String = row
                .iter()
                .map(|&cell| if cell == PIXEL_ON { '#' } else { '.' })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
