use chip8vm::{Config, CpuState, Emulator, Error, PIXEL_OFF, PIXEL_ON, WIDTH};

fn assemble(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn load(program: &[u16]) -> Emulator {
    let mut emu = Emulator::with_seed(Config::default(), 0xC8).unwrap();
    emu.load_rom(&assemble(program)).unwrap();
    emu
}

fn run(emu: &mut Emulator, cycles: usize) {
    for _ in 0..cycles {
        emu.cycle().unwrap();
    }
}

#[test]
fn digit_zero_glyph_at_origin() {
    let mut emu = load(&[
        0x6000, // V0 = 0
        0xF029, // I = glyph(V0)
        0xD005, // draw 5 rows at (V0, V0)
    ]);
    run(&mut emu, 3);

    let glyph = [0xF0u8, 0x90, 0x90, 0x90, 0xF0];
    let pixels = emu.frame().pixels();
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..8 {
            let expected = if (bits >> (7 - col)) & 1 == 1 {
                PIXEL_ON
            } else {
                PIXEL_OFF
            };
            assert_eq!(pixels[row * WIDTH + col], expected, "({col}, {row})");
        }
    }
    assert_eq!(emu.registers()[0xF], 0);
}

#[test]
fn subroutine_adds_twice() {
    // mirrors a call/return round trip: V0 = 5 + (10 * 2) + (10 * 2)
    let mut emu = load(&[
        0x6005, // 200: V0 = 5
        0x610A, // 202: V1 = 10
        0x2300, // 204: call 300
        0x2300, // 206: call 300
        0x1208, // 208: spin
    ]);
    emu.mem
        .slice_mut(0x300, 6)
        .unwrap()
        .copy_from_slice(&assemble(&[0x8014, 0x8014, 0x00EE]));

    run(&mut emu, 3 + 3 + 3 + 2);
    assert_eq!(emu.registers()[0x0], 45);
    assert_eq!(emu.pc(), 0x208);
    assert_eq!(emu.mem.stack.depth(), 0);
}

#[test]
fn key_wait_spans_cycles() {
    let mut emu = load(&[0xF50A, 0x7501]);
    for _ in 0..20 {
        run(&mut emu, 1);
        assert_eq!(emu.pc(), 0x200);
        assert!(emu.is_awaiting_key());
    }

    let mut keys = [false; 16];
    keys[0x7] = true;
    emu.set_keys(keys);
    run(&mut emu, 1);
    assert_eq!(emu.registers()[0x5], 0x7);
    assert_eq!(emu.state(), CpuState::Running);
    assert_eq!(emu.pc(), 0x202);

    run(&mut emu, 1);
    assert_eq!(emu.registers()[0x5], 0x8);
    assert_eq!(emu.pc(), 0x204);
}

#[test]
fn countdown_with_delay_timer() {
    // set DT = 10, loop until it reads back 0
    let mut emu = load(&[
        0x600A, // 200: V0 = 10
        0xF015, // 202: DT = V0
        0xF107, // 204: V1 = DT
        0x3100, // 206: skip if V1 == 0
        0x1204, // 208: back to 204
        0x120C, // 20A: done
    ]);
    let mut cycles = 0;
    while emu.pc() != 0x20C {
        emu.cycle().unwrap();
        cycles += 1;
        assert!(cycles < 100, "timer never ran out");
    }
    assert_eq!(emu.delay_timer(), 0);
}

#[test]
fn bcd_of_extremes() {
    let mut emu = load(&[0x60FF, 0xA400, 0xF033, 0x6000, 0xA410, 0xF033]);
    run(&mut emu, 6);
    assert_eq!(emu.mem.slice(0x400, 3).unwrap(), &[2, 5, 5]);
    assert_eq!(emu.mem.slice(0x410, 3).unwrap(), &[0, 0, 0]);
}

#[test]
fn runaway_pc_faults_at_end_of_memory() {
    let mut emu = load(&[0x1FFE]);
    run(&mut emu, 1);
    // 0xFFE holds 0x0000, which aliases to clear screen; the next fetch runs off the end
    run(&mut emu, 1);
    assert_eq!(emu.pc(), 0x1000);
    assert!(matches!(
        emu.cycle(),
        Err(Error::MemoryOutOfBounds { address: 0x1000 })
    ));
}

#[test]
fn rom_from_reader_and_size_limit() {
    let mut emu = Emulator::new();
    emu.load_rom_from_reader(std::io::Cursor::new(vec![0x12, 0x00]))
        .unwrap();
    run(&mut emu, 3);
    assert_eq!(emu.pc(), 0x200);

    let mut emu = Emulator::new();
    let err = emu.load_rom(&[0; 4096]).unwrap_err();
    assert!(matches!(err, Error::RomTooLarge { size: 4096, max_size: 3584 }));
    assert_eq!(emu.mem.slice(0x200, 4).unwrap(), &[0; 4]);
}

#[test]
fn missing_rom_file_reports_error() {
    let mut emu = Emulator::new();
    let err = emu.load_rom_file("no/such/rom.ch8").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().starts_with("unable to read rom"));
}
