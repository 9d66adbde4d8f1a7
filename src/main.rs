// Separately:
// CPU: cycles_per_frame * 60 times per second (~700 by default)
// Display: 60 times per second
// Timer: once per cycle, or 60 times per second with --wall-clock-timers

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use chip8vm::{Config, Emulator, TimerMode};
use sound::Sound;
use window::Screen;

mod sound;
mod window;

#[derive(Parser, Debug)]
#[command(version, about = "Runs a CHIP-8 program in a window")]
struct Args {
    /// ROM image to load at 0x200
    rom: PathBuf,

    /// instructions executed per 60Hz frame
    #[arg(long, default_value_t = 12)]
    cycles_per_frame: u32,

    /// window scale factor: 1, 2, 4, 8, 16 or 32
    #[arg(long, default_value_t = 16)]
    scale: u32,

    /// decrement the timers once per frame instead of once per cycle
    #[arg(long)]
    wall_clock_timers: bool,

    #[arg(long)]
    mute: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("chip8vm=info"))
        .init();

    let args = Args::parse();
    let scale = window::scale_from(args.scale)
        .ok_or_else(|| format!("unsupported scale {}", args.scale))?;

    let timer_mode = if args.wall_clock_timers {
        TimerMode::External
    } else {
        TimerMode::PerCycle
    };
    let mut emu = Emulator::with_config(Config {
        timer_mode,
        ..Config::default()
    })?;
    emu.load_rom_file(&args.rom)?;
    log::info!("loaded {}", args.rom.display());

    let mut screen = Screen::new(scale)?;
    let sound = if args.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(err) => {
                log::warn!("running without sound: {err}");
                None
            }
        }
    };

    while screen.is_running() {
        emu.set_keys(screen.held_keys());
        for _ in 0..args.cycles_per_frame {
            emu.cycle()?;
        }
        if timer_mode == TimerMode::External {
            emu.tick_timers();
        }
        if let Some(sound) = &sound {
            sound.set_active(emu.sound_active());
        }
        if emu.take_redraw() {
            screen.draw(emu.frame())?;
        } else {
            screen.update();
        }
    }

    Ok(())
}
