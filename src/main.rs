use std::env;
use std::error::Error;
use std::fs;
use std::io;
use std::process;
use std::time::{Duration, Instant};

use thiserror::Error as ThisError;

use cosmac8::display::{Screen, TermScreen};
use cosmac8::input::{HostEvent, Input, TermInput};
use cosmac8::interpreter::{Fault, Machine};
use cosmac8::memory::RomTooLarge;
use cosmac8::sound::{Sound, TermBell};

/// instruction rate used when none is given on the command line
const DEFAULT_RATE_HZ: u32 = 700;

/// timers tick and frames are presented at 60Hz
const FRAME_PERIOD: Duration = Duration::from_micros(16_667);

/// terminals report key repeats but not releases, so a pressed key stays
/// latched this many frames and is released when the hold runs out
const KEY_HOLD_FRAMES: u8 = 6;

/// anything that can stop the emulator before the main loop starts
#[derive(Debug, ThisError)]
enum StartupError {
    #[error("usage: cosmac8 <rom path> [instruction rate in hz, default 700]")]
    Usage,
    #[error("bad instruction rate {0:?}: expected a positive integer")]
    BadRate(String),
    #[error("rom {path}: {source}")]
    Rom { path: String, source: io::Error },
    #[error("rom: {0}")]
    RomTooLarge(#[from] RomTooLarge),
    #[error("display: {0}")]
    Display(io::Error),
    #[error("input: {0}")]
    Input(io::Error),
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("cosmac8: {e}");
        process::exit(1);
    }
    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..4 {
        println!();
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let (rom_path, rate) = parse_args()?;

    let image = fs::read(&rom_path).map_err(|source| StartupError::Rom {
        path: rom_path.clone(),
        source,
    })?;
    let mut machine = Machine::new();
    machine
        .load_program(&image)
        .map_err(StartupError::RomTooLarge)?;

    let mut screen = TermScreen::new().map_err(StartupError::Display)?;
    let mut input = TermInput::new().map_err(StartupError::Input)?;
    let mut sound = TermBell::new();

    log::info!("running {} at {}hz", rom_path, rate);
    main_loop(&mut machine, &mut screen, &mut input, &mut sound, rate)
}

fn parse_args() -> Result<(String, u32), StartupError> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        return Err(StartupError::Usage);
    }
    let rate = match args.get(2) {
        Some(arg) => match arg.parse() {
            Ok(hz) if hz > 0 => hz,
            _ => return Err(StartupError::BadRate(arg.clone())),
        },
        None => DEFAULT_RATE_HZ,
    };
    Ok((args[1].clone(), rate))
}

/// Drive the machine until the operator quits or it faults.
///
/// Two deadlines interleave on one thread: instruction steps at `rate` and
/// the 60Hz frame work (timer tick, key-hold expiry, bell gating, display
/// flush). Falling off the end of the image is how a program that doesn't
/// loop forever ends, so that fault shuts down cleanly; stack and memory
/// faults propagate out.
fn main_loop(
    machine: &mut Machine,
    screen: &mut dyn Screen,
    input: &mut dyn Input,
    sound: &mut dyn Sound,
    rate: u32,
) -> Result<(), Box<dyn Error>> {
    let step_period = Duration::from_secs_f64(1.0 / rate as f64);
    let sleeper = spin_sleep::SpinSleeper::default();
    let mut hold = [0u8; 16];
    let mut next_step = Instant::now();
    let mut next_frame = Instant::now();

    'running: loop {
        for event in input.poll_events()? {
            match event {
                HostEvent::Quit => break 'running,
                HostEvent::Key(key) => {
                    machine.keypad_mut().set_key(key, true);
                    hold[(key & 0xf) as usize] = KEY_HOLD_FRAMES;
                }
            }
        }

        let now = Instant::now();
        if now >= next_step {
            match machine.step() {
                Ok(()) => {}
                Err(Fault::FetchOutOfBounds { pc }) => {
                    log::info!("execution ran past the end of memory at 0x{pc:03x}");
                    break 'running;
                }
                Err(fault) => return Err(fault.into()),
            }
            next_step += step_period;
        }

        if now >= next_frame {
            machine.timers_mut().tick();
            for (key, frames) in hold.iter_mut().enumerate() {
                if *frames > 0 {
                    *frames -= 1;
                    if *frames == 0 {
                        machine.keypad_mut().set_key(key as u8, false);
                    }
                }
            }
            if machine.timers().sound() > 0 {
                sound.beep()?;
            } else {
                sound.stop()?;
            }
            if machine.framebuffer_mut().take_dirty() {
                screen.blit(&machine.framebuffer().snapshot())?;
            }
            next_frame += FRAME_PERIOD;
        }

        let deadline = next_step.min(next_frame);
        if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
            sleeper.sleep(wait);
        }
    }
    Ok(())
}
