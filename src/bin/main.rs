//! Host simulator: runs the watch faces against a simulated RTC, sensors,
//! persistent storage and a console LCD.

use std::{error::Error, path::PathBuf};

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use sensorface_core::{
    DateTimeFields, Event, FaceHost, FaceKind, WatchSettings, files::FileStore,
};
use sensorface_hal::FlashFileStore;

use board::{SimBattery, SimBoard, SimThermistor};
use console_display::ConsoleDisplay;
use dir_store::DirFileStore;
use flash_image::{FlashImage, SECTOR_COUNT};
use sim_clock::SimClock;

#[path = "main/board.rs"]
mod board;
#[path = "main/console_display.rs"]
mod console_display;
#[path = "main/dir_store.rs"]
mod dir_store;
#[path = "main/flash_image.rs"]
mod flash_image;
#[path = "main/sim_clock.rs"]
mod sim_clock;

const FACES: [FaceKind; 2] = [FaceKind::Clock, FaceKind::QuietTime];
const FLASH_IMAGE_NAME: &str = "flash.img";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StorageArg {
    /// One host file per record.
    Dir,
    /// Records in an emulated NOR flash image.
    Flash,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ButtonArg {
    LightDown,
    LightUp,
    LightLong,
    AlarmDown,
    AlarmUp,
    AlarmLong,
    Mode,
    ModeLong,
    Timeout,
}

impl ButtonArg {
    const fn into_event(self) -> Event {
        match self {
            Self::LightDown => Event::LightButtonDown,
            Self::LightUp => Event::LightButtonUp,
            Self::LightLong => Event::LightLongPress,
            Self::AlarmDown => Event::AlarmButtonDown,
            Self::AlarmUp => Event::AlarmButtonUp,
            Self::AlarmLong => Event::AlarmLongPress,
            Self::Mode => Event::ModeButtonUp,
            Self::ModeLong => Event::ModeLongPress,
            Self::Timeout => Event::Timeout,
        }
    }
}

/// A button event delivered after `at` simulated seconds.
#[derive(Debug, Clone, Copy)]
struct ScriptedPress {
    at: u32,
    button: ButtonArg,
}

fn parse_press(value: &str) -> Result<ScriptedPress, String> {
    let (at, button) = value
        .split_once(':')
        .ok_or_else(|| format!("expected SECONDS:BUTTON, got {value:?}"))?;
    let at = at
        .parse::<u32>()
        .map_err(|err| format!("bad offset {at:?}: {err}"))?;
    let button = ButtonArg::from_str(button, true)?;
    Ok(ScriptedPress { at, button })
}

#[derive(Parser, Debug)]
#[command(name = "sensorface", about = "Simulate the sensorface watch faces")]
struct Args {
    /// Starting wall-clock time, `YYYY-MM-DDTHH:MM:SS`.
    #[arg(long, value_parser = sim_clock::parse_start, default_value = "2024-03-04T01:59:50")]
    start: DateTimeFields,
    /// Simulated seconds to run.
    #[arg(long, default_value_t = 120)]
    seconds: u32,
    /// Deliver one low-energy tick per minute instead of one tick per second.
    #[arg(long)]
    low_energy: bool,
    #[arg(long, default_value_t = 20.0)]
    celsius: f32,
    /// Celsius added after every thermistor read.
    #[arg(long, default_value_t = 0.0)]
    drift: f32,
    #[arg(long, default_value_t = 2900)]
    millivolts: u16,
    #[arg(long)]
    twelve_hour: bool,
    /// Mirror an armed alarm on the signal lamp.
    #[arg(long)]
    alarm: bool,
    #[arg(long, value_enum, default_value = "dir")]
    storage: StorageArg,
    #[arg(long, default_value = ".sensorface")]
    data_dir: PathBuf,
    /// Button press as `SECONDS:BUTTON`, e.g. `5:alarm-long`. Repeatable.
    #[arg(long = "press", value_parser = parse_press)]
    presses: Vec<ScriptedPress>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.storage {
        StorageArg::Dir => {
            let files = DirFileStore::open(&args.data_dir)?;
            simulate(&args, files)
        }
        StorageArg::Flash => {
            std::fs::create_dir_all(&args.data_dir)?;
            let flash = FlashImage::open(&args.data_dir.join(FLASH_IMAGE_NAME))?;
            let files = FlashFileStore::new(flash, 0, SECTOR_COUNT)
                .map_err(|err| format!("flash store unavailable: {err:?}"))?;
            simulate(&args, files)
        }
    }
}

fn simulate<F: FileStore>(args: &Args, files: F) -> Result<(), Box<dyn Error>> {
    let board = SimBoard {
        clock: SimClock::new(args.start),
        thermistor: SimThermistor::new(args.celsius, args.drift),
        battery: SimBattery::new(args.millivolts),
        files,
        display: ConsoleDisplay::new(),
        chimes: 0,
    };
    let settings = WatchSettings::new(!args.twelve_hour, args.alarm);
    let mut host = FaceHost::new(board, settings, &FACES)
        .map_err(|err| format!("face host: {err:?}"))?;
    print_display(&host);

    for elapsed in 1..=args.seconds {
        host.hardware_mut().clock.advance_one_second();

        for press in args.presses.iter().filter(|press| press.at == elapsed) {
            let event = press.button.into_event();
            info!("press {:?} on face {}", event, host.current_face());
            if host.dispatch(event) {
                print_display(&host);
            }
        }

        let now = host.hardware().clock.now();
        let tick = if !args.low_energy {
            Some(Event::Tick)
        } else if now.second() == 0 {
            Some(Event::LowEnergyTick)
        } else {
            None
        };
        if let Some(event) = tick {
            if host.dispatch(event) {
                print_display(&host);
            }
        }

        if now.second() == 0 {
            let delivered = host.run_background_tasks();
            if delivered > 0 {
                debug!("{} background task(s) at {:02}:00", delivered, now.hour());
            }
        }
    }

    info!(
        "simulated {} s on face {:?}, {} chime(s)",
        args.seconds,
        host.current_kind(),
        host.hardware().chimes
    );
    Ok(())
}

fn print_display<F: FileStore>(host: &FaceHost<SimBoard<F>>) {
    let now = host.hardware().clock.now();
    println!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02} {}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        host.hardware().display.line()
    );
}
