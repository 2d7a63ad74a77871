use crate::display::Display;
use crate::{input, rom, Interpreter, MachineConfig, Op, TimerMode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use winit::event::Event;
use winit::event_loop::{ControlFlow, EventLoop};
use winit_input_helper::WinitInputHelper;

/// Upper bound for `--ips` and `--timer-hz`; keeps pacing intervals above zero.
const MAX_RATE: i64 = 1_000_000;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity of debug logging
    #[arg(short, long, value_enum, global = true)]
    debug: Option<DebugMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ROM in a window
    Run(RunArgs),
    /// Write a listing of a ROM's instructions
    Disassemble {
        /// The path to the ROM
        path: PathBuf,

        /// Where to output the disassembled ROM
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// The path to the ROM
    pub path: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..=MAX_RATE))]
    pub ips: u32,

    /// Instructions per timer tick; timers follow the instruction stream
    #[arg(long, default_value_t = NonZeroU32::MIN, conflicts_with = "timer_hz")]
    pub steps_per_tick: NonZeroU32,

    /// Tick the timers at this rate, independent of instruction speed
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_RATE))]
    pub timer_hz: Option<u32>,

    /// Window pixels per display cell
    #[arg(long, default_value_t = 10.0)]
    pub scale: f64,
}

impl RunArgs {
    pub fn machine_config(&self) -> MachineConfig {
        let timer_mode = match self.timer_hz {
            Some(_) => TimerMode::Driver,
            None => TimerMode::Coupled {
                steps_per_tick: self.steps_per_tick,
            },
        };
        MachineConfig { timer_mode }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum DebugMode {
    Info,
    Debug,
    Trace,
    Warn,
    Error,
}

impl fmt::Display for DebugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

pub fn init() -> Cli {
    let cli = Cli::parse();
    std::env::set_var(
        "RUST_LOG",
        format!("etherea={}", cli.debug.unwrap_or(DebugMode::Warn)),
    );

    env_logger::init();

    cli
}

/// Counts how many fixed-interval events fell due since the last call.
struct Pacer {
    interval: Duration,
    last: Instant,
}

impl Pacer {
    /// Events owed beyond this are dropped rather than run in one burst.
    const MAX_BURST: u32 = 1000;

    fn new(hz: u32, now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / hz,
            last: now,
        }
    }

    fn due(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last);
        let due = elapsed.as_nanos() / self.interval.as_nanos();
        if due > u128::from(Self::MAX_BURST) {
            warn!("Falling behind [owed: {due}]");
            self.last = now;
            return Self::MAX_BURST;
        }
        let due = due as u32;
        self.last += self.interval * due;
        due
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let rom = rom::read(&args.path)?;
    let mut interpreter = Interpreter::with_config(args.machine_config());
    interpreter.load(&rom)?;

    let event_loop = EventLoop::new();
    let mut display = Display::new(&event_loop, args.scale)?;
    let mut input = WinitInputHelper::new();

    let now = Instant::now();
    let mut cpu = Pacer::new(args.ips, now);
    let mut timers = args.timer_hz.map(|hz| Pacer::new(hz, now));
    info!(
        "Running {} [ips: {}] [timers: {:?}]",
        args.path.display(),
        args.ips,
        args.machine_config().timer_mode
    );

    event_loop.run(move |event, _, control_flow| {
        if let Event::RedrawRequested(_) = event {
            if let Err(e) = display.render(interpreter.framebuffer()) {
                error!("{e}");
                *control_flow = ControlFlow::ExitWithCode(1);
                return;
            }
        }

        if !input.update(&event) {
            return;
        }
        if input.quit() {
            *control_flow = ControlFlow::Exit;
            return;
        }
        if let Some(size) = input.window_resized() {
            if let Err(e) = display.resize(size) {
                error!("{e}");
                *control_flow = ControlFlow::ExitWithCode(1);
                return;
            }
        }

        input::forward(&input, &mut interpreter);

        let now = Instant::now();
        for _ in 0..cpu.due(now) {
            if let Err(fault) = interpreter.step() {
                error!("{fault}");
                *control_flow = ControlFlow::ExitWithCode(1);
                return;
            }
        }
        if let Some(timers) = timers.as_mut() {
            for _ in 0..timers.due(now) {
                interpreter.tick_timers();
            }
        }

        if interpreter.take_redraw() {
            display.request_redraw();
        }
    })
}

pub fn disassemble(path: &Path, output_file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    if let Some(mut f) = output_file.clone() {
        if f.extension().is_none() {
            return Err(format!("{} is not a file", f.display()).into());
        }
        f.pop();
        fs::create_dir_all(f)?;
    }

    let output = output_file.unwrap_or(PathBuf::from("output.txt"));
    let rom = rom::read(path)?;
    let mut file = io::BufWriter::new(fs::File::create(&output)?);

    writeln!(file, "== {} ==", path.display())?;
    write_listing(&mut file, &rom)?;
    file.flush()?;

    info!("Wrote disassembled ROM to {}", output.display());
    Ok(())
}

/// One line per instruction word: address, raw word and mnemonic.
fn write_listing(out: &mut impl Write, rom: &[u8]) -> io::Result<()> {
    let words = rom.chunks_exact(2);
    if !words.remainder().is_empty() {
        warn!("ROM has an odd length; ignoring the final byte");
    }
    for (n, chunk) in words.enumerate() {
        let addr = Interpreter::MEMORY_OFFSET + n * 2;
        let inst = crate::Instruction::from(u16::from_be_bytes([chunk[0], chunk[1]]));
        match Op::decode(inst) {
            Some(op) => writeln!(out, "{addr:03X}  {inst:?}  {op}")?,
            None => writeln!(out, "{addr:03X}  {inst:?}  ???")?,
        }
    }
    Ok(())
}
