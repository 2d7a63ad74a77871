use log::{debug, info, trace, warn};
use rand::Rng;
use std::ops::{Deref, DerefMut};

pub mod cli;
pub mod display;
pub mod error;
pub mod font;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod keypad;
pub mod rom;
pub mod stack;
pub mod timers;

pub use error::{Fault, LoadError, Target};
pub use framebuffer::Framebuffer;
pub use instruction::{Instruction, Op};
pub use timers::TimerMode;

use keypad::Keypad;
use stack::{Stack, StackError};
use timers::Timers;

macro_rules! wrapper {
    ($($name:ident => $size:expr),*) => {
        $(
            #[derive(Debug, Clone)]
            pub struct $name([u8; $size]);

            impl Default for $name {
                fn default() -> Self {
                    Self([0; $size])
                }
            }

            impl Deref for $name {
                type Target = [u8; $size];

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl DerefMut for $name {
                fn deref_mut(&mut self) -> &mut Self::Target {
                    &mut self.0
                }
            }
        )*
    };
}

wrapper! {
    Memory => Interpreter::MEMORY_SIZE,
    RegisterArray => Interpreter::REGISTER_COUNT
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub timer_mode: TimerMode,
}

/// What `load` did with a ROM.
#[derive(Debug, PartialEq, Eq)]
pub struct LoadSummary {
    /// Bytes copied into memory.
    pub written: usize,
    /// Bytes past the end of memory that were left out.
    pub dropped: usize,
}

/// Where execution continues after an instruction.
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

impl Flow {
    fn skip_if(cond: bool) -> Self {
        if cond {
            Self::Skip
        } else {
            Self::Next
        }
    }
}

#[derive(Debug)]
pub struct Interpreter {
    i: u16,                   // Index register
    pc: u16,                  // Program counter
    stack: Stack,             // Return addresses
    memory: Memory,           // Memory
    framebuffer: Framebuffer, // Display cells
    timers: Timers,           // Delay and sound timers
    keypad: Keypad,           // Key states, written by the input source
    registers: RegisterArray, // Variable registers (V0..=VF)
    config: MachineConfig,    // Timer mode
    steps: u32,               // Steps since the last timer tick
    frame_dirty: bool,        // Set for the step that drew
    redraw: bool,             // Set until taken by the renderer
    beeped: bool,             // Set for the step or tick that ran the sound timer out
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub const MEMORY_SIZE: usize = 4096;
    pub const MEMORY_OFFSET: usize = 0x200;
    pub const REGISTER_COUNT: usize = 16;
    const FLAG: usize = 0xF;

    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let mut interpreter = Self {
            i: 0,
            pc: 0,
            stack: Stack::default(),
            memory: Memory::default(),
            framebuffer: Framebuffer::default(),
            timers: Timers::default(),
            keypad: Keypad::default(),
            registers: RegisterArray::default(),
            config,
            steps: 0,
            frame_dirty: false,
            redraw: false,
            beeped: false,
        };
        interpreter.init();
        interpreter
    }

    /// Resets every component to its boot state and installs the font.
    /// Key states and configuration survive.
    pub fn init(&mut self) {
        self.i = 0;
        self.pc = Self::MEMORY_OFFSET as u16;
        self.stack = Stack::default();
        self.memory = Memory::default();
        self.framebuffer.clear();
        self.timers = Timers::default();
        self.registers = RegisterArray::default();
        self.steps = 0;
        self.frame_dirty = false;
        self.redraw = false;
        self.beeped = false;

        self.memory[font::MEMORY_RANGE].copy_from_slice(font::FONT);
        debug!("Initialized interpreter [config: {:?}]", self.config);
    }

    /// Copies `rom` into program memory, truncated to what fits.
    pub fn load(&mut self, rom: &[u8]) -> Result<LoadSummary, LoadError> {
        if rom.is_empty() {
            return Err(LoadError::Empty);
        }
        let capacity = Self::MEMORY_SIZE - Self::MEMORY_OFFSET;
        let written = rom.len().min(capacity);
        self.memory[Self::MEMORY_OFFSET..Self::MEMORY_OFFSET + written]
            .copy_from_slice(&rom[..written]);

        let summary = LoadSummary {
            written,
            dropped: rom.len() - written,
        };
        if summary.dropped > 0 {
            warn!(
                "ROM truncated [size: {}] [dropped: {}]",
                rom.len(),
                summary.dropped
            );
        }
        info!("Loaded ROM [size: {}]", written);
        Ok(summary)
    }

    /// Runs one fetch-decode-execute cycle, then ticks the timers when
    /// the timer mode says so.
    pub fn step(&mut self) -> Result<(), Fault> {
        self.frame_dirty = false;
        self.beeped = false;

        let inst = self.fetch()?;
        trace!("Fetched instruction [{:?}] at {:#05X}", inst, self.pc);
        let op = Op::decode(inst).ok_or_else(|| self.unsupported(inst))?;
        debug!("Processing instruction [{op}]");

        let next = match self.execute(op, inst)? {
            Flow::Next => self.pc + 2,
            Flow::Skip => self.pc + 4,
            Flow::Jump(addr) => addr,
        };
        self.pc = Self::in_memory(next)?;

        if let TimerMode::Coupled { steps_per_tick } = self.config.timer_mode {
            self.steps += 1;
            if self.steps >= steps_per_tick.get() {
                self.steps = 0;
                self.tick();
            }
        }
        Ok(())
    }

    /// Ticks the timers once. Drivers running in `TimerMode::Driver` call
    /// this on their own clock. Returns whether the sound timer ran out.
    pub fn tick_timers(&mut self) -> bool {
        self.beeped = false;
        self.tick()
    }

    fn tick(&mut self) -> bool {
        if self.timers.tick() {
            info!("Beep");
            self.beeped = true;
        }
        self.beeped
    }

    /// True only after a step that executed a draw.
    pub fn frame_dirty(&self) -> bool {
        self.frame_dirty
    }

    /// Whether the framebuffer changed since the last call. Clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn beeped(&self) -> bool {
        self.beeped
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn on_key_down(&mut self, index: u8) {
        self.keypad.press(index);
    }

    pub fn on_key_up(&mut self, index: u8) {
        self.keypad.release(index);
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    /// # Panics
    ///
    /// Panics if `register` is not below `REGISTER_COUNT`.
    pub fn register(&self, register: usize) -> u8 {
        self.registers[register]
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory[..]
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.timers.sound
    }

    fn fetch(&self) -> Result<Instruction, Fault> {
        let pc = self.pc as usize;
        Self::check(pc, 2)?;
        Ok(Instruction::from(u16::from_be_bytes([
            self.memory[pc],
            self.memory[pc + 1],
        ])))
    }

    fn unsupported(&self, inst: Instruction) -> Fault {
        Fault::UnsupportedOpcode {
            opcode: inst.word(),
            pc: self.pc,
        }
    }

    fn execute(&mut self, op: Op, inst: Instruction) -> Result<Flow, Fault> {
        let flow = match op {
            Op::Clear => {
                self.framebuffer.clear();
                self.redraw = true;
                Flow::Next
            }
            Op::Return => {
                let addr = self.stack.pop().map_err(|e| self.stack_fault(e))?;
                self.jump(addr + 2)?
            }
            Op::Jump(addr) => self.jump(addr)?,
            Op::Call(addr) => {
                self.stack
                    .push(self.pc)
                    .map_err(|e| self.stack_fault(e))?;
                self.jump(addr)?
            }
            Op::SkipEqImm(x, nn) => Flow::skip_if(self.registers[x] == nn),
            Op::SkipNeImm(x, nn) => Flow::skip_if(self.registers[x] != nn),
            Op::SkipEqReg(x, y) => Flow::skip_if(self.registers[x] == self.registers[y]),
            Op::SkipNeReg(x, y) => Flow::skip_if(self.registers[x] != self.registers[y]),
            Op::LoadImm(x, nn) => {
                self.registers[x] = nn;
                Flow::Next
            }
            Op::AddImm(x, nn) => {
                self.registers[x] = self.registers[x].wrapping_add(nn);
                Flow::Next
            }
            Op::Move(x, y) => {
                self.registers[x] = self.registers[y];
                Flow::Next
            }
            Op::Or(x, y) => {
                self.registers[x] |= self.registers[y];
                Flow::Next
            }
            Op::And(x, y) => {
                self.registers[x] &= self.registers[y];
                Flow::Next
            }
            Op::Xor(x, y) => {
                self.registers[x] ^= self.registers[y];
                Flow::Next
            }
            Op::AddReg(x, y) => {
                let (sum, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = sum;
                self.registers[Self::FLAG] = carry as u8;
                Flow::Next
            }
            Op::SubReg(x, y) => {
                let (difference, borrow) = self.registers[x].overflowing_sub(self.registers[y]);
                self.registers[x] = difference;
                self.registers[Self::FLAG] = !borrow as u8;
                Flow::Next
            }
            Op::ShiftRight(..)
            | Op::SubReverse(..)
            | Op::ShiftLeft(..)
            | Op::WaitKey(_)
            | Op::AddIndex(_) => return Err(self.unsupported(inst)),
            Op::LoadIndex(addr) => {
                self.i = addr;
                debug!("Set index register I to {addr}");
                Flow::Next
            }
            Op::JumpIndexed(addr) => self.jump(u16::from(self.registers[0]) + addr)?,
            Op::Random(x, nn) => {
                self.registers[x] = rand::thread_rng().gen::<u8>() & nn;
                Flow::Next
            }
            Op::Draw(x, y, n) => {
                self.draw_sprite(x, y, n)?;
                Flow::Next
            }
            Op::SkipKeyPressed(x) => Flow::skip_if(self.keypad.is_pressed(self.registers[x])),
            Op::SkipKeyReleased(x) => Flow::skip_if(!self.keypad.is_pressed(self.registers[x])),
            Op::ReadDelay(x) => {
                self.registers[x] = self.timers.delay;
                Flow::Next
            }
            Op::SetDelay(x) => {
                self.timers.delay = self.registers[x];
                Flow::Next
            }
            Op::SetSound(x) => {
                self.timers.sound = self.registers[x];
                Flow::Next
            }
            Op::LoadGlyph(x) => {
                self.i = font::glyph_offset(self.registers[x]);
                Flow::Next
            }
            Op::StoreBcd(x) => {
                let value = self.registers[x];
                let i = self.i as usize;
                Self::check(i, 3)?;
                self.memory[i..i + 3].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
                Flow::Next
            }
            Op::StoreRegisters(x) => {
                let i = self.i as usize;
                Self::check(i, x + 1)?;
                self.memory[i..=i + x].copy_from_slice(&self.registers[..=x]);
                Flow::Next
            }
            Op::LoadRegisters(x) => {
                let i = self.i as usize;
                Self::check(i, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[i..=i + x]);
                Flow::Next
            }
        };
        Ok(flow)
    }

    fn jump(&self, addr: u16) -> Result<Flow, Fault> {
        Ok(Flow::Jump(Self::in_memory(addr)?))
    }

    /// Rejects program counter values outside memory.
    fn in_memory(addr: u16) -> Result<u16, Fault> {
        if addr as usize >= Self::MEMORY_SIZE {
            return Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(addr as usize),
            });
        }
        Ok(addr)
    }

    fn stack_fault(&self, e: StackError) -> Fault {
        match e {
            StackError::Overflow => Fault::StackOverflow { pc: self.pc },
            StackError::Underflow => Fault::StackUnderflow { pc: self.pc },
        }
    }

    /// Checks that `len` bytes starting at `start` lie in memory.
    fn check(start: usize, len: usize) -> Result<(), Fault> {
        let end = start + len;
        if end > Self::MEMORY_SIZE {
            return Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(end - 1),
            });
        }
        Ok(())
    }

    fn draw_sprite(&mut self, vx: usize, vy: usize, height: u8) -> Result<(), Fault> {
        let x = self.registers[vx] as usize;
        let y = self.registers[vy] as usize;
        trace!("x: {x} y: {y} height: {height}");
        let i = self.i as usize;
        let height = height as usize;
        Self::check(i, height)?;
        let collision = self.framebuffer.draw(x, y, &self.memory[i..i + height])?;
        self.registers[Self::FLAG] = collision as u8;
        self.frame_dirty = true;
        self.redraw = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use std::num::NonZeroU32;

    fn boot(program: &[u16]) -> Interpreter {
        let mut interpreter = Interpreter::new();
        interpreter.poke(Interpreter::MEMORY_OFFSET as u16, program);
        interpreter
    }

    fn run(interpreter: &mut Interpreter, steps: usize) {
        for _ in 0..steps {
            interpreter.step().unwrap();
        }
    }

    impl Interpreter {
        fn poke(&mut self, addr: u16, words: &[u16]) {
            for (n, word) in words.iter().enumerate() {
                let at = addr as usize + n * 2;
                self.memory[at..at + 2].copy_from_slice(&word.to_be_bytes());
            }
        }
    }

    #[test]
    fn boot_state() {
        let interpreter = Interpreter::new();
        assert_eq!(interpreter.pc(), 0x200);
        assert_eq!(interpreter.index(), 0);
        assert_eq!(interpreter.stack_depth(), 0);
        assert_eq!(&interpreter.memory()[font::MEMORY_RANGE], font::FONT);
        assert!(interpreter.memory()[font::MEMORY_RANGE.end..].iter().all(|b| *b == 0));
        assert_eq!(interpreter.framebuffer(), &Framebuffer::default());
    }

    #[test]
    fn clear_screen() {
        let mut interpreter = Interpreter::new();
        interpreter.load(&[0x00, 0xE0]).unwrap();
        interpreter.framebuffer.draw(0, 0, &[0xFF]).unwrap();
        interpreter.step().unwrap();
        assert_eq!(interpreter.framebuffer(), &Framebuffer::default());
        assert_eq!(interpreter.pc(), 0x202);
        assert!(!interpreter.frame_dirty());
        assert!(interpreter.take_redraw());
    }

    #[test]
    fn skip_if_equal_immediate() {
        let mut interpreter = boot(&[0x6A05, 0x3A05]);
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0x202);
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0x206);

        let mut interpreter = boot(&[0x6A05, 0x4A05, 0x5AB0, 0x9AB0]);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.pc(), 0x204);
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0x206);
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0x20A);
    }

    #[test]
    fn add_immediate_wraps_without_flag() {
        let mut interpreter = boot(&[0x6FAA, 0x60F0, 0x7020]);
        run(&mut interpreter, 3);
        assert_eq!(interpreter.register(0), 0x10);
        assert_eq!(interpreter.register(0xF), 0xAA);
    }

    #[test]
    fn logic() {
        let mut interpreter = boot(&[0x600C, 0x610A, 0x8211, 0x8312, 0x8413, 0x8500]);
        run(&mut interpreter, 2);
        interpreter.registers[2] = 0x0C;
        interpreter.registers[3] = 0x0C;
        interpreter.registers[4] = 0x0C;
        run(&mut interpreter, 4);
        assert_eq!(interpreter.register(2), 0x0C | 0x0A);
        assert_eq!(interpreter.register(3), 0x0C & 0x0A);
        assert_eq!(interpreter.register(4), 0x0C ^ 0x0A);
        assert_eq!(interpreter.register(5), 0x0C);
    }

    #[quickcheck]
    fn add_sets_carry(a: u8, b: u8) -> bool {
        let mut interpreter = boot(&[0x8014]);
        interpreter.registers[0] = a;
        interpreter.registers[1] = b;
        interpreter.step().unwrap();
        let sum = a as u16 + b as u16;
        interpreter.register(0) == (sum % 256) as u8 && interpreter.register(0xF) == (sum > 255) as u8
    }

    #[quickcheck]
    fn sub_clears_flag_on_borrow(a: u8, b: u8) -> bool {
        let mut interpreter = boot(&[0x8015]);
        interpreter.registers[0] = a;
        interpreter.registers[1] = b;
        interpreter.step().unwrap();
        interpreter.register(0) == a.wrapping_sub(b) && interpreter.register(0xF) == (b <= a) as u8
    }

    #[test]
    fn flag_wins_over_result() {
        let mut interpreter = boot(&[0x6F10, 0x6102, 0x8F14]);
        run(&mut interpreter, 3);
        assert_eq!(interpreter.register(0xF), 0);
    }

    #[test]
    fn unsupported_opcodes() {
        for word in [0x8126, 0x8127, 0x812E, 0xF10A, 0xF11E, 0x0123, 0xE1FF, 0x5121] {
            let mut interpreter = boot(&[word]);
            assert_eq!(
                interpreter.step(),
                Err(Fault::UnsupportedOpcode {
                    opcode: word,
                    pc: 0x200
                })
            );
            assert_eq!(interpreter.pc(), 0x200);
        }
    }

    /// `main` calls a chain of `depth` subroutines, each returning at once
    /// after calling the next.
    fn nested(depth: u16) -> Interpreter {
        let sub = |n: u16| 0x300 + 4 * n;
        let mut interpreter = boot(&[0x2000 | sub(1), 0x1202]);
        for n in 1..depth {
            interpreter.poke(sub(n), &[0x2000 | sub(n + 1), 0x00EE]);
        }
        interpreter.poke(sub(depth), &[0x00EE]);
        interpreter
    }

    #[test]
    fn call_and_return() {
        for depth in 1..=16 {
            let mut interpreter = nested(depth);
            run(&mut interpreter, depth as usize);
            assert_eq!(interpreter.stack_depth(), depth as usize);
            run(&mut interpreter, depth as usize);
            assert_eq!(interpreter.stack_depth(), 0);
            assert_eq!(interpreter.pc(), 0x202);
        }
    }

    #[test]
    fn stack_overflow() {
        let mut interpreter = nested(17);
        run(&mut interpreter, 16);
        let pc = interpreter.pc();
        assert_eq!(interpreter.step(), Err(Fault::StackOverflow { pc }));
    }

    #[test]
    fn stack_underflow() {
        let mut interpreter = boot(&[0x00EE]);
        assert_eq!(interpreter.step(), Err(Fault::StackUnderflow { pc: 0x200 }));
    }

    #[test]
    fn jumps() {
        let mut interpreter = boot(&[0x1ABC]);
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0xABC);

        let mut interpreter = boot(&[0x6004, 0xB300]);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.pc(), 0x304);

        let mut interpreter = boot(&[0x60FF, 0xBFFF]);
        interpreter.step().unwrap();
        assert_eq!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(0x10FE)
            })
        );
    }

    #[test]
    fn fetch_past_memory_faults() {
        let mut interpreter = boot(&[0x1FFF]);
        interpreter.step().unwrap();
        assert_eq!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(0x1000)
            })
        );
    }

    #[test]
    fn straight_line_past_memory_faults() {
        let mut interpreter = Interpreter::new();
        interpreter.poke(0xFFE, &[0x6000]);
        interpreter.pc = 0xFFE;
        assert_eq!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(0x1000)
            })
        );
        assert_eq!(interpreter.pc(), 0xFFE);

        let mut interpreter = Interpreter::new();
        interpreter.poke(0xFFC, &[0x3000]);
        interpreter.pc = 0xFFC;
        assert_eq!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(0x1000)
            })
        );
    }

    #[test]
    fn random_is_masked() {
        let mut interpreter = boot(&[0xC000, 0xC10F]);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.register(0), 0);
        assert_eq!(interpreter.register(1) & 0xF0, 0);
    }

    #[test]
    fn draw_glyph() {
        // V0 = 0xA, I = glyph(V0), draw at (V1, V2) = (2, 3)
        let mut interpreter = boot(&[0x600A, 0xF029, 0x6102, 0x6203, 0xD125, 0xD125]);
        run(&mut interpreter, 4);
        assert_eq!(interpreter.index(), 50);
        assert!(!interpreter.frame_dirty());

        interpreter.step().unwrap();
        assert!(interpreter.frame_dirty());
        assert_eq!(interpreter.register(0xF), 0);
        // Top row of "A" is 0xF0.
        assert_eq!(interpreter.framebuffer().cell(2, 3), 1);
        assert_eq!(interpreter.framebuffer().cell(5, 3), 1);
        assert_eq!(interpreter.framebuffer().cell(6, 3), 0);

        interpreter.step().unwrap();
        assert_eq!(interpreter.register(0xF), 1);
        assert_eq!(interpreter.framebuffer(), &Framebuffer::default());
        assert!(interpreter.take_redraw());
        assert!(!interpreter.take_redraw());
    }

    #[test]
    fn draw_clears_stale_flag() {
        let mut interpreter = boot(&[0x6F01, 0xD015]);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.register(0xF), 0);
        assert!(interpreter.frame_dirty());
    }

    #[test]
    fn draw_off_screen_faults() {
        let mut interpreter = boot(&[0x603D, 0xD015]);
        interpreter.step().unwrap();
        assert_eq!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Cell { x: 64, y: 0 }
            })
        );
    }

    #[test]
    fn draw_past_memory_faults() {
        let mut interpreter = boot(&[0xAFFE, 0xD005]);
        interpreter.step().unwrap();
        assert!(matches!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(_)
            })
        ));
    }

    #[test]
    fn skip_on_key() {
        let mut interpreter = boot(&[0x6015, 0xE09E, 0x0000, 0xE0A1]);
        interpreter.on_key_down(0x5);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.pc(), 0x206);
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0x208);

        interpreter.on_key_up(0x5);
        interpreter.pc = 0x206;
        interpreter.step().unwrap();
        assert_eq!(interpreter.pc(), 0x20A);
    }

    #[test]
    fn delay_timer_counts_down() {
        let mut interpreter = boot(&[0x6005, 0xF015, 0x1204]);
        run(&mut interpreter, 2);
        for _ in 0..4 {
            assert!(interpreter.delay_timer() > 0);
            interpreter.step().unwrap();
        }
        assert_eq!(interpreter.delay_timer(), 0);
        run(&mut interpreter, 3);
        assert_eq!(interpreter.delay_timer(), 0);

        interpreter.poke(0x204, &[0xF307]);
        interpreter.step().unwrap();
        assert_eq!(interpreter.register(3), 0);
    }

    #[test]
    fn beep_fires_once() {
        let mut interpreter = boot(&[0x6002, 0xF018, 0x1204]);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.sound_timer(), 1);
        assert!(!interpreter.beeped());
        interpreter.step().unwrap();
        assert!(interpreter.beeped());
        interpreter.step().unwrap();
        assert!(!interpreter.beeped());
    }

    #[test]
    fn driver_timer_mode() {
        let config = MachineConfig {
            timer_mode: TimerMode::Driver,
        };
        let mut interpreter = Interpreter::with_config(config);
        interpreter.poke(0x200, &[0x6001, 0xF018, 0xF015, 0x1206]);
        run(&mut interpreter, 5);
        assert_eq!(interpreter.sound_timer(), 1);
        assert_eq!(interpreter.delay_timer(), 1);
        assert!(interpreter.tick_timers());
        assert_eq!(interpreter.sound_timer(), 0);
        assert!(!interpreter.tick_timers());
    }

    #[test]
    fn coupled_timer_ratio() {
        let config = MachineConfig {
            timer_mode: TimerMode::Coupled {
                steps_per_tick: NonZeroU32::new(3).unwrap(),
            },
        };
        let mut interpreter = Interpreter::with_config(config);
        interpreter.poke(0x200, &[0x6009, 0xF015, 0x1204]);
        run(&mut interpreter, 3);
        assert_eq!(interpreter.delay_timer(), 8);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.delay_timer(), 8);
        interpreter.step().unwrap();
        assert_eq!(interpreter.delay_timer(), 7);
    }

    #[test]
    fn bcd() {
        let mut interpreter = boot(&[0x60EA, 0xA300, 0xF033]);
        run(&mut interpreter, 3);
        assert_eq!(interpreter.memory()[0x300..0x303], [2, 3, 4]);
        assert_eq!(interpreter.pc(), 0x206);

        let mut interpreter = boot(&[0xAFFE, 0xF033]);
        interpreter.step().unwrap();
        assert!(interpreter.step().is_err());
    }

    #[test]
    fn store_and_load_registers() {
        let mut interpreter = boot(&[0x6001, 0x6102, 0x6203, 0x6304, 0xA300, 0xF255]);
        run(&mut interpreter, 6);
        assert_eq!(interpreter.memory()[0x300..0x304], [1, 2, 3, 0]);

        interpreter.poke(0x20C, &[0xA301, 0xF165]);
        run(&mut interpreter, 2);
        assert_eq!(interpreter.register(0), 2);
        assert_eq!(interpreter.register(1), 3);
        assert_eq!(interpreter.register(2), 3);
        assert_eq!(interpreter.register(3), 4);
        assert_eq!(interpreter.index(), 0x301);

        let mut interpreter = boot(&[0xAFFE, 0xF255]);
        interpreter.step().unwrap();
        assert_eq!(
            interpreter.step(),
            Err(Fault::OutOfBoundsMemoryAccess {
                target: Target::Memory(0x1000)
            })
        );
    }

    #[test]
    fn load_truncates() {
        let mut interpreter = Interpreter::new();
        let rom = vec![0xAB; 4000];
        let summary = interpreter.load(&rom).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                written: 3584,
                dropped: 416
            }
        );
        assert_eq!(interpreter.memory()[0xFFF], 0xAB);
        assert!(matches!(interpreter.load(&[]), Err(LoadError::Empty)));
    }

    #[test]
    fn instances_are_independent() {
        let mut a = boot(&[0x6042]);
        let b = boot(&[0x6042]);
        a.step().unwrap();
        assert_eq!(a.register(0), 0x42);
        assert_eq!(b.register(0), 0);
        assert_eq!(b.pc(), 0x200);
    }
}
