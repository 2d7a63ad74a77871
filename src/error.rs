use std::fmt;
use std::path::PathBuf;

/// A terminal interpreter fault. Once `step` returns one of these the
/// machine must not be stepped again.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Fault {
    #[error("Unsupported opcode {opcode:04X} at {pc:#05X}")]
    UnsupportedOpcode { opcode: u16, pc: u16 },

    #[error("Stack overflow: call at {pc:#05X} exceeds {} nested subroutines", crate::stack::Stack::CAPACITY)]
    StackOverflow { pc: u16 },

    #[error("Stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("Out of bounds access to {target}")]
    OutOfBoundsMemoryAccess { target: Target },
}

/// What an out of bounds access was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Memory(usize),
    Cell { x: usize, y: usize },
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory(address) => write!(f, "memory address {address:#05X}"),
            Self::Cell { x, y } => write!(f, "framebuffer cell ({x}, {y})"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read ROM {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ROM is empty")]
    Empty,
}
