/// Return addresses saved by `2NNN` and restored by `00EE`.
#[derive(Debug, Default, Clone)]
pub struct Stack {
    entries: [u16; Stack::CAPACITY],
    depth: usize,
}

/// Raised when a push or pop would leave `[0, CAPACITY]`.
#[derive(Debug, PartialEq, Eq)]
pub enum StackError {
    Overflow,
    Underflow,
}

impl Stack {
    pub const CAPACITY: usize = 16;

    pub fn push(&mut self, addr: u16) -> Result<(), StackError> {
        if self.depth == Self::CAPACITY {
            return Err(StackError::Overflow);
        }
        self.entries[self.depth] = addr;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.depth == 0 {
            return Err(StackError::Underflow);
        }
        self.depth -= 1;
        Ok(self.entries[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
