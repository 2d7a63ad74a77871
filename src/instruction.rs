use std::fmt;

/// A raw 16-bit opcode split into its four nibbles.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct Instruction {
    pub nibbles: [u8; 4],
}

impl Instruction {
    pub fn word(&self) -> u16 {
        let [a, b, c, d] = self.nibbles;
        u16::from_be_bytes([bits::recombine(a, b), bits::recombine(c, d)])
    }

    fn nnn(&self) -> u16 {
        self.word() & 0x0FFF
    }

    fn nn(&self) -> u8 {
        bits::recombine(self.nibbles[2], self.nibbles[3])
    }
}

impl From<u16> for Instruction {
    fn from(inst: u16) -> Self {
        let [hi, lo] = inst.to_be_bytes();
        Self {
            nibbles: [(hi & 0xF0) >> 4, hi & 0xF, (lo & 0xF0) >> 4, lo & 0xF],
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for nibble in self.nibbles.iter() {
            write!(f, "{:X}", nibble)?;
        }
        Ok(())
    }
}

/// A decoded instruction. Register operands are indices into V0..=VF.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Op {
    Clear,
    Return,
    Jump(u16),
    Call(u16),
    SkipEqImm(usize, u8),
    SkipNeImm(usize, u8),
    SkipEqReg(usize, usize),
    SkipNeReg(usize, usize),
    LoadImm(usize, u8),
    AddImm(usize, u8),
    Move(usize, usize),
    Or(usize, usize),
    And(usize, usize),
    Xor(usize, usize),
    AddReg(usize, usize),
    SubReg(usize, usize),
    ShiftRight(usize, usize),
    SubReverse(usize, usize),
    ShiftLeft(usize, usize),
    LoadIndex(u16),
    JumpIndexed(u16),
    Random(usize, u8),
    Draw(usize, usize, u8),
    SkipKeyPressed(usize),
    SkipKeyReleased(usize),
    ReadDelay(usize),
    WaitKey(usize),
    SetDelay(usize),
    SetSound(usize),
    AddIndex(usize),
    LoadGlyph(usize),
    StoreBcd(usize),
    StoreRegisters(usize),
    LoadRegisters(usize),
}

impl Op {
    /// Decodes `inst`, or `None` if the bit pattern names no instruction.
    pub fn decode(inst: Instruction) -> Option<Self> {
        let [_, x, y, n] = inst.nibbles;
        let (x, y) = (x as usize, y as usize);
        let op = match inst.nibbles {
            [0x0, 0x0, 0xE, 0x0] => Self::Clear,
            [0x0, 0x0, 0xE, 0xE] => Self::Return,
            [0x1, ..] => Self::Jump(inst.nnn()),
            [0x2, ..] => Self::Call(inst.nnn()),
            [0x3, ..] => Self::SkipEqImm(x, inst.nn()),
            [0x4, ..] => Self::SkipNeImm(x, inst.nn()),
            [0x5, .., 0x0] => Self::SkipEqReg(x, y),
            [0x6, ..] => Self::LoadImm(x, inst.nn()),
            [0x7, ..] => Self::AddImm(x, inst.nn()),
            [0x8, .., 0x0] => Self::Move(x, y),
            [0x8, .., 0x1] => Self::Or(x, y),
            [0x8, .., 0x2] => Self::And(x, y),
            [0x8, .., 0x3] => Self::Xor(x, y),
            [0x8, .., 0x4] => Self::AddReg(x, y),
            [0x8, .., 0x5] => Self::SubReg(x, y),
            [0x8, .., 0x6] => Self::ShiftRight(x, y),
            [0x8, .., 0x7] => Self::SubReverse(x, y),
            [0x8, .., 0xE] => Self::ShiftLeft(x, y),
            [0x9, .., 0x0] => Self::SkipNeReg(x, y),
            [0xA, ..] => Self::LoadIndex(inst.nnn()),
            [0xB, ..] => Self::JumpIndexed(inst.nnn()),
            [0xC, ..] => Self::Random(x, inst.nn()),
            [0xD, ..] => Self::Draw(x, y, n),
            [0xE, _, 0x9, 0xE] => Self::SkipKeyPressed(x),
            [0xE, _, 0xA, 0x1] => Self::SkipKeyReleased(x),
            [0xF, _, 0x0, 0x7] => Self::ReadDelay(x),
            [0xF, _, 0x0, 0xA] => Self::WaitKey(x),
            [0xF, _, 0x1, 0x5] => Self::SetDelay(x),
            [0xF, _, 0x1, 0x8] => Self::SetSound(x),
            [0xF, _, 0x1, 0xE] => Self::AddIndex(x),
            [0xF, _, 0x2, 0x9] => Self::LoadGlyph(x),
            [0xF, _, 0x3, 0x3] => Self::StoreBcd(x),
            [0xF, _, 0x5, 0x5] => Self::StoreRegisters(x),
            [0xF, _, 0x6, 0x5] => Self::LoadRegisters(x),
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Clear => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {addr:#05X}"),
            Self::Call(addr) => write!(f, "CALL {addr:#05X}"),
            Self::SkipEqImm(x, nn) => write!(f, "SE V{x:X}, {nn:#04X}"),
            Self::SkipNeImm(x, nn) => write!(f, "SNE V{x:X}, {nn:#04X}"),
            Self::SkipEqReg(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            Self::SkipNeReg(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::LoadImm(x, nn) => write!(f, "LD V{x:X}, {nn:#04X}"),
            Self::AddImm(x, nn) => write!(f, "ADD V{x:X}, {nn:#04X}"),
            Self::Move(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            Self::Xor(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::AddReg(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::SubReg(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::ShiftRight(x, y) => write!(f, "SHR V{x:X}, V{y:X}"),
            Self::SubReverse(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::ShiftLeft(x, y) => write!(f, "SHL V{x:X}, V{y:X}"),
            Self::LoadIndex(addr) => write!(f, "LD I, {addr:#05X}"),
            Self::JumpIndexed(addr) => write!(f, "JP V0, {addr:#05X}"),
            Self::Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04X}"),
            Self::Draw(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipKeyPressed(x) => write!(f, "SKP V{x:X}"),
            Self::SkipKeyReleased(x) => write!(f, "SKNP V{x:X}"),
            Self::ReadDelay(x) => write!(f, "LD V{x:X}, DT"),
            Self::WaitKey(x) => write!(f, "LD V{x:X}, K"),
            Self::SetDelay(x) => write!(f, "LD DT, V{x:X}"),
            Self::SetSound(x) => write!(f, "LD ST, V{x:X}"),
            Self::AddIndex(x) => write!(f, "ADD I, V{x:X}"),
            Self::LoadGlyph(x) => write!(f, "LD F, V{x:X}"),
            Self::StoreBcd(x) => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisters(x) => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisters(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

mod bits {
    pub const fn recombine(upper: u8, lower: u8) -> u8 {
        (upper << 4) | lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction() {
        let val = 0b00101110; // 46
        let inst = Instruction::from(val);
        assert_eq!(
            inst,
            Instruction {
                nibbles: [0, 0, 0b0010, 0b1110]
            }
        );
        assert_eq!(inst.word(), val);
        assert_eq!(format!("{:?}", Instruction::from(0xD12F)), "D12F");
    }

    #[test]
    fn decode() {
        let decode = |word: u16| Op::decode(Instruction::from(word));
        assert_eq!(decode(0x00E0), Some(Op::Clear));
        assert_eq!(decode(0x00EE), Some(Op::Return));
        assert_eq!(decode(0x1ABC), Some(Op::Jump(0xABC)));
        assert_eq!(decode(0x3A05), Some(Op::SkipEqImm(0xA, 0x05)));
        assert_eq!(decode(0x8124), Some(Op::AddReg(1, 2)));
        assert_eq!(decode(0x812E), Some(Op::ShiftLeft(1, 2)));
        assert_eq!(decode(0xD015), Some(Op::Draw(0, 1, 5)));
        assert_eq!(decode(0xF265), Some(Op::LoadRegisters(2)));
    }

    #[test]
    fn decode_unknown() {
        let decode = |word: u16| Op::decode(Instruction::from(word));
        for word in [0x0000, 0x0123, 0x5121, 0x8128, 0x9121, 0xE19F, 0xF1FF] {
            assert_eq!(decode(word), None, "{word:04X}");
        }
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Op::LoadImm(0xA, 5).to_string(), "LD VA, 0x05");
        assert_eq!(Op::Draw(0, 1, 5).to_string(), "DRW V0, V1, 5");
        assert_eq!(Op::Call(0x2F0).to_string(), "CALL 0x2F0");
        assert_eq!(Op::StoreRegisters(0xF).to_string(), "LD [I], VF");
    }
}
