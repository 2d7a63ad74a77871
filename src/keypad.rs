use log::{trace, warn};

#[derive(Debug, Default, Clone)]
pub struct Keypad {
    keys: [bool; Keypad::KEY_COUNT],
}

impl Keypad {
    pub const KEY_COUNT: usize = 16;

    pub fn press(&mut self, index: u8) {
        self.set(index, true);
    }

    pub fn release(&mut self, index: u8) {
        self.set(index, false);
    }

    /// Whether the key named by the low nibble of `value` is held.
    pub fn is_pressed(&self, value: u8) -> bool {
        self.keys[(value & 0xF) as usize]
    }

    fn set(&mut self, index: u8, down: bool) {
        match self.keys.get_mut(index as usize) {
            Some(key) => {
                *key = down;
                trace!("Key {index:X} [down: {down}]");
            }
            None => warn!("Ignoring event for unknown key index {index}"),
        }
    }
}
