use super::Cog;
use crate::consts::{HUB_ADDRESS_MASK, REG_WINDOW_BASE};
use crate::error::Diagnostic;
use crate::hub::Hub;

impl<H> Cog<H>
where
    H: Hub,
{
    /// Bit-sliced memory family: `1 ss i bb qq`.
    ///
    /// `ss` picks the access size, `i` adds a popped, size-scaled index,
    /// `bb` selects the base (a popped main address, or a packed offset
    /// into the object/variable/local frame) and `qq` the action.
    pub(crate) fn masked_memory_op(&mut self, op: u8) {
        let size = u32::from(op >> 5) & 3;
        let indexed = op & 0x10 != 0;
        let base = op >> 2 & 3;
        let action = op & 3;

        let address = if base == 0 {
            if indexed {
                let index = self.pop_long();
                index.wrapping_add(self.pop_long().wrapping_shl(size))
            } else {
                self.pop_long()
            }
        } else {
            let frame = match base {
                1 => self.object_frame,
                2 => self.variable_frame,
                _ => self.local_frame,
            };
            let mut address = frame.wrapping_add(self.read_packed_unsigned());
            if indexed {
                address = address.wrapping_add(self.pop_long().wrapping_shl(size));
            }
            address
        };

        self.memory_action(action, size, address & HUB_ADDRESS_MASK);
    }

    /// Packed fast family: `01 b vvv qq`, a long access at one of the first
    /// eight variable or local slots.
    pub(crate) fn fast_memory_op(&mut self, op: u8) {
        let frame = if op & 0x20 == 0 {
            self.variable_frame
        } else {
            self.local_frame
        };
        let offset = u32::from(op >> 2 & 7) * 4;
        let address = frame.wrapping_add(offset) & HUB_ADDRESS_MASK;

        self.memory_action(op & 3, 2, address);
    }

    fn memory_action(&mut self, action: u8, size: u32, address: u32) {
        match action {
            0 => {
                let value = self.read_sized(size, address);
                self.push_long(value);
            }
            1 => {
                let value = self.pop_long();
                self.write_sized(size, address, value);
            }
            2 => {
                let value = self.read_sized(size, address);
                let stored = self.inplace_op(value);
                self.write_sized(size, address, stored);
            }
            _ => self.push_long(address),
        }
    }

    /// Masked read-modify-write against the register window.
    ///
    /// The sub-byte selects the register and the action; `mask` and
    /// `lowest_bit` frame the field being accessed.
    pub(crate) fn register_memory_op(&mut self, mask: u32, lowest_bit: u32) {
        let origin = self.pc;
        let sub = self.fetch();
        let register = REG_WINDOW_BASE + usize::from(sub & 0x1F);

        match sub >> 5 {
            0b100 => {
                let field = (self.cog_register(register) & mask) >> lowest_bit;
                self.push_long(field);
            }
            0b101 => {
                let value = self.pop_long();
                let merged =
                    self.cog_register(register) & !mask | value.wrapping_shl(lowest_bit) & mask;
                self.write_register(register, merged);
            }
            0b110 => {
                let field = (self.cog_register(register) & mask) >> lowest_bit;
                let stored = self.inplace_op(field);
                let merged =
                    self.cog_register(register) & !mask | stored.wrapping_shl(lowest_bit) & mask;
                self.write_register(register, merged);
            }
            _ => self.report(Diagnostic::UndefinedRegisterOp { opcode: sub, pc: origin }),
        }
    }

    pub(crate) fn read_sized(&self, size: u32, address: u32) -> u32 {
        match size {
            0 => u32::from(self.hub.direct_read_byte(address)),
            1 => u32::from(self.hub.direct_read_word(address)),
            _ => self.hub.direct_read_long(address),
        }
    }

    pub(crate) fn write_sized(&mut self, size: u32, address: u32, value: u32) {
        match size {
            0 => self.hub.direct_write_byte(address, value as u8),
            1 => self.hub.direct_write_word(address, value as u16),
            _ => self.hub.direct_write_long(address, value),
        }
    }
}
