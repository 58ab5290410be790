use super::Cog;
use crate::error::Diagnostic;
use crate::hub::Hub;

impl<H> Cog<H>
where
    H: Hub,
{
    /// Fetch one bytecode and execute it.
    ///
    /// The table splits on the top bits: 0x00–0x3F are individually
    /// dispatched, 0x40–0x7F is the packed variable/local family,
    /// 0x80–0xDF the bit-sliced memory family, and 0xE0–0xFF the math
    /// family (the memory family's reserved fourth size).
    pub(crate) fn execute_bytecode(&mut self) {
        let origin = self.pc;
        let op = self.fetch();

        match op {
            0x00..=0x3F => self.special_op(op, origin),
            0x40..=0x7F => self.fast_memory_op(op),
            0x80..=0xDF => self.masked_memory_op(op),
            _ => {
                let initial = self.pop_long();
                let result = self.math_op(op - 0xE0, true, initial);
                self.push_long(result);
            }
        }
    }

    fn special_op(&mut self, op: u8, origin: u32) {
        match op {
            0x00..=0x03 => self.prepare_frame(op),
            0x04 => {
                let branch = self.read_packed_signed();
                self.branch(branch);
            }
            0x05..=0x07 => self.call(op),
            0x08 => self.loop_start(),
            0x09 => self.loop_continue(),
            0x0A => self.conditional_branch(false),
            0x0B => self.conditional_branch(true),
            0x0C => self.case_done(),
            0x0D => self.case_value(),
            0x0E => self.case_range(),
            0x0F => self.lookup_done(),
            0x10 => self.lookup_value(false),
            0x11 => self.lookup_value(true),
            0x12 => self.lookup_range(false),
            0x13 => self.lookup_range(true),
            0x15 => self.interpreter_flag = true,
            0x16 => self.string_size(),
            0x17 => self.string_compare(),
            0x18..=0x1A => self.fill(u32::from(op) - 0x18),
            0x1B => self.wait_pins(false),
            0x1C..=0x1E => self.transfer(u32::from(op) - 0x1C),
            0x1F => self.wait_pins(true),
            0x20 => self.clock_set(),
            0x21 => self.stop_cog_op(),
            0x22 => self.lock_return_op(),
            0x23 => self.wait_count(),
            0x24..=0x26 => self.spr_op(op),
            0x27 => self.wait_video(),
            0x28..=0x2F => self.hub_control(op),
            0x30 => {
                let value = self.hub.direct_read_long(self.local_frame);
                self.return_from_sub(value, true);
            }
            0x31 => {
                let value = self.pop_long();
                self.return_from_sub(value, true);
            }
            0x32 => {
                let value = self.hub.direct_read_long(self.local_frame);
                self.return_from_sub(value, false);
            }
            0x33 => {
                let value = self.pop_long();
                self.return_from_sub(value, false);
            }
            0x34 => self.push_long(u32::MAX),
            0x35 => self.push_long(0),
            0x36 => self.push_long(1),
            0x37 => self.packed_literal(),
            0x38..=0x3B => {
                let value = self.read_constant(u32::from(op) - 0x37);
                self.push_long(value);
            }
            0x3D => {
                let bit = self.pop_long();
                self.register_memory_op(1u32.wrapping_shl(bit), bit & 0x1F);
            }
            0x3E => {
                let second = self.pop_long() & 0x1F;
                let first = self.pop_long() & 0x1F;
                let (low, high) = if first <= second {
                    (first, second)
                } else {
                    (second, first)
                };
                let mask = (((1u64 << (high - low + 1)) - 1) as u32) << low;
                self.register_memory_op(mask, low);
            }
            0x3F => self.register_memory_op(u32::MAX, 0),
            // 0x14 and 0x3C have no definition in the bytecode table.
            _ => self.report(Diagnostic::UndefinedOpcode { opcode: op, pc: origin }),
        }
    }

    /// 0x37: rotate-encoded literal, a two rotated left, optionally
    /// decremented and complemented.
    fn packed_literal(&mut self) {
        let encoded = self.fetch();
        let mut value = 2u32.rotate_left(u32::from(encoded) & 0x1F);

        if encoded & 0x20 != 0 {
            value = value.wrapping_sub(1);
        }
        if encoded & 0x40 != 0 {
            value = !value;
        }

        self.push_long(value);
    }
}
