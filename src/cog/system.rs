use super::alu::bool_long;
use super::Cog;
use crate::consts::{
    CLOCK_FREQUENCY_ADDRESS, CLOCK_MODE_ADDRESS, COG_COUNT, HUB_ADDRESS_MASK, HUB_MEMORY_SIZE,
    INTERPRETER_ENTRY, LOCK_COUNT, REG_SPR_BASE,
};
use crate::hub::Hub;
use crate::state::{CogState, PinPort};
use tracing::{debug, trace};

impl<H> Cog<H>
where
    H: Hub,
{
    /// 0x16: length of a NUL-terminated string, clamped at the top of hub
    /// space.
    pub(crate) fn string_size(&mut self) {
        let base = self.pop_long() & HUB_ADDRESS_MASK;
        let mut length = 0;

        while base + length < HUB_MEMORY_SIZE && self.hub.direct_read_byte(base + length) != 0 {
            length += 1;
        }

        self.push_long(length);
    }

    /// 0x17: NUL-terminated string equality; all-ones when equal.
    pub(crate) fn string_compare(&mut self) {
        let mut second = self.pop_long() & HUB_ADDRESS_MASK;
        let mut first = self.pop_long() & HUB_ADDRESS_MASK;

        loop {
            let a = self.hub.direct_read_byte(first);
            let b = self.hub.direct_read_byte(second);

            if a != b {
                self.push_long(0);
                return;
            }

            if a == 0 {
                self.push_long(u32::MAX);
                return;
            }

            first = first.wrapping_add(1) & HUB_ADDRESS_MASK;
            second = second.wrapping_add(1) & HUB_ADDRESS_MASK;
        }
    }

    /// 0x18–0x1A: sized fill.
    pub(crate) fn fill(&mut self, size: u32) {
        let count = self.pop_long();
        let value = self.pop_long();
        let dest = self.pop_long();

        for slot in 0..count {
            self.write_sized(size, dest.wrapping_add(slot << size) & HUB_ADDRESS_MASK, value);
        }
    }

    /// 0x1C–0x1E: sized forward move.
    pub(crate) fn transfer(&mut self, size: u32) {
        let count = self.pop_long();
        let source = self.pop_long();
        let dest = self.pop_long();

        for slot in 0..count {
            let value = self.read_sized(size, source.wrapping_add(slot << size) & HUB_ADDRESS_MASK);
            self.write_sized(size, dest.wrapping_add(slot << size) & HUB_ADDRESS_MASK, value);
        }
    }

    /// 0x1B/0x1F: suspend until the selected pin bus masks to (or away
    /// from) the target pattern.
    pub(crate) fn wait_pins(&mut self, until_not_equal: bool) {
        let port = self.pop_long();
        self.mask_value = self.pop_long();
        self.target_value = self.pop_long();
        self.port = PinPort::from(port);

        self.state = if until_not_equal {
            CogState::WaitPinsNotEqual
        } else {
            CogState::WaitPinsEqual
        };
        trace!(cog = self.cog_id, state = %self.state, "cog suspended");
    }

    /// 0x23: suspend until the system counter matches exactly.
    pub(crate) fn wait_count(&mut self) {
        self.target_value = self.pop_long();
        self.state = CogState::WaitCount;
        trace!(cog = self.cog_id, state = %self.state, "cog suspended");
    }

    /// 0x27: park until the host delivers a video frame slot.
    pub(crate) fn wait_video(&mut self) {
        self.pixels_value = self.pop_long();
        self.colors_value = self.pop_long();
        self.state = CogState::WaitVideo;
        trace!(cog = self.cog_id, state = %self.state, "cog suspended");
    }

    /// 0x20: publish the clock configuration and inform the hub.
    pub(crate) fn clock_set(&mut self) {
        let frequency = self.pop_long();
        self.hub.direct_write_long(CLOCK_FREQUENCY_ADDRESS, frequency);

        let mode = self.pop_long() as u8;
        self.hub.direct_write_byte(CLOCK_MODE_ADDRESS, mode);
        self.hub.set_clock_mode(mode);
    }

    /// 0x21: stop a cog through the hub.
    pub(crate) fn stop_cog_op(&mut self) {
        let id = self.pop_long() & (COG_COUNT - 1);
        self.hub.cog_stop(id);

        // The hub handle cannot reach back into this value, so a self-stop
        // parks the cog directly.
        if id == self.cog_id {
            self.state = CogState::Stopped;
        }
    }

    /// 0x22: return a lock to the hub pool.
    pub(crate) fn lock_return_op(&mut self) {
        let id = self.pop_long() & (LOCK_COUNT - 1);
        self.hub.lock_return(id);
    }

    /// 0x24–0x26: whole special-purpose-register read/write/using.
    ///
    /// An out-of-range register number is swallowed after the address pop;
    /// the value operand of the write and using forms stays on the stack.
    pub(crate) fn spr_op(&mut self, op: u8) {
        let address = self.pop_long();
        if address >= 16 {
            return;
        }

        let register = REG_SPR_BASE + address as usize;

        match op {
            0x24 => {
                let value = self.cog_register(register);
                self.push_long(value);
            }
            0x25 => {
                let value = self.pop_long();
                self.write_register(register, value);
            }
            _ => {
                let value = self.cog_register(register);
                let stored = self.inplace_op(value);
                self.write_register(register, stored);
            }
        }
    }

    /// 0x28–0x2F: cog and lock control group, with and without a pushed
    /// result.
    pub(crate) fn hub_control(&mut self, op: u8) {
        let result = match op & 3 {
            0 => self.cog_init(),
            1 => self.hub.lock_new(),
            2 => {
                let id = self.pop_long() & (LOCK_COUNT - 1);
                bool_long(self.hub.lock_set(id, true))
            }
            _ => {
                let id = self.pop_long() & (LOCK_COUNT - 1);
                bool_long(self.hub.lock_set(id, false))
            }
        };

        if op & 4 != 0 {
            self.push_long(result);
        }
    }

    /// Assemble and issue a COGINIT request.
    ///
    /// With the interpreted mark set, the launched cog runs the bytecode
    /// interpreter: a boot frame is laid just below the supplied stack
    /// pointer and the argument longs move into the new cog's stack. The
    /// plain form boots machine code from a hub address.
    fn cog_init(&mut self) -> u32 {
        let code = if self.interpreter_flag {
            self.interpreter_flag = false;

            // Skip the header the host reserves under the stack pointer.
            let stack_pointer = self.pop_long().wrapping_add(8);
            let descriptor = self.pop_long();
            let arguments = descriptor >> 8;
            let function = descriptor & 0xFF;

            // Long-align upward.
            let stack_pointer = stack_pointer.wrapping_add(3) & !3;

            let function_code =
                self.object_frame.wrapping_add(function.wrapping_mul(4)) & HUB_ADDRESS_MASK;
            let offset = u32::from(self.hub.direct_read_word(function_code));
            let funct_stack = stack_pointer.wrapping_add(u32::from(
                self.hub.direct_read_word(function_code.wrapping_add(2)),
            ));

            self.hub
                .direct_write_word(stack_pointer.wrapping_sub(8), self.object_frame as u16);
            self.hub
                .direct_write_word(stack_pointer.wrapping_sub(6), self.variable_frame as u16);
            self.hub.direct_write_word(
                stack_pointer.wrapping_sub(4),
                self.object_frame.wrapping_add(offset) as u16,
            );
            self.hub.direct_write_word(
                stack_pointer.wrapping_sub(2),
                funct_stack.wrapping_add(4) as u16,
            );

            // Arguments land in call order below the new stack top.
            for slot in (0..arguments).rev() {
                let value = self.pop_long();
                self.hub
                    .direct_write_long(stack_pointer.wrapping_add(slot.wrapping_mul(4)), value);
            }

            let id = normalize_cog_id(self.pop_long());
            (INTERPRETER_ENTRY & 0xFFFC) << 2 | stack_pointer << 16 | id
        } else {
            let boot_param = self.pop_long();
            let entry_point = self.pop_long();
            let id = normalize_cog_id(self.pop_long());

            (entry_point & 0xFFFC) << 2 | (boot_param & 0xFFFC) << 16 | id
        };

        debug!(cog = self.cog_id, code, "cog start requested");
        self.hub.cog_start(code)
    }
}

/// An id beyond the package requests first-free placement.
fn normalize_cog_id(id: u32) -> u32 {
    if id < COG_COUNT {
        id
    } else {
        0x8
    }
}
