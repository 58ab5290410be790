use super::Cog;
use crate::consts::{HUB_ADDRESS_MASK, LOOKUP_NOT_FOUND};
use crate::error::Diagnostic;
use crate::hub::Hub;
use crate::state::CogState;
use tracing::debug;

bitflags::bitflags! {
    /// Return-type mask stored on the call stack by the frame-prep
    /// bytecodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ReturnFlags: u32 {
        /// Caller discards the return value.
        const DISCARD_RESULT = 0b01;
        /// Frame traps aborts instead of letting them unwind through.
        const TRAP_ABORT = 0b10;
    }
}

impl<H> Cog<H>
where
    H: Hub,
{
    /// Relative branch within the bytecode stream.
    pub(crate) fn branch(&mut self, offset: i32) {
        self.pc = self.pc.wrapping_add(offset as u32) & HUB_ADDRESS_MASK;
    }

    /// 0x00–0x03: lay down a call record and remember the saved-PC slot.
    ///
    /// The record holds the caller's three frame pointers as words, a word
    /// slot for the return address (patched by the call bytecode) and a
    /// zeroed default-return long, which becomes the callee's local frame
    /// base.
    pub(crate) fn prepare_frame(&mut self, op: u8) {
        self.call_stack.push(u32::from(op & 0x03));

        self.push_word(self.object_frame as u16);
        self.push_word(self.variable_frame as u16);
        self.push_word(self.local_frame as u16);

        self.call_stack.push(self.stack_frame);
        self.push_word(0);
        self.push_long(0);
    }

    /// 0x05–0x07: enter a function through the current object's method
    /// table, optionally descending into a child object first.
    pub(crate) fn call(&mut self, op: u8) {
        match op {
            0x06 => {
                let entry = u32::from(self.fetch());
                self.adjust_object(entry);
            }
            0x07 => {
                let entry = u32::from(self.fetch());
                let index = self.pop_long();
                self.adjust_object(entry.wrapping_add(index));
            }
            _ => {}
        }

        let function = u32::from(self.fetch());
        let function_code = self.object_frame.wrapping_add(function.wrapping_mul(4)) & HUB_ADDRESS_MASK;

        let Some(pc_slot) = self.call_stack.pop() else {
            self.report(Diagnostic::CallStackUnderflow { pc: self.pc });
            self.terminate();
            return;
        };

        self.local_frame = pc_slot.wrapping_add(2);
        self.hub.direct_write_word(pc_slot, self.pc as u16);

        self.pc = self
            .object_frame
            .wrapping_add(u32::from(self.hub.direct_read_word(function_code)))
            & HUB_ADDRESS_MASK;
        self.stack_frame = self
            .stack_frame
            .wrapping_add(u32::from(self.hub.direct_read_word(function_code.wrapping_add(2))));
    }

    /// Follow a child-object table entry, rebasing the object and variable
    /// frames.
    fn adjust_object(&mut self, entry: u32) {
        let object_code = self.object_frame.wrapping_add(entry.wrapping_mul(4)) & HUB_ADDRESS_MASK;

        self.object_frame = self
            .object_frame
            .wrapping_add(u32::from(self.hub.direct_read_word(object_code)));
        self.variable_frame = self
            .variable_frame
            .wrapping_add(u32::from(self.hub.direct_read_word(object_code.wrapping_add(2))));
    }

    /// Unwind call records until one accepts the value.
    ///
    /// A plain return consumes exactly one record. An abort keeps
    /// unwinding, consuming each record's saved frame words on the way,
    /// until it reaches a frame whose type mask traps aborts. Exhausting
    /// the call stack stops the cog; for a plain return that is the normal
    /// end of the boot function.
    pub(crate) fn return_from_sub(&mut self, value: u32, abort: bool) {
        loop {
            self.stack_frame = self.local_frame;

            let Some(mask) = self.call_stack.pop() else {
                self.terminate();
                return;
            };
            let flags = ReturnFlags::from_bits_truncate(mask);

            self.pc = u32::from(self.pop_word());
            self.local_frame = u32::from(self.pop_word());
            self.variable_frame = u32::from(self.pop_word());
            self.object_frame = u32::from(self.pop_word());

            if abort && !flags.contains(ReturnFlags::TRAP_ABORT) {
                continue;
            }

            if !flags.contains(ReturnFlags::DISCARD_RESULT) {
                self.push_long(value);
            }

            return;
        }
    }

    /// Stop this cog through the hub and park it.
    pub(crate) fn terminate(&mut self) {
        debug!(cog = self.cog_id, state = %self.state, "cog terminating");
        self.hub.cog_stop(self.cog_id);
        self.state = CogState::Stopped;
    }

    /// 0x08: loop bootstrap; branch out when the counter is exhausted.
    pub(crate) fn loop_start(&mut self) {
        let value = self.pop_long();
        let branch = self.read_packed_signed();

        if value as i32 <= 0 {
            self.branch(branch);
        } else {
            self.push_long(value);
        }
    }

    /// 0x09: decrement the loop counter and branch back while it lasts.
    pub(crate) fn loop_continue(&mut self) {
        let value = (self.pop_long() as i32).wrapping_sub(1);
        let branch = self.read_packed_signed();

        if value > 0 {
            self.branch(branch);
            self.push_long(value as u32);
        }
    }

    /// 0x0A/0x0B: conditional branch on zero / non-zero.
    pub(crate) fn conditional_branch(&mut self, branch_if_nonzero: bool) {
        let value = self.pop_long();
        let branch = self.read_packed_signed();

        if (value != 0) == branch_if_nonzero {
            self.branch(branch);
        }
    }

    /// 0x0C: leave a CASE ladder through the exit address stored under the
    /// selector.
    pub(crate) fn case_done(&mut self) {
        self.pop_long();
        let target = self.pop_long();
        self.pc = self.object_frame.wrapping_add(target) & HUB_ADDRESS_MASK;
    }

    /// 0x0D: single-value CASE entry. The selector stays on the stack
    /// either way; the ladder's exit bytecode consumes it.
    pub(crate) fn case_value(&mut self) {
        let probe = self.pop_long();
        let selector = self.pop_long();
        let branch = self.read_packed_signed();

        if probe == selector {
            self.branch(branch);
        }

        self.push_long(selector);
    }

    /// 0x0E: range CASE entry with a normalized, signed-inclusive range.
    pub(crate) fn case_range(&mut self) {
        let mut high = self.pop_long() as i32;
        let mut low = self.pop_long() as i32;
        let selector = self.pop_long();
        let branch = self.read_packed_signed();

        if low > high {
            core::mem::swap(&mut low, &mut high);
        }

        let value = selector as i32;
        if value >= low && value <= high {
            self.branch(branch);
        }

        self.push_long(selector);
    }

    /// 0x0F: lookup ladder ran dry; replace its state with the not-found
    /// sentinel.
    pub(crate) fn lookup_done(&mut self) {
        self.pop_long(); // key
        self.pop_long(); // jump
        self.pop_long(); // base
        self.push_long(LOOKUP_NOT_FOUND);
    }

    /// 0x10/0x11: single-value LOOKUP/LOOKDOWN entry.
    ///
    /// The ladder state is `base, jump, key` bottom-up, with the entry
    /// value on top. LOOKUP matches the key against the running position
    /// and yields the entry value; LOOKDOWN matches against the entry
    /// value and yields the position.
    pub(crate) fn lookup_value(&mut self, down: bool) {
        let entry = self.pop_long();
        let key = self.pop_long();
        let jump = self.pop_long();
        let base = self.pop_long();

        let matched = if down { key == entry } else { key == base };

        if matched {
            self.push_long(if down { base } else { entry });
            self.pc = self.object_frame.wrapping_add(jump) & HUB_ADDRESS_MASK;
        } else {
            self.push_long(base.wrapping_add(1));
            self.push_long(jump);
            self.push_long(key);
        }
    }

    /// 0x12/0x13: range LOOKUP/LOOKDOWN entry, consuming a whole
    /// `bottom..top` span of positions at once. Descending spans count
    /// downward.
    pub(crate) fn lookup_range(&mut self, down: bool) {
        let top = self.pop_long() as i32;
        let bottom = self.pop_long() as i32;
        let key = self.pop_long();
        let jump = self.pop_long();
        let base = self.pop_long();

        let ascending = bottom <= top;
        let span = if ascending {
            top.wrapping_sub(bottom)
        } else {
            bottom.wrapping_sub(top)
        }
        .wrapping_add(1) as u32;

        let result = if down {
            let probe = key as i32;
            let hit = if ascending {
                probe >= bottom && probe <= top
            } else {
                probe <= bottom && probe >= top
            };

            hit.then(|| {
                let offset = if ascending {
                    probe.wrapping_sub(bottom)
                } else {
                    bottom.wrapping_sub(probe)
                } as u32;
                base.wrapping_add(offset)
            })
        } else {
            let hit = key.wrapping_sub(base) < span;

            hit.then(|| {
                let offset = key.wrapping_sub(base) as i32;
                if ascending {
                    bottom.wrapping_add(offset) as u32
                } else {
                    bottom.wrapping_sub(offset) as u32
                }
            })
        };

        match result {
            Some(value) => {
                self.push_long(value);
                self.pc = self.object_frame.wrapping_add(jump) & HUB_ADDRESS_MASK;
            }
            None => {
                self.push_long(base.wrapping_add(span));
                self.push_long(jump);
                self.push_long(key);
            }
        }
    }
}
