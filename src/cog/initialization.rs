use super::Cog;
use crate::consts::{HUB_ADDRESS_MASK, REG_INITCOGID, REG_PAR};
use crate::hub::Hub;
use crate::state::CogState;
use tracing::debug;

impl<H> Cog<H>
where
    H: Hub,
{
    /// Load the boot frame pointed to by PAR and enter execution.
    ///
    /// The four words below the boot frame cursor carry the object frame,
    /// the variable frame, the entry program counter and the initial stack
    /// top. The cursor itself becomes the boot function's local frame, so
    /// a top-level return finds its default result there.
    pub(crate) fn boot(&mut self) {
        let init_frame = self.regs[REG_PAR] & HUB_ADDRESS_MASK;

        self.regs[REG_INITCOGID] = init_frame.wrapping_sub(4);

        self.object_frame = u32::from(self.hub.direct_read_word(init_frame.wrapping_sub(8)));
        self.variable_frame = u32::from(self.hub.direct_read_word(init_frame.wrapping_sub(6)));
        self.pc = u32::from(self.hub.direct_read_word(init_frame.wrapping_sub(4)));
        self.stack_frame =
            u32::from(self.hub.direct_read_word(init_frame.wrapping_sub(2))).wrapping_sub(4);
        self.local_frame = init_frame.wrapping_sub(4);

        // The boot frame is single-use: poison the saved frame words and
        // zero the boot function's result slot.
        self.hub.direct_write_long(init_frame.wrapping_sub(8), u32::MAX);
        self.hub.direct_write_long(init_frame.wrapping_sub(4), 0);

        debug!(
            cog = self.cog_id,
            pc = self.pc,
            object = self.object_frame,
            "interpreter booted"
        );
        self.state = CogState::ExecInterpreter;
    }
}
