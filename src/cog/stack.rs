use super::Cog;
use crate::hub::Hub;

impl<H> Cog<H>
where
    H: Hub,
{
    /// Push a long onto the hub-resident value stack.
    pub(crate) fn push_long(&mut self, value: u32) {
        self.hub.direct_write_long(self.stack_frame, value);
        self.stack_frame = self.stack_frame.wrapping_add(4);
    }

    /// Pop a long from the hub-resident value stack.
    pub(crate) fn pop_long(&mut self) -> u32 {
        self.stack_frame = self.stack_frame.wrapping_sub(4);
        self.hub.direct_read_long(self.stack_frame)
    }

    /// Push a word; used for the saved frame pointers of a call record.
    pub(crate) fn push_word(&mut self, value: u16) {
        self.hub.direct_write_word(self.stack_frame, value);
        self.stack_frame = self.stack_frame.wrapping_add(2);
    }

    /// Pop a word of a call record.
    pub(crate) fn pop_word(&mut self) -> u16 {
        self.stack_frame = self.stack_frame.wrapping_sub(2);
        self.hub.direct_read_word(self.stack_frame)
    }
}
