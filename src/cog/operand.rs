use super::Cog;
use crate::consts::HUB_ADDRESS_MASK;
use crate::hub::Hub;

impl<H> Cog<H>
where
    H: Hub,
{
    /// Fetch the next byte of the bytecode stream.
    pub(crate) fn fetch(&mut self) -> u8 {
        let value = self.hub.direct_read_byte(self.pc);
        self.pc = self.pc.wrapping_add(1) & HUB_ADDRESS_MASK;
        value
    }

    /// Read a 1–2 byte packed unsigned operand.
    ///
    /// A set high bit extends the operand with a second byte, yielding 15
    /// significant bits.
    pub(crate) fn read_packed_unsigned(&mut self) -> u32 {
        let first = u32::from(self.fetch());

        if first & 0x80 == 0 {
            first
        } else {
            (first << 8 | u32::from(self.fetch())) & 0x7FFF
        }
    }

    /// Read a 1–2 byte packed signed operand (7- or 15-bit two's
    /// complement).
    pub(crate) fn read_packed_signed(&mut self) -> i32 {
        let first = u32::from(self.fetch());

        if first & 0x80 == 0 {
            (first << 25) as i32 >> 25
        } else {
            let packed = (first << 8 | u32::from(self.fetch())) & 0x7FFF;
            (packed << 17) as i32 >> 17
        }
    }

    /// Read a big-endian constant of 1–4 bytes.
    pub(crate) fn read_constant(&mut self, bytes: u32) -> u32 {
        (0..bytes).fold(0, |value, _| value << 8 | u32::from(self.fetch()))
    }
}
