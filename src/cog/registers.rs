use super::Cog;
use crate::consts::{COG_MEMORY_SIZE, REG_CNT, REG_COGID, REG_INA, REG_INB};
use crate::hub::Hub;

impl<H> Cog<H>
where
    H: Hub,
{
    /// Read a cog register.
    ///
    /// The live special registers are routed at read time: the counter and
    /// pin buses come from the hub, the cog id from the construction
    /// parameter. Everything else reads the register file.
    pub fn cog_register(&self, address: usize) -> u32 {
        match address {
            REG_CNT => self.hub.counter() as u32,
            REG_INA => self.hub.ina(),
            REG_INB => self.hub.inb(),
            REG_COGID => self.cog_id,
            _ => self.regs[address & (COG_MEMORY_SIZE - 1)],
        }
    }

    pub(crate) fn write_register(&mut self, address: usize, value: u32) {
        self.regs[address & (COG_MEMORY_SIZE - 1)] = value;
    }
}
