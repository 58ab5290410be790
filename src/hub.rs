//! Hub capability surface consumed by a cog
//!
//! The hub is the shared substrate of the eight-cog package: main RAM, pin
//! buses, the system counter, locks and cog control all live behind it. A
//! cog never assumes exclusive access; every read and write crosses this
//! trait, so a host emulator remains free to arbitrate between cogs however
//! it likes, and tests can substitute a deterministic hub.

mod memory;

pub use memory::MemoryHub;

/// Operations a cog requires from its hub.
///
/// Multi-byte accesses are little-endian. Implementations own address
/// clamping into the 64 KiB hub space; callers may pass unmasked addresses.
pub trait Hub {
    /// Read a byte from main RAM.
    fn direct_read_byte(&self, address: u32) -> u8;

    /// Read a little-endian word from main RAM.
    fn direct_read_word(&self, address: u32) -> u16;

    /// Read a little-endian long from main RAM.
    fn direct_read_long(&self, address: u32) -> u32;

    /// Write a byte to main RAM.
    fn direct_write_byte(&mut self, address: u32, value: u8);

    /// Write a little-endian word to main RAM.
    fn direct_write_word(&mut self, address: u32, value: u16);

    /// Write a little-endian long to main RAM.
    fn direct_write_long(&mut self, address: u32, value: u32);

    /// Current state of pin input bus A.
    fn ina(&self) -> u32;

    /// Current state of pin input bus B.
    fn inb(&self) -> u32;

    /// Monotonically incrementing system counter.
    fn counter(&self) -> i64;

    /// Allocate a lock. Returns the lock id, or all-ones when the pool is
    /// exhausted.
    fn lock_new(&mut self) -> u32;

    /// Return a lock to the pool.
    fn lock_return(&mut self, id: u32);

    /// Set or clear a lock, returning its previous state.
    fn lock_set(&mut self, id: u32, value: bool) -> bool;

    /// Start a cog from a packed COGINIT code word. Returns the started cog
    /// id, or all-ones on failure.
    fn cog_start(&mut self, code: u32) -> u32;

    /// Stop a cog.
    fn cog_stop(&mut self, id: u32);

    /// Record a new system clock mode.
    fn set_clock_mode(&mut self, mode: u8);
}

impl<H> Hub for &mut H
where
    H: Hub,
{
    fn direct_read_byte(&self, address: u32) -> u8 {
        (**self).direct_read_byte(address)
    }

    fn direct_read_word(&self, address: u32) -> u16 {
        (**self).direct_read_word(address)
    }

    fn direct_read_long(&self, address: u32) -> u32 {
        (**self).direct_read_long(address)
    }

    fn direct_write_byte(&mut self, address: u32, value: u8) {
        (**self).direct_write_byte(address, value)
    }

    fn direct_write_word(&mut self, address: u32, value: u16) {
        (**self).direct_write_word(address, value)
    }

    fn direct_write_long(&mut self, address: u32, value: u32) {
        (**self).direct_write_long(address, value)
    }

    fn ina(&self) -> u32 {
        (**self).ina()
    }

    fn inb(&self) -> u32 {
        (**self).inb()
    }

    fn counter(&self) -> i64 {
        (**self).counter()
    }

    fn lock_new(&mut self) -> u32 {
        (**self).lock_new()
    }

    fn lock_return(&mut self, id: u32) {
        (**self).lock_return(id)
    }

    fn lock_set(&mut self, id: u32, value: bool) -> bool {
        (**self).lock_set(id, value)
    }

    fn cog_start(&mut self, code: u32) -> u32 {
        (**self).cog_start(code)
    }

    fn cog_stop(&mut self, id: u32) {
        (**self).cog_stop(id)
    }

    fn set_clock_mode(&mut self, mode: u8) {
        (**self).set_clock_mode(mode)
    }
}
