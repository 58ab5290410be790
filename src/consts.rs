//! Cog and hub parameters

/* COG GEOMETRY */

/// Number of longs in a cog's register file.
pub const COG_MEMORY_SIZE: usize = 0x200;

/// Hub RAM size, in bytes.
pub const HUB_MEMORY_SIZE: u32 = 0x1_0000;

/// Mask clamping a byte address into hub space.
pub const HUB_ADDRESS_MASK: u32 = HUB_MEMORY_SIZE - 1;

/// Number of cogs arbitrated by one hub.
pub const COG_COUNT: u32 = 8;

/// Number of hub locks.
pub const LOCK_COUNT: u32 = 8;

/* PACING */

/// Ticks consumed by the interpreter boot sequence before the boot frame is
/// loaded.
pub const BOOT_TICKS: u32 = 48;

/// Fixed pacing ticks charged after every interpreted bytecode.
pub const INSTRUCTION_TICKS: u32 = 32;

/* REGISTER FILE */

/// First register reachable by the register-file bytecodes.
pub const REG_WINDOW_BASE: usize = 0x1E0;

/// First special-purpose register, base of the SPR bytecodes.
pub const REG_SPR_BASE: usize = 0x1F0;

/// Id of the executing cog (emulator pseudo-register).
pub const REG_COGID: usize = 0x1E9;

/// Boot frame cursor left behind by the loader (emulator pseudo-register).
pub const REG_INITCOGID: usize = 0x1EF;

/// Boot parameter handed over by COGINIT.
pub const REG_PAR: usize = 0x1F0;

/// System counter, read live from the hub.
pub const REG_CNT: usize = 0x1F1;

/// Pin input bus A, read live from the hub.
pub const REG_INA: usize = 0x1F2;

/// Pin input bus B, read live from the hub.
pub const REG_INB: usize = 0x1F3;

/// Pin output bus A.
pub const REG_OUTA: usize = 0x1F4;

/// Pin output bus B.
pub const REG_OUTB: usize = 0x1F5;

/// Pin direction bus A.
pub const REG_DIRA: usize = 0x1F6;

/// Pin direction bus B.
pub const REG_DIRB: usize = 0x1F7;

/// Counter module A control.
pub const REG_CTRA: usize = 0x1F8;

/// Counter module B control.
pub const REG_CTRB: usize = 0x1F9;

/// Counter module A frequency.
pub const REG_FRQA: usize = 0x1FA;

/// Counter module B frequency.
pub const REG_FRQB: usize = 0x1FB;

/// Counter module A phase.
pub const REG_PHSA: usize = 0x1FC;

/// Counter module B phase.
pub const REG_PHSB: usize = 0x1FD;

/// Video generator configuration.
pub const REG_VCFG: usize = 0x1FE;

/// Video generator scale.
pub const REG_VSCL: usize = 0x1FF;

/* HUB LAYOUT */

/// Hub address of the long holding the system clock frequency.
pub const CLOCK_FREQUENCY_ADDRESS: u32 = 0;

/// Hub address of the byte holding the clock mode.
pub const CLOCK_MODE_ADDRESS: u32 = 4;

/// ROM entry point of the bytecode interpreter, used when relaunching an
/// interpreted cog through COGINIT.
pub const INTERPRETER_ENTRY: u32 = 0xF004;

/// Result pushed by lookup ladders that fall through without a match.
pub const LOOKUP_NOT_FOUND: u32 = 0xFFFF_FFFF;
