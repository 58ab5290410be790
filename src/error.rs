//! Runtime diagnostic surface
//!
//! Nothing in the interpreter faults: undefined bytecodes leave a
//! [`Diagnostic`] behind and execution continues, per the behavior of the
//! ROM interpreter being emulated. The embedding host decides whether to
//! display them; every diagnostic is also emitted through `tracing`.

use thiserror::Error;

/// Conditions the bytecode table leaves undefined, plus the one way a cog
/// can die.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A bytecode with no entry in the dispatch table was fetched.
    #[error("undefined bytecode {opcode:#04x} at {pc:#06x}")]
    UndefinedOpcode {
        /// The offending bytecode.
        opcode: u8,
        /// Address the bytecode was fetched from.
        pc: u32,
    },
    /// The second byte of a read-modify-write operation selected an
    /// assignment operator that does not exist.
    #[error("undefined in-place operator {opcode:#04x} at {pc:#06x}")]
    UndefinedInplaceOp {
        /// The offending sub-operator byte, push bit stripped.
        opcode: u8,
        /// Address the sub-operator was fetched from.
        pc: u32,
    },
    /// The sub-byte of a register-file operation selected an action other
    /// than push, pop or using.
    #[error("undefined register operation {opcode:#04x} at {pc:#06x}")]
    UndefinedRegisterOp {
        /// The offending sub-byte.
        opcode: u8,
        /// Address the sub-byte was fetched from.
        pc: u32,
    },
    /// A call was issued with no frame marker on the call stack; the cog
    /// has been stopped.
    #[error("call stack underflow at {pc:#06x}; cog stopped")]
    CallStackUnderflow {
        /// Program counter when the underflow was detected.
        pc: u32,
    },
}
