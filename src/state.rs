//! Run state representation for a cog

mod debugger;

pub use debugger::Debugger;

/// Paced run states of a cog.
///
/// Exactly one state is consumed per hub tick. The wait states poll their
/// release condition on every tick and fall back to
/// [`CogState::ExecInterpreter`] when it holds; [`CogState::WaitVideo`] is
/// only released externally, by the host delivering a frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum CogState {
    /// Cog is not executing; ticks pass through as no-ops.
    #[default]
    Stopped,
    /// Counting down the boot delay before the boot frame is loaded.
    BootInterpreter,
    /// Fetch and execute one bytecode on the next tick.
    ExecInterpreter,
    /// Consuming the fixed pacing delay charged for the previous bytecode.
    WaitInterpreter,
    /// Suspended until the selected pin bus masks to the target value.
    WaitPinsEqual,
    /// Suspended until the selected pin bus masks away from the target value.
    WaitPinsNotEqual,
    /// Suspended until the system counter equals the target value exactly.
    WaitCount,
    /// Suspended until the host delivers a video frame slot.
    WaitVideo,
}

impl CogState {
    /// Return `true` while the cog still makes progress on its own, without
    /// external intervention.
    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

/// Video frame accounting for the most recent frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameCondition {
    /// No frame slot has been offered yet.
    #[default]
    None,
    /// The cog was waiting and consumed the frame slot.
    Hit,
    /// A frame slot arrived while the cog was not waiting for video.
    Miss,
}

/// Pin bus selector for the pin-wait conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub enum PinPort {
    /// Pins 0–31.
    #[default]
    A,
    /// Pins 32–63.
    B,
}

impl From<u32> for PinPort {
    fn from(port: u32) -> Self {
        if port == 0 {
            Self::A
        } else {
            Self::B
        }
    }
}
