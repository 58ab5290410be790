//! [`Cog`] implementation

use crate::consts::{BOOT_TICKS, COG_MEMORY_SIZE, INSTRUCTION_TICKS, REG_PAR};
use crate::error::Diagnostic;
use crate::hub::Hub;
use crate::state::{CogState, Debugger, FrameCondition, PinPort};

mod alu;
mod flow;
mod initialization;
mod instruction;
mod memory;
mod operand;
mod registers;
mod stack;
mod system;
mod using;

/// One interpreted execution unit of the eight-cog package.
///
/// The cog owns its pacing state, register file and call stack; everything
/// shared lives behind the [`Hub`] handle supplied at construction. The
/// value stack is not a Rust container: it is laid out in hub RAM between
/// the frame registers, exactly as the bytecode stream expects.
///
/// A freshly constructed cog boots the interpreter: it spends
/// [`BOOT_TICKS`] ticks in [`CogState::BootInterpreter`], loads the boot
/// frame pointed to by the PAR register, and starts executing.
#[derive(Debug, Clone)]
pub struct Cog<H> {
    hub: H,
    cog_id: u32,
    regs: [u32; COG_MEMORY_SIZE],
    pc: u32,
    stack_frame: u32,
    object_frame: u32,
    variable_frame: u32,
    local_frame: u32,
    call_stack: Vec<u32>,
    state: CogState,
    state_count: u32,
    target_value: u32,
    mask_value: u32,
    port: PinPort,
    pixels_value: u32,
    colors_value: u32,
    interpreter_flag: bool,
    frame_flag: FrameCondition,
    debugger: Debugger,
    diagnostics: Vec<Diagnostic>,
}

impl<H> Cog<H> {
    /// Create a cog booting the bytecode interpreter.
    ///
    /// `param` lands in the PAR register and is interpreted as the boot
    /// frame pointer once the boot delay elapses.
    pub fn new(hub: H, cog_id: u32, param: u32) -> Self {
        let mut regs = [0; COG_MEMORY_SIZE];
        regs[REG_PAR] = param;

        Self {
            hub,
            cog_id,
            regs,
            pc: 0,
            stack_frame: 0,
            object_frame: 0,
            variable_frame: 0,
            local_frame: 0,
            call_stack: vec![],
            state: CogState::BootInterpreter,
            state_count: BOOT_TICKS,
            target_value: 0,
            mask_value: 0,
            port: PinPort::A,
            pixels_value: 0,
            colors_value: 0,
            interpreter_flag: false,
            frame_flag: FrameCondition::None,
            debugger: Debugger::default(),
            diagnostics: vec![],
        }
    }

    /// Id of this cog within the package.
    pub const fn cog_id(&self) -> u32 {
        self.cog_id
    }

    /// Current program counter.
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Current run state.
    pub const fn state(&self) -> CogState {
        self.state
    }

    /// Video frame accounting for the most recent frame slot.
    pub const fn frame_flag(&self) -> FrameCondition {
        self.frame_flag
    }

    /// Address of the next free value stack slot.
    pub const fn stack_frame(&self) -> u32 {
        self.stack_frame
    }

    /// Base address of the current object.
    pub const fn object_frame(&self) -> u32 {
        self.object_frame
    }

    /// Base address of the current instance variables.
    pub const fn variable_frame(&self) -> u32 {
        self.variable_frame
    }

    /// Base address of the current call's locals.
    pub const fn local_frame(&self) -> u32 {
        self.local_frame
    }

    /// Diagnostics raised so far, in execution order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.as_slice()
    }

    /// Place a breakpoint cursor on a bytecode address.
    pub fn set_breakpoint(&mut self, pc: u32) {
        self.debugger.set_cursor(pc);
    }

    /// Remove the breakpoint cursor from a bytecode address.
    pub fn clear_breakpoint(&mut self, pc: u32) {
        self.debugger.clear_cursor(pc);
    }

    /// Park the cog in the non-execute state.
    ///
    /// Used by hosts to model an out-of-band stop request; subsequent ticks
    /// pass through as no-ops.
    pub fn stop(&mut self) {
        self.state = CogState::Stopped;
    }

    /// Shared reference to the hub handle.
    pub const fn hub(&self) -> &H {
        &self.hub
    }

    /// Exclusive reference to the hub handle.
    pub fn hub_mut(&mut self) -> &mut H {
        &mut self.hub
    }

    /// Consume the cog, returning the hub handle.
    pub fn into_hub(self) -> H {
        self.hub
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(cog = self.cog_id, %diagnostic, "bytecode diagnostic");
        self.diagnostics.push(diagnostic);
    }
}

impl<H> Cog<H>
where
    H: Hub,
{
    /// Advance the cog by one hub tick.
    ///
    /// Returns `true` when the program counter has come to rest on a
    /// breakpoint cursor.
    pub fn step(&mut self) -> bool {
        match self.state {
            CogState::BootInterpreter => {
                self.state_count -= 1;
                if self.state_count == 0 {
                    self.boot();
                }
            }
            CogState::WaitInterpreter => {
                self.state_count -= 1;
                if self.state_count == 0 {
                    self.state = CogState::ExecInterpreter;
                }
            }
            CogState::ExecInterpreter => {
                self.execute_bytecode();

                // Charge the flat pacing delay unless the bytecode parked
                // the cog in a wait state (or stopped it).
                if self.state == CogState::ExecInterpreter {
                    self.state = CogState::WaitInterpreter;
                    self.state_count = INSTRUCTION_TICKS;
                }
            }
            CogState::WaitPinsEqual => {
                if self.pins() & self.mask_value == self.target_value {
                    self.state = CogState::ExecInterpreter;
                }
            }
            CogState::WaitPinsNotEqual => {
                if self.pins() & self.mask_value != self.target_value {
                    self.state = CogState::ExecInterpreter;
                }
            }
            CogState::WaitCount => {
                if self.hub.counter() as u32 == self.target_value {
                    self.state = CogState::ExecInterpreter;
                }
            }
            CogState::WaitVideo | CogState::Stopped => {}
        }

        self.debugger.eval_state(self.pc)
    }

    /// Deliver a video frame slot to the cog.
    ///
    /// Called by the host when its video generator reaches a frame
    /// boundary. A cog parked in the video wait receives its saved
    /// colors/pixels pair and resumes execution; any other state yields
    /// zeros and a missed-frame mark.
    pub fn video_data(&mut self) -> (u32, u32) {
        if self.state == CogState::WaitVideo {
            self.frame_flag = FrameCondition::Hit;
            self.state = CogState::ExecInterpreter;
            (self.colors_value, self.pixels_value)
        } else {
            self.frame_flag = FrameCondition::Miss;
            (0, 0)
        }
    }

    fn pins(&self) -> u32 {
        match self.port {
            PinPort::A => self.hub.ina(),
            PinPort::B => self.hub.inb(),
        }
    }
}

impl<H> AsRef<H> for Cog<H> {
    fn as_ref(&self) -> &H {
        &self.hub
    }
}

impl<H> AsMut<H> for Cog<H> {
    fn as_mut(&mut self) -> &mut H {
        &mut self.hub
    }
}
