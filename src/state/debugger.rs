use std::collections::HashSet;

/// Breakpoint cursor bookkeeping.
///
/// The host places cursors on bytecode addresses; after every tick the cog
/// reports whether its program counter came to rest on one. A cursor fires
/// once per arrival: a cog parked on the same address (pacing delays, wait
/// states) stays silent until the counter moves away and comes back.
#[derive(Debug, Default, Clone)]
pub struct Debugger {
    cursors: HashSet<u32>,
    last_hit: Option<u32>,
}

impl Debugger {
    /// Place a cursor on a bytecode address.
    pub fn set_cursor(&mut self, pc: u32) {
        self.cursors.insert(pc);
    }

    /// Remove the cursor from a bytecode address.
    pub fn clear_cursor(&mut self, pc: u32) {
        self.cursors.remove(&pc);
    }

    /// Evaluate the cursor set against the current program counter.
    pub fn eval_state(&mut self, pc: u32) -> bool {
        if !self.cursors.contains(&pc) {
            self.last_hit = None;
            return false;
        }

        if self.last_hit == Some(pc) {
            return false;
        }

        self.last_hit = Some(pc);
        true
    }
}
