use super::{TaskContext, TaskError, TaskExecution};
use crate::ids::ActorId;
use crate::sector::Sector;

/// Waits a fixed number of turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdleTask {
    remaining: u32,
}

impl IdleTask {
    pub fn new(duration: u32) -> Self {
        Self { remaining: duration }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl TaskExecution for IdleTask {
    fn can_execute(&self, _actor: ActorId, _sector: &Sector) -> bool {
        self.remaining > 0
    }

    fn execute(&mut self, _actor: ActorId, _ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}
