//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the sector and executes gameplay commands.

mod inbox;
mod session;

pub(crate) use session::{Command, SessionParts, SessionWorker};
