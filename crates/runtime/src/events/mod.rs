//! Topic-based event bus for runtime events.
//!
//! Interaction events drained from every tick are rebroadcast on
//! [`Topic::Interaction`]; tick and session lifecycle goes to [`Topic::Turn`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::TurnEvent;
