//! Runtime orchestration for hex tactics sessions.
//!
//! This crate wires content loading, scenario setup and the session worker
//! into a cohesive runtime API. Consumers embed [`Runtime`] to step a sector
//! or autoplay it, subscribe to events, and issue orders through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`scenario`] builds the starting sector from a seed
//! - [`autopilot`] lets bot logic play the human side
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod autopilot;
pub mod config;
pub mod events;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{
    ActorSnapshot, Result, RuntimeError, RuntimeHandle, SectorSnapshot, SessionSummary, StopReason, TickSummary,
};
pub use autopilot::{AutopilotStrategyFactory, ExitSeekingStrategy, autopilot_source};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder};
pub use scenario::{Scenario, ScenarioError, ScenarioSetup};
