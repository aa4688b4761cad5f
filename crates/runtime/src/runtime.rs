//! High-level runtime orchestrator.
//!
//! The runtime owns the session worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a sector.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use tactics_content::{ConfigLoader, ContentFactory, SchemeCatalog};
use tactics_core::TacticsConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::scenario::Scenario;
use crate::workers::{Command, SessionParts, SessionWorker};

/// Main runtime that orchestrates one sector session
///
/// Design: Runtime owns the worker and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Autoplay with the configured iteration limit
    pub async fn run(&self) -> Result<crate::api::SessionSummary> {
        self.handle.autoplay(self.config.iteration_limit).await
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the command in progress; an autoplay run stops after its
    /// current tick.
    pub async fn shutdown(self) -> Result<()> {
        self.handle.cancel();
        drop(self.handle);

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<SchemeCatalog>,
    tactics: Option<TacticsConfig>,
    scenario: Option<Scenario>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            tactics: None,
            scenario: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already loaded catalog instead of reading one
    pub fn catalog(mut self, catalog: SchemeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Override the tactical tunables
    pub fn tactics(mut self, tactics: TacticsConfig) -> Self {
        self.tactics = Some(tactics);
        self
    }

    /// Replace the scenario derived from the configuration
    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = Some(scenario);
        self
    }

    /// Build the runtime and spawn its worker
    ///
    /// Content comes from `content_dir` when configured, otherwise from the
    /// catalog and tunables embedded in the content crate.
    pub async fn build(self) -> Result<Runtime> {
        let (catalog, tactics) = self.load_content()?;
        let scenario = self.scenario.unwrap_or_else(|| Scenario::from_config(&self.config));
        let setup = scenario.build(&catalog, &tactics)?;
        let player = setup.player;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, Arc::new(cancel_tx), event_bus.clone(), player);

        let worker = SessionWorker::new(
            SessionParts {
                sector: setup.sector,
                player,
                schemes: catalog.into_registry(),
                seed: self.config.seed,
                autopilot: self.config.autopilot,
            },
            command_rx,
            cancel_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        info!(seed = self.config.seed, %player, autopilot = self.config.autopilot, "runtime started");
        Ok(Runtime {
            handle,
            config: self.config,
            worker_handle,
        })
    }

    fn load_content(&self) -> Result<(SchemeCatalog, TacticsConfig)> {
        let factory = self.config.content_dir.as_ref().map(ContentFactory::new);

        let catalog = match (&self.catalog, &factory) {
            (Some(catalog), _) => catalog.clone(),
            (None, Some(factory)) => factory.load_catalog()?,
            (None, None) => SchemeCatalog::embedded()?,
        };
        let tactics = match (&self.tactics, &factory) {
            (Some(tactics), _) => tactics.clone(),
            (None, Some(factory)) => factory.load_config().context("tactical tunables")?,
            (None, None) => ConfigLoader::embedded()?,
        };
        Ok((catalog, tactics))
    }
}
