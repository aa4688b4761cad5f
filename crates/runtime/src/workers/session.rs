//! Session worker that owns the authoritative [`Sector`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), advances
//! the sector through the [`GameLoop`], and publishes every drained
//! interaction event plus tick lifecycle on the [`EventBus`].

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use tactics_core::{
    ActorId, BotTaskSource, DiceRandomSource, GameLoop, InteractionObserver, Intention, SchemeRegistry, ScoreManager, Sector,
    SurvivalModule, TickReport,
};

use super::inbox::{InboxTaskSource, IntentionInbox};
use crate::api::{ActorSnapshot, Result, RuntimeError, SectorSnapshot, SessionSummary, StopReason, TickSummary};
use crate::autopilot::autopilot_source;
use crate::events::{Event, EventBus, TurnEvent};

/// Commands that can be sent to the session worker
pub(crate) enum Command {
    /// Advance the sector by one tick.
    Step {
        reply: oneshot::Sender<Result<TickSummary>>,
    },
    /// Queue an order for a human actor; it runs on that actor's next turn.
    PushIntention {
        actor: ActorId,
        intention: Intention,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Tick until the player dies or leaves, the limit is hit, or the run is
    /// cancelled.
    Autoplay {
        limit: u64,
        reply: oneshot::Sender<Result<SessionSummary>>,
    },
    /// Query the actors on the map (read-only).
    QuerySnapshot { reply: oneshot::Sender<SectorSnapshot> },
    /// Query the player's score (read-only).
    QueryScore { reply: oneshot::Sender<ScoreManager> },
}

/// Everything a worker needs to run a sector.
pub(crate) struct SessionParts {
    pub sector: Sector,
    pub player: ActorId,
    pub schemes: SchemeRegistry,
    pub seed: u64,
    pub autopilot: bool,
}

/// Background task that processes session commands.
pub(crate) struct SessionWorker {
    sector: Sector,
    game: GameLoop,
    random: DiceRandomSource,
    schemes: SchemeRegistry,
    score: ScoreManager,
    inbox: IntentionInbox,
    finished: Option<StopReason>,
    command_rx: mpsc::Receiver<Command>,
    cancel_rx: watch::Receiver<bool>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub(crate) fn new(
        parts: SessionParts,
        command_rx: mpsc::Receiver<Command>,
        cancel_rx: watch::Receiver<bool>,
        event_bus: EventBus,
    ) -> Self {
        let inbox = IntentionInbox::default();
        let mut game = GameLoop::new();
        game.add_source(Box::new(InboxTaskSource::new(inbox.clone())));
        if parts.autopilot {
            game.add_source(Box::new(autopilot_source()));
        }
        game.add_source(Box::new(BotTaskSource::default()));

        Self {
            sector: parts.sector,
            game,
            random: DiceRandomSource::seeded(parts.seed),
            schemes: parts.schemes,
            score: ScoreManager::new(parts.player),
            inbox,
            finished: None,
            command_rx,
            cancel_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                Ok(()) = self.cancel_rx.changed() => {
                    if *self.cancel_rx.borrow() {
                        break;
                    }
                }
                else => break,
            }
        }
        debug!(target: "runtime::worker", turn = self.sector.turn, "session worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Step { reply } => {
                let result = self.step();
                let _ = reply.send(result);
            }
            Command::PushIntention { actor, intention, reply } => {
                let result = self.push_intention(actor, intention);
                let _ = reply.send(result);
            }
            Command::Autoplay { limit, reply } => {
                let result = self.autoplay(limit).await;
                let _ = reply.send(result);
            }
            Command::QuerySnapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::QueryScore { reply } => {
                let _ = reply.send(self.score.clone());
            }
        }
    }

    fn step(&mut self) -> Result<TickSummary> {
        self.ensure_running()?;
        Ok(self.tick())
    }

    fn push_intention(&mut self, actor: ActorId, intention: Intention) -> Result<()> {
        self.ensure_running()?;
        match self.sector.actors.get(actor) {
            Some(found) if found.player.is_human() => {
                debug!(target: "runtime::worker", %actor, ?intention, "intention queued");
                self.inbox.push(actor, intention);
                Ok(())
            }
            _ => Err(RuntimeError::NotHumanActor(actor)),
        }
    }

    async fn autoplay(&mut self, limit: u64) -> Result<SessionSummary> {
        self.ensure_running()?;
        info!(target: "runtime::worker", turn = self.sector.turn, limit, "autoplay started");
        self.event_bus.publish(Event::Turn(TurnEvent::AutoplayStarted {
            turn: self.sector.turn,
            limit,
        }));

        let mut iterations = 0;
        let reason = loop {
            // Cancellation is only observed between ticks.
            if *self.cancel_rx.borrow() {
                break StopReason::Cancelled;
            }
            if iterations >= limit {
                break StopReason::IterationLimit;
            }
            let tick = self.tick();
            iterations += 1;
            if let Some(reason) = tick.stopped {
                break reason;
            }
            tokio::task::yield_now().await;
        };

        let summary = self.summary(reason, iterations);
        info!(
            target: "runtime::worker",
            %reason,
            turn = summary.turn,
            iterations,
            frags = summary.score.frags(),
            "autoplay stopped"
        );
        if !reason.is_terminal() {
            self.publish_stopped(&summary);
        }
        Ok(summary)
    }

    fn tick(&mut self) -> TickSummary {
        let report = self.game.update(&mut self.sector, &mut self.random, &self.schemes);
        for event in &report.events {
            self.score.on_event(event);
            self.event_bus.publish(Event::Interaction(event.clone()));
        }
        self.score.on_turn_end(report.turn);
        self.event_bus.publish(Event::Turn(TurnEvent::TickCompleted {
            turn: report.turn,
            events: report.events.len(),
            faults: report.faults.len(),
        }));

        let stopped = self.stop_reason(&report);
        if let Some(reason) = stopped {
            self.finished = Some(reason);
            let summary = self.summary(reason, 0);
            info!(target: "runtime::worker", %reason, turn = report.turn, "session finished");
            self.publish_stopped(&summary);
        }

        TickSummary {
            turn: report.turn,
            faults: report.faults.len(),
            events: report.events,
            stopped,
        }
    }

    fn stop_reason(&self, report: &TickReport) -> Option<StopReason> {
        let player = self.score.player();
        if !self.score.is_alive() {
            return Some(StopReason::PlayerDied);
        }
        report
            .exits()
            .find(|(_, actors)| actors.contains(&player))
            .map(|(region, _)| StopReason::SectorExited(region))
    }

    fn ensure_running(&self) -> Result<()> {
        match self.finished {
            Some(reason) => Err(RuntimeError::SessionFinished(reason)),
            None => Ok(()),
        }
    }

    fn summary(&self, reason: StopReason, iterations: u64) -> SessionSummary {
        SessionSummary {
            reason,
            turn: self.sector.turn,
            iterations,
            score: self.score.clone(),
            lifetime: self.score.lifetime(),
        }
    }

    fn publish_stopped(&self, summary: &SessionSummary) {
        self.event_bus.publish(Event::Turn(TurnEvent::Stopped {
            reason: summary.reason,
            summary: Box::new(summary.clone()),
        }));
    }

    fn snapshot(&self) -> SectorSnapshot {
        let graph = self.sector.map.graph();
        let actors = self
            .sector
            .actors
            .iter()
            .map(|actor| ActorSnapshot {
                id: actor.id,
                player: actor.player,
                sid: actor.person.sid().to_owned(),
                node: actor.node,
                coords: graph.node(actor.node).map(|node| node.coords).unwrap_or_default(),
                health: actor
                    .person
                    .module_safe::<SurvivalModule>()
                    .map_or(0, SurvivalModule::health),
            })
            .collect();

        SectorSnapshot {
            turn: self.sector.turn,
            actors,
            containers: self.sector.containers.len(),
        }
    }
}
