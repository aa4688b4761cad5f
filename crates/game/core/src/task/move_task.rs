use std::collections::VecDeque;

use super::{TaskContext, TaskError, TaskExecution};
use crate::events::InteractionEvent;
use crate::ids::{ActorId, NodeId};
use crate::map::{PathFindingContext, SectorMap};
use crate::sector::Sector;

/// Walks a precomputed path one node per turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTask {
    target: NodeId,
    path: VecDeque<NodeId>,
    complete: bool,
}

impl MoveTask {
    /// Plans a path for `actor` from `from` to `target`.
    ///
    /// Complete from the start when the actor already stands on the target or
    /// no path exists.
    pub fn new(map: &SectorMap, actor: ActorId, from: NodeId, target: NodeId) -> Self {
        let path = map.find_path(from, target, &PathFindingContext::for_actor(actor));
        Self::from_path(from, target, path)
    }

    /// Wraps an already planned path (excluding `from`).
    pub fn from_path(from: NodeId, target: NodeId, path: Vec<NodeId>) -> Self {
        let complete = from == target || path.is_empty();
        Self {
            target,
            path: path.into(),
            complete,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn remaining(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.path.iter().copied()
    }
}

impl TaskExecution for MoveTask {
    fn can_execute(&self, actor: ActorId, sector: &Sector) -> bool {
        if self.complete {
            return false;
        }
        let (Some(current), Some(&next)) = (sector.actors.get(actor).map(|a| a.node), self.path.front()) else {
            return false;
        };
        sector.map.graph().has_edge(current, next) && sector.map.is_position_available_for(next, actor)
    }

    fn execute(&mut self, actor: ActorId, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        if self.complete {
            return Ok(());
        }
        let current = ctx
            .sector
            .actors
            .get(actor)
            .map(|a| a.node)
            .ok_or(TaskError::ActorMissing(actor))?;
        if current == self.target {
            self.complete = true;
            return Ok(());
        }

        let Some(&next) = self.path.front() else {
            self.complete = true;
            return Err(TaskError::TargetNotReached(self.target));
        };
        // Walls may appear and actors move between planning and commit.
        if !ctx.sector.map.graph().has_edge(current, next) || !ctx.sector.map.is_position_available_for(next, actor) {
            return Err(TaskError::PathBlocked(next));
        }

        let from = ctx.sector.move_actor(actor, next)?;
        self.path.pop_front();
        ctx.events.push(InteractionEvent::ActorMoved { actor, from, to: next });

        if next == self.target {
            self.complete = true;
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}
