//! Patrol strategies: where a bot goes when nobody is around.

use crate::actor::Actor;
use crate::ids::{ActorId, NodeId};
use crate::random::DecisionSource;
use crate::sector::Sector;

/// What a strategy may look at while choosing a patrol target.
pub struct PatrolContext<'a> {
    pub actor: ActorId,
    pub node: NodeId,
    pub sector: &'a Sector,
    /// Set once after a pursuit ended, so the strategy can reset its route.
    pub interrupted: bool,
}

pub trait PatrolStrategy: Send + std::fmt::Debug {
    fn pick_next_patrol_target(&mut self, ctx: &PatrolContext<'_>, random: &mut dyn DecisionSource) -> Option<NodeId>;

    fn on_patrol_target_reached(&mut self, target: NodeId);
}

/// Walks an ordered, looping list of patrol points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatrolRouteStrategy {
    points: Vec<NodeId>,
    index: usize,
}

impl PatrolRouteStrategy {
    pub fn new(points: Vec<NodeId>) -> Self {
        Self { points, index: 0 }
    }

    pub fn current_point(&self) -> Option<NodeId> {
        self.points.get(self.index).copied()
    }

    fn nearest_index(&self, ctx: &PatrolContext<'_>) -> usize {
        self.points
            .iter()
            .enumerate()
            .min_by_key(|&(i, &point)| (ctx.sector.map.distance_between(ctx.node, point), i))
            .map_or(0, |(i, _)| i)
    }
}

impl PatrolStrategy for PatrolRouteStrategy {
    fn pick_next_patrol_target(&mut self, ctx: &PatrolContext<'_>, _random: &mut dyn DecisionSource) -> Option<NodeId> {
        if self.points.is_empty() {
            return None;
        }
        if ctx.interrupted {
            self.index = self.nearest_index(ctx);
        }
        self.current_point()
    }

    fn on_patrol_target_reached(&mut self, target: NodeId) {
        if self.current_point() == Some(target) {
            self.index = (self.index + 1) % self.points.len();
        }
    }
}

/// Wanders to random free nodes of its region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoamingStrategy;

impl PatrolStrategy for RoamingStrategy {
    fn pick_next_patrol_target(&mut self, ctx: &PatrolContext<'_>, random: &mut dyn DecisionSource) -> Option<NodeId> {
        let candidates = ctx.sector.roaming_nodes(ctx.actor);
        random.select_roaming_node(&candidates)
    }

    fn on_patrol_target_reached(&mut self, _target: NodeId) {}
}

/// Chooses a patrol strategy for a newly seen bot.
pub trait StrategyFactory: Send {
    fn create(&self, actor: &Actor, sector: &Sector) -> Box<dyn PatrolStrategy>;
}

/// Fixed routes from the sector first, sentries guard their spawn node,
/// everyone else roams.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArchetypeStrategyFactory;

impl ArchetypeStrategyFactory {
    pub const SENTRY: &'static str = "sentry";
}

impl StrategyFactory for ArchetypeStrategyFactory {
    fn create(&self, actor: &Actor, sector: &Sector) -> Box<dyn PatrolStrategy> {
        if let Some(route) = sector.patrol_routes.get(&actor.id) {
            return Box::new(PatrolRouteStrategy::new(route.clone()));
        }
        match actor.archetype.as_deref() {
            Some(Self::SENTRY) => Box::new(PatrolRouteStrategy::new(vec![actor.node])),
            _ => Box::new(RoamingStrategy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TacticsConfig;
    use crate::ids::Player;
    use crate::map::SectorMap;
    use crate::person::Person;
    use crate::spatial::{HexGraph, OffsetCoords};
    use crate::test_support::FixedRandom;

    fn sector() -> Sector {
        Sector::new(SectorMap::new(HexGraph::square(6)), TacticsConfig::new())
    }

    fn node(sector: &Sector, x: i32, y: i32) -> NodeId {
        sector.map.graph().node_at(OffsetCoords::new(x, y)).unwrap()
    }

    #[test]
    fn route_loops_through_points() {
        let sector = sector();
        let points = vec![node(&sector, 0, 0), node(&sector, 5, 0), node(&sector, 5, 5)];
        let mut strategy = PatrolRouteStrategy::new(points.clone());
        let mut random = FixedRandom::mean();
        let ctx = PatrolContext {
            actor: ActorId(0),
            node: points[0],
            sector: &sector,
            interrupted: false,
        };

        let mut visited = Vec::new();
        for _ in 0..4 {
            let target = strategy.pick_next_patrol_target(&ctx, &mut random).unwrap();
            strategy.on_patrol_target_reached(target);
            visited.push(target);
        }

        assert_eq!(visited, vec![points[0], points[1], points[2], points[0]]);
    }

    #[test]
    fn interruption_resumes_at_nearest_point() {
        let sector = sector();
        let points = vec![node(&sector, 0, 0), node(&sector, 5, 0), node(&sector, 5, 5)];
        let mut strategy = PatrolRouteStrategy::new(points.clone());
        let mut random = FixedRandom::mean();
        let ctx = PatrolContext {
            actor: ActorId(0),
            node: node(&sector, 4, 4),
            sector: &sector,
            interrupted: true,
        };

        assert_eq!(strategy.pick_next_patrol_target(&ctx, &mut random), Some(points[2]));
    }

    #[test]
    fn factory_prefers_routes_then_archetypes() {
        let mut sector = sector();
        let home = node(&sector, 2, 2);
        let sentry = sector
            .add_actor(Player::Bot, Person::new("guard"), home, Some("sentry".into()))
            .unwrap();
        let factory = ArchetypeStrategyFactory;

        let strategy = factory.create(sector.actors.get(sentry).unwrap(), &sector);
        assert!(format!("{strategy:?}").contains("PatrolRouteStrategy"));

        let rat = sector
            .add_actor(Player::Bot, Person::new("rat"), node(&sector, 0, 0), None)
            .unwrap();
        let strategy = factory.create(sector.actors.get(rat).unwrap(), &sector);
        assert_eq!(format!("{strategy:?}"), "RoamingStrategy");
    }
}
