//! Bot logic for the human player during autoplay.
//!
//! The human fights whatever it sees like any bot does and otherwise heads
//! for the nearest exit node.

use tactics_core::{
    Actor, BotTaskSource, DecisionSource, NodeId, PatrolContext, PatrolStrategy, Player, RoamingStrategy, Sector,
    StrategyFactory,
};

/// Patrols towards the closest free exit node of any out region; roams when
/// the sector has none.
#[derive(Clone, Debug, Default)]
pub struct ExitSeekingStrategy {
    fallback: RoamingStrategy,
}

impl ExitSeekingStrategy {
    fn nearest_exit(ctx: &PatrolContext<'_>) -> Option<NodeId> {
        let map = &ctx.sector.map;
        ctx.sector
            .regions
            .iter()
            .filter(|region| region.is_out)
            .flat_map(|region| region.exit_nodes.iter().copied())
            .filter(|&node| map.is_position_available_for(node, ctx.actor))
            .min_by_key(|&node| (map.distance_between(ctx.node, node), node))
    }
}

impl PatrolStrategy for ExitSeekingStrategy {
    fn pick_next_patrol_target(&mut self, ctx: &PatrolContext<'_>, random: &mut dyn DecisionSource) -> Option<NodeId> {
        Self::nearest_exit(ctx).or_else(|| self.fallback.pick_next_patrol_target(ctx, random))
    }

    fn on_patrol_target_reached(&mut self, _target: NodeId) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AutopilotStrategyFactory;

impl StrategyFactory for AutopilotStrategyFactory {
    fn create(&self, _actor: &Actor, _sector: &Sector) -> Box<dyn PatrolStrategy> {
        Box::new(ExitSeekingStrategy::default())
    }
}

/// Task source that drives human actors with bot logic.
pub fn autopilot_source() -> BotTaskSource {
    BotTaskSource::for_player(Player::Human, Box::new(AutopilotStrategyFactory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{HexGraph, MapRegion, OffsetCoords, Person, RegionId, SectorMap, TacticsConfig};

    struct FirstChoice;

    impl DecisionSource for FirstChoice {
        fn select_idle_duration(&mut self, min: u32, _max: u32) -> u32 {
            min
        }

        fn select_roaming_node(&mut self, candidates: &[NodeId]) -> Option<NodeId> {
            candidates.first().copied()
        }
    }

    fn node(sector: &Sector, x: i32, y: i32) -> NodeId {
        sector.map.graph().node_at(OffsetCoords::new(x, y)).unwrap()
    }

    #[test]
    fn picks_the_closest_exit() {
        let mut sector = Sector::new(SectorMap::new(HexGraph::square(6)), TacticsConfig::new());
        let (near, far) = (node(&sector, 1, 0), node(&sector, 5, 5));
        sector.add_region(MapRegion {
            id: RegionId(1),
            nodes: vec![near, far],
            is_out: true,
            exit_nodes: vec![far, near],
            ..MapRegion::default()
        });
        let at = node(&sector, 0, 0);
        let actor = sector.add_actor(Player::Human, Person::new("human"), at, None).unwrap();
        let ctx = PatrolContext {
            actor,
            node: at,
            sector: &sector,
            interrupted: false,
        };

        let target = ExitSeekingStrategy::default().pick_next_patrol_target(&ctx, &mut FirstChoice);

        assert_eq!(target, Some(near));
    }

    #[test]
    fn roams_without_exits() {
        let mut sector = Sector::new(SectorMap::new(HexGraph::square(4)), TacticsConfig::new());
        let at = node(&sector, 0, 0);
        let actor = sector.add_actor(Player::Human, Person::new("human"), at, None).unwrap();
        let ctx = PatrolContext {
            actor,
            node: at,
            sector: &sector,
            interrupted: false,
        };

        let target = ExitSeekingStrategy::default().pick_next_patrol_target(&ctx, &mut FirstChoice);

        assert!(target.is_some_and(|node| node != at));
    }
}
