use super::{TaskContext, TaskError, TaskExecution};
use crate::events::InteractionEvent;
use crate::ids::{ActorId, ContainerId};
use crate::inventory::InventoryModule;
use crate::sector::Sector;

/// Empties an adjacent container into the actor's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenContainerTask {
    container: ContainerId,
    complete: bool,
}

impl OpenContainerTask {
    pub fn new(container: ContainerId) -> Self {
        Self {
            container,
            complete: false,
        }
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    fn check_reach(&self, actor: ActorId, sector: &Sector) -> Result<(), TaskError> {
        let node = sector
            .actors
            .get(actor)
            .map(|a| a.node)
            .ok_or(TaskError::ActorMissing(actor))?;
        let container = sector
            .containers
            .get(self.container)
            .ok_or(TaskError::ContainerMissing(self.container))?;
        if container.opened {
            return Err(TaskError::ContainerAlreadyOpened(self.container));
        }
        if sector.map.distance_between(node, container.node) > 1 || !sector.map.target_is_on_line(node, container.node) {
            return Err(TaskError::ContainerOutOfReach(self.container));
        }
        Ok(())
    }
}

impl TaskExecution for OpenContainerTask {
    fn can_execute(&self, actor: ActorId, sector: &Sector) -> bool {
        !self.complete && self.check_reach(actor, sector).is_ok()
    }

    fn execute(&mut self, actor: ActorId, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        self.complete = true;
        self.check_reach(actor, ctx.sector)?;

        let sector = &mut *ctx.sector;
        let inventory = sector
            .actors
            .get_mut(actor)
            .ok_or(TaskError::ActorMissing(actor))?
            .person
            .module_mut::<InventoryModule>()?;
        let container = sector
            .containers
            .get_mut(self.container)
            .ok_or(TaskError::ContainerMissing(self.container))?;

        let props = container.take_props();
        let sids = props.iter().map(|p| p.sid().to_owned()).collect();
        for prop in props {
            inventory.add(prop);
        }

        ctx.events.push(InteractionEvent::ContainerOpened {
            actor,
            container: self.container,
            props: sids,
        });
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TacticsConfig;
    use crate::ids::{NodeId, Player};
    use crate::inventory::{Prop, Resource};
    use crate::map::SectorMap;
    use crate::person::Person;
    use crate::scheme::SchemeRegistry;
    use crate::spatial::{HexGraph, OffsetCoords};
    use crate::test_support::FixedRandom;

    fn looter_sector(container_at: (i32, i32)) -> (Sector, ActorId, ContainerId) {
        let mut sector = Sector::new(SectorMap::new(HexGraph::square(4)), TacticsConfig::new());
        let node = |sector: &Sector, (x, y): (i32, i32)| -> NodeId {
            sector.map.graph().node_at(OffsetCoords::new(x, y)).unwrap()
        };
        let person = Person::new("human").with_module(InventoryModule::new()).unwrap();
        let actor = sector
            .add_actor(Player::Human, person, node(&sector, (0, 0)), None)
            .unwrap();
        let bolts = Prop::Resource(Resource {
            sid: "bolts".into(),
            resource_type: Some("bolt".into()),
            usage: None,
            count: 5,
        });
        let chest = sector
            .add_container(node(&sector, container_at), vec![bolts], true)
            .unwrap();
        (sector, actor, chest)
    }

    fn open(sector: &mut Sector, actor: ActorId, task: &mut OpenContainerTask, events: &mut Vec<InteractionEvent>) -> Result<(), TaskError> {
        let schemes = SchemeRegistry::new();
        let mut random = FixedRandom::mean();
        let mut ctx = TaskContext {
            sector,
            random: &mut random,
            schemes: &schemes,
            events,
        };
        task.execute(actor, &mut ctx)
    }

    #[test]
    fn adjacent_container_moves_props_into_inventory() {
        let (mut sector, actor, chest) = looter_sector((1, 0));
        let mut task = OpenContainerTask::new(chest);
        let mut events = Vec::new();

        open(&mut sector, actor, &mut task, &mut events).unwrap();

        let inventory = sector.actors.get(actor).unwrap().person.inventory().unwrap();
        assert_eq!(inventory.count_resource("bolt"), 5);
        assert!(sector.containers.get(chest).unwrap().opened);
        assert_eq!(
            events,
            vec![InteractionEvent::ContainerOpened {
                actor,
                container: chest,
                props: vec!["bolts".into()],
            }]
        );
    }

    #[test]
    fn distant_container_is_out_of_reach() {
        let (mut sector, actor, chest) = looter_sector((3, 0));
        let mut task = OpenContainerTask::new(chest);

        assert!(!task.can_execute(actor, &sector));
        assert_eq!(
            open(&mut sector, actor, &mut task, &mut Vec::new()),
            Err(TaskError::ContainerOutOfReach(chest))
        );
    }

    #[test]
    fn opened_container_cannot_be_looted_twice() {
        let (mut sector, actor, chest) = looter_sector((1, 0));
        open(&mut sector, actor, &mut OpenContainerTask::new(chest), &mut Vec::new()).unwrap();

        assert_eq!(
            open(&mut sector, actor, &mut OpenContainerTask::new(chest), &mut Vec::new()),
            Err(TaskError::ContainerAlreadyOpened(chest))
        );
    }
}
