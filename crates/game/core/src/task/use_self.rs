use super::{TaskContext, TaskError, TaskExecution};
use crate::events::InteractionEvent;
use crate::ids::ActorId;
use crate::inventory::{InventoryModule, Prop};
use crate::sector::Sector;
use crate::survival::SurvivalModule;

/// Consumes one unit of a usable resource (food, water, medkit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UseSelfTask {
    prop: String,
    complete: bool,
}

impl UseSelfTask {
    pub fn new(prop: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            complete: false,
        }
    }

    pub fn prop(&self) -> &str {
        &self.prop
    }

    fn is_usable(&self, inventory: &InventoryModule) -> bool {
        inventory.props().iter().any(|p| match p {
            Prop::Resource(resource) => resource.sid == self.prop && resource.count > 0 && resource.usage.is_some(),
            Prop::Equipment(_) => false,
        })
    }
}

impl TaskExecution for UseSelfTask {
    fn can_execute(&self, actor: ActorId, sector: &Sector) -> bool {
        !self.complete
            && sector
                .actors
                .get(actor)
                .and_then(|a| a.person.inventory())
                .is_some_and(|inventory| self.is_usable(inventory))
    }

    fn execute(&mut self, actor: ActorId, ctx: &mut TaskContext<'_>) -> Result<(), TaskError> {
        self.complete = true;
        let person = &mut ctx
            .sector
            .actors
            .get_mut(actor)
            .ok_or(TaskError::ActorMissing(actor))?
            .person;

        // Nothing is consumed unless the effect can be applied.
        person.module::<SurvivalModule>()?;
        let inventory = person.module_mut::<InventoryModule>()?;
        if !self.is_usable(inventory) {
            return Err(TaskError::PropNotUsable(self.prop.clone()));
        }
        let resource = inventory.take_one(&self.prop)?;

        let survival = person.module_mut::<SurvivalModule>()?;
        for restore in resource.usage.iter().flat_map(|usage| usage.restore.iter()) {
            survival.restore_stat(restore.stat, restore.value, ctx.random.as_survival());
        }

        ctx.events.push(InteractionEvent::PropUsed {
            actor,
            prop: resource.sid,
        });
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}
