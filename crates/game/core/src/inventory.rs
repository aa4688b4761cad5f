//! Carried props: stackable resources and spare equipment.

use crate::equipment::Equipment;
use crate::error::{ErrorSeverity, GameError};
use crate::scheme::{PropScheme, UsageScheme};

/// A stack of identical resource props (arrows, rations, medkits).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub sid: String,
    /// Ammunition family matched against act constraints.
    pub resource_type: Option<String>,
    pub usage: Option<UsageScheme>,
    pub count: u32,
}

impl Resource {
    pub fn from_scheme(scheme: &PropScheme, count: u32) -> Self {
        Self {
            sid: scheme.sid.clone(),
            resource_type: scheme.resource.as_ref().map(|r| r.resource_type.clone()),
            usage: scheme.usage.clone(),
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prop {
    Resource(Resource),
    Equipment(Equipment),
}

impl Prop {
    pub fn sid(&self) -> &str {
        match self {
            Prop::Resource(resource) => &resource.sid,
            Prop::Equipment(equipment) => &equipment.sid,
        }
    }
}

/// Pushes `prop`, merging a resource into an existing stack of the same sid.
pub(crate) fn stack_prop(props: &mut Vec<Prop>, prop: Prop) {
    if let Prop::Resource(incoming) = &prop {
        let stack = props.iter_mut().find_map(|p| match p {
            Prop::Resource(existing) if existing.sid == incoming.sid => Some(existing),
            _ => None,
        });
        if let Some(existing) = stack {
            existing.count += incoming.count;
            return;
        }
    }
    props.push(prop);
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("need {required} of resource type {resource_type}, have {available}")]
    NotEnoughResource {
        resource_type: String,
        required: u32,
        available: u32,
    },

    #[error("no prop {0} in inventory")]
    PropNotFound(String),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotEnoughResource { .. } => "INVENTORY_NOT_ENOUGH_RESOURCE",
            Self::PropNotFound(_) => "INVENTORY_PROP_NOT_FOUND",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventoryModule {
    props: Vec<Prop>,
}

impl InventoryModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Adds a prop; resources merge into an existing stack of the same sid.
    pub fn add(&mut self, prop: Prop) {
        stack_prop(&mut self.props, prop);
    }

    /// Total count of resources of the given ammunition type.
    pub fn count_resource(&self, resource_type: &str) -> u32 {
        self.resources()
            .filter(|r| r.resource_type.as_deref() == Some(resource_type))
            .map(|r| r.count)
            .sum()
    }

    pub fn has_resource(&self, resource_type: &str, count: u32) -> bool {
        self.count_resource(resource_type) >= count
    }

    /// Removes `count` units of a resource type, all or nothing.
    pub fn consume_resource(&mut self, resource_type: &str, count: u32) -> Result<(), InventoryError> {
        let available = self.count_resource(resource_type);
        if available < count {
            return Err(InventoryError::NotEnoughResource {
                resource_type: resource_type.to_owned(),
                required: count,
                available,
            });
        }

        let mut remaining = count;
        for prop in &mut self.props {
            if remaining == 0 {
                break;
            }
            if let Prop::Resource(resource) = prop
                && resource.resource_type.as_deref() == Some(resource_type)
            {
                let taken = remaining.min(resource.count);
                resource.count -= taken;
                remaining -= taken;
            }
        }
        self.drop_empty_stacks();
        Ok(())
    }

    /// Takes one unit of a resource stack by sid.
    pub fn take_one(&mut self, sid: &str) -> Result<Resource, InventoryError> {
        let resource = self
            .props
            .iter_mut()
            .find_map(|p| match p {
                Prop::Resource(r) if r.sid == sid && r.count > 0 => Some(r),
                _ => None,
            })
            .ok_or_else(|| InventoryError::PropNotFound(sid.to_owned()))?;

        resource.count -= 1;
        let taken = Resource {
            count: 1,
            ..resource.clone()
        };
        self.drop_empty_stacks();
        Ok(taken)
    }

    fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.props.iter().filter_map(|p| match p {
            Prop::Resource(r) => Some(r),
            Prop::Equipment(_) => None,
        })
    }

    fn drop_empty_stacks(&mut self) {
        self.props
            .retain(|p| !matches!(p, Prop::Resource(r) if r.count == 0));
    }
}

crate::person::person_module!(InventoryModule, crate::person::ModuleKey::Inventory);

#[cfg(test)]
mod tests {
    use super::*;

    fn arrows(sid: &str, count: u32) -> Prop {
        Prop::Resource(Resource {
            sid: sid.into(),
            resource_type: Some("arrow".into()),
            usage: None,
            count,
        })
    }

    #[test]
    fn stacks_merge_by_sid() {
        let mut inventory = InventoryModule::new();
        inventory.add(arrows("arrow", 3));
        inventory.add(arrows("arrow", 2));

        assert_eq!(inventory.props().len(), 1);
        assert_eq!(inventory.count_resource("arrow"), 5);
    }

    #[test]
    fn consume_spans_stacks_of_same_type() {
        let mut inventory = InventoryModule::new();
        inventory.add(arrows("arrow", 1));
        inventory.add(arrows("fire-arrow", 2));

        inventory.consume_resource("arrow", 2).unwrap();

        assert_eq!(inventory.count_resource("arrow"), 1);
        assert_eq!(inventory.props().len(), 1);
    }

    #[test]
    fn consume_is_all_or_nothing() {
        let mut inventory = InventoryModule::new();
        inventory.add(arrows("arrow", 1));

        let err = inventory.consume_resource("arrow", 2).unwrap_err();

        assert_eq!(
            err,
            InventoryError::NotEnoughResource {
                resource_type: "arrow".into(),
                required: 2,
                available: 1
            }
        );
        assert_eq!(inventory.count_resource("arrow"), 1);
    }

    #[test]
    fn take_one_removes_exhausted_stack() {
        let mut inventory = InventoryModule::new();
        inventory.add(arrows("ration", 1));

        let taken = inventory.take_one("ration").unwrap();

        assert_eq!(taken.count, 1);
        assert!(inventory.is_empty());
        assert!(inventory.take_one("ration").is_err());
    }
}
